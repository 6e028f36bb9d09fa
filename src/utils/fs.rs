//! IO helper: safe file read/write for documents and settings

use std::{fs::File, io::{BufReader, BufWriter, Read, Write}, path::Path};

use serde::{de::DeserializeOwned, Serialize};

use crate::model::data_core::AppError;

/// 读取整个文本文件
pub fn read_text_file(p: &Path) -> Result<String, AppError> {
    let mut text = String::new();
    BufReader::new(File::open(p)?).read_to_string(&mut text)?;
    Ok(text)
}

/// 从JSON文件反序列化
pub fn read_json_file<T: DeserializeOwned>(p: &Path) -> Result<T, AppError> {
    let f = File::open(p)?;
    let rdr = BufReader::new(f);
    Ok(serde_json::from_reader(rdr)?)
}

/// 序列化到JSON文件（格式化输出）
pub fn write_json_file<T: Serialize>(p: &Path, value: &T) -> Result<(), AppError> {
    let f = File::create(p)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, value)?;
    w.flush()?;
    Ok(())
}
