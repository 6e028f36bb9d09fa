//! AppState：当前文档的内存状态（文档状态源的默认实现）

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::model::format::FileFormat;
use crate::model::stores::{DocumentSnapshot, DocumentStore};
use crate::utils::fs::read_text_file;

#[derive(Debug, Default)]
pub struct AppState {
    pub name: Option<String>,
    pub dom: Option<Value>,
    pub format: FileFormat,
    pub error: Option<String>,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON解析失败: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("状态错误: {0}")]
    State(String),
}

impl AppState {
    /// 从文件加载文档，文件名作为文档名
    pub fn load_file(&mut self, p: &Path) -> Result<(), AppError> {
        let text = read_text_file(p)?;
        let name = p
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| AppError::State(format!("无效的文件路径: {}", p.display())))?;
        self.load_str(Some(name), &text)
    }

    /// 解析文本并替换内容；解析失败时记录错误，保留旧内容
    pub fn load_str(&mut self, name: Option<String>, text: &str) -> Result<(), AppError> {
        self.name = name;
        match serde_json::from_str::<Value>(text) {
            Ok(dom) => {
                self.dom = Some(dom);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("文档解析失败: {}", e);
                self.error = Some(e.to_string());
                Err(AppError::Parse(e))
            }
        }
    }

    /// 当前内容的格式化文本（预览面板使用）
    pub fn pretty_text(&self) -> Result<String, AppError> {
        let dom = self
            .dom
            .as_ref()
            .ok_or_else(|| AppError::State("文档尚未加载".into()))?;
        Ok(serde_json::to_string_pretty(dom)?)
    }
}

impl DocumentStore for AppState {
    fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            name: self.name.clone(),
            content: self.dom.clone(),
            format: self.format,
            error: self.error.clone(),
        }
    }

    fn set_contents(&mut self, value: Value) {
        tracing::info!("文档内容已替换");
        self.dom = Some(value);
        self.error = None;
    }

    fn set_format(&mut self, format: FileFormat) {
        tracing::info!("文档格式切换: {:?} -> {:?}", self.format, format);
        self.format = format;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_json_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("创建临时文件失败");
        file.write_all(content.as_bytes()).expect("写入临时文件失败");
        file
    }

    #[test]
    fn test_load_simple_json() {
        let temp_file = create_test_json_file(r#"{"name": "测试", "value": 42}"#);

        let mut app_state = AppState::default();
        let result = app_state.load_file(temp_file.path());

        assert!(result.is_ok(), "加载简单JSON应该成功");
        assert_eq!(app_state.dom, Some(json!({"name": "测试", "value": 42})));
        assert!(app_state.error.is_none(), "不应记录解析错误");

        let expected_name = temp_file
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        assert_eq!(app_state.name, expected_name, "文件名应作为文档名");
    }

    #[test]
    fn test_load_invalid_json_keeps_previous_content() {
        let mut app_state = AppState::default();
        app_state.load_str(Some("a.json".into()), r#"{"a": 1}"#).unwrap();

        let result = app_state.load_str(Some("a.json".into()), r#"{"a": "#);
        assert!(result.is_err(), "无效JSON应该返回错误");
        assert!(app_state.error.is_some(), "应记录解析错误");
        assert_eq!(app_state.dom, Some(json!({"a": 1})), "旧内容应保留");
    }

    #[test]
    fn test_load_missing_file() {
        let mut app_state = AppState::default();
        let result = app_state.load_file(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(AppError::Io(_))), "缺失文件应返回IO错误");
        assert!(app_state.name.is_none());
    }

    #[test]
    fn test_set_contents_clears_error() {
        let mut app_state = AppState::default();
        let _ = app_state.load_str(None, "not json");
        assert!(app_state.snapshot().error.is_some());

        app_state.set_contents(json!({"b": [1, 2]}));
        let snapshot = app_state.snapshot();
        assert!(snapshot.error.is_none(), "替换内容后错误应清除");
        assert_eq!(snapshot.content, Some(json!({"b": [1, 2]})));
    }

    #[test]
    fn test_set_format() {
        let mut app_state = AppState::default();
        app_state.set_format(FileFormat::Csv);
        assert_eq!(app_state.snapshot().format, FileFormat::Csv);
    }

    #[test]
    fn test_pretty_text_requires_document() {
        let mut app_state = AppState::default();
        assert!(app_state.pretty_text().is_err(), "未加载时应返回错误");

        app_state.set_contents(json!({"a": 1}));
        assert_eq!(app_state.pretty_text().unwrap(), "{\n  \"a\": 1\n}");
    }
}
