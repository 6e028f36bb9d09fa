//! 配置状态源：实时转换开关等用户设置，持久化到JSON设置文件

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::data_core::AppError;
use crate::model::stores::ConfigStore;
use crate::utils::fs::{read_json_file, write_json_file};

/// 设置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "JSON_CANVAS_CONFIG";
/// 未指定时的默认设置文件
pub const DEFAULT_CONFIG_FILE: &str = "json_canvas_settings.json";

/// 持久化的设置内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub live_transform_enabled: bool,
    /// tracing 最大日志级别（error/warn/info/debug/trace）
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            live_transform_enabled: true,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// 解析日志级别，无法识别时回退到 INFO
    pub fn max_level(&self) -> tracing::Level {
        self.log_level
            .trim()
            .parse()
            .unwrap_or(tracing::Level::INFO)
    }
}

#[derive(Debug, Default)]
pub struct ConfigState {
    pub settings: Settings,
    /// 为空时只在内存中保存
    pub path: Option<PathBuf>,
}

impl ConfigState {
    /// 仅内存中的配置（测试与无设置文件时使用）
    pub fn in_memory(settings: Settings) -> Self {
        Self { settings, path: None }
    }

    /// 设置文件路径：优先环境变量，否则当前目录下的默认文件
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// 加载设置；文件不存在时使用默认值，文件损坏时记录警告并使用默认值
    pub fn load(path: &Path) -> Self {
        let settings = if path.exists() {
            match read_json_file::<Settings>(path) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!("设置文件无法读取，使用默认设置: {} ({})", path.display(), e);
                    Settings::default()
                }
            }
        } else {
            Settings::default()
        };
        Self {
            settings,
            path: Some(path.to_path_buf()),
        }
    }

    /// 写回设置文件
    pub fn save(&self) -> Result<(), AppError> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| AppError::State("设置文件路径未设置".into()))?;
        write_json_file(path, &self.settings)
    }
}

impl ConfigStore for ConfigState {
    fn live_transform_enabled(&self) -> bool {
        self.settings.live_transform_enabled
    }

    fn set_live_transform(&mut self, enabled: bool) {
        self.settings.live_transform_enabled = enabled;
        tracing::info!("实时转换: {}", if enabled { "开启" } else { "关闭" });
        if self.path.is_some() {
            if let Err(e) = self.save() {
                tracing::warn!("设置保存失败: {}", e);
            }
        }
    }
}
