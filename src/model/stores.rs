//! 底栏依赖的三个外部状态源（窄接口，便于测试替换）

use serde_json::Value;

use crate::model::format::FileFormat;

/// 文档在某一时刻的只读快照
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentSnapshot {
    /// 文档名（通常是文件名），未打开文件时为空
    pub name: Option<String>,
    /// 已解析的文档内容
    pub content: Option<Value>,
    pub format: FileFormat,
    /// 最近一次解析失败的原因，与编辑会话的错误相互独立
    pub error: Option<String>,
}

/// 文档状态源
pub trait DocumentStore {
    fn snapshot(&self) -> DocumentSnapshot;
    /// 整体替换文档内容（不做合并）
    fn set_contents(&mut self, value: Value);
    fn set_format(&mut self, format: FileFormat);
}

/// 配置状态源
pub trait ConfigStore {
    fn live_transform_enabled(&self) -> bool;
    fn set_live_transform(&mut self, enabled: bool);
}

/// 图视图状态源
pub trait GraphStore {
    fn fullscreen(&self) -> bool;
    fn set_fullscreen(&mut self, fullscreen: bool);
}
