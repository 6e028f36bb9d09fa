//! VM桥接层：连接Slint UI与底栏视图模型
//!
//! 注意：此模块的具体实现在main.rs中，因为依赖于Slint生成的类型
//! 这里只提供公共常量

// === 常量定义（消除魔法值） ===
pub const STATUS_READY: &str = "就绪";
pub const STATUS_LOADED: &str = "文件加载完成";
pub const STATUS_SAVED: &str = "编辑已保存";
pub const STATUS_CANCELLED: &str = "编辑已取消";
pub const STATUS_TRANSFORMED: &str = "已执行转换";
pub const STATUS_ERROR_PREFIX: &str = "错误: ";
pub const NO_DOCUMENT_TEXT: &str = "尚未打开文档";
