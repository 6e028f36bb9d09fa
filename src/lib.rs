//! JSON Canvas 底栏库
//!
//! 提供文档/配置/图视图状态源、编辑会话状态机与底栏视图模型，
//! 与 Slint 界面解耦，便于在无显示环境下测试

pub mod model;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use model::bottom_bar::{BottomBar, BottomBarView, Dispatch, Intent};
pub use model::data_core::{AppState, AppError};
pub use model::edit_session::{EditError, EditMode, EditSession};
