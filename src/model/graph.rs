//! 图视图状态源：全屏（隐藏侧栏）开关

use crate::model::stores::GraphStore;

#[derive(Debug, Default)]
pub struct GraphState {
    pub fullscreen: bool,
}

impl GraphStore for GraphState {
    fn fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn set_fullscreen(&mut self, fullscreen: bool) {
        tracing::info!("全屏模式: {}", fullscreen);
        self.fullscreen = fullscreen;
    }
}
