//! 统计事件：尽力而为地上报，任何失败都不影响界面状态

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("统计事件上报失败: {0}")]
    Delivery(String),
}

/// 统计事件接收端
pub trait AnalyticsSink {
    fn emit(&self, event: &str) -> Result<(), AnalyticsError>;
}

/// 默认接收端：写入 analytics 日志目标
#[derive(Debug, Default)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn emit(&self, event: &str) -> Result<(), AnalyticsError> {
        tracing::info!(target: "analytics", event, "统计事件");
        Ok(())
    }
}

/// 不抛错的包装层
pub struct Analytics {
    sink: Box<dyn AnalyticsSink>,
}

impl Analytics {
    pub fn new(sink: Box<dyn AnalyticsSink>) -> Self {
        Self { sink }
    }

    /// 上报事件；失败只记录警告
    pub fn track(&self, event: &str) {
        if let Err(e) = self.sink.emit(event) {
            tracing::warn!("{} ({})", e, event);
        }
    }
}

impl Default for Analytics {
    fn default() -> Self {
        Self::new(Box::new(TracingSink))
    }
}

impl std::fmt::Debug for Analytics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analytics").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    struct FailingSink {
        attempts: Rc<RefCell<u32>>,
    }

    impl AnalyticsSink for FailingSink {
        fn emit(&self, _event: &str) -> Result<(), AnalyticsError> {
            *self.attempts.borrow_mut() += 1;
            Err(AnalyticsError::Delivery("offline".into()))
        }
    }

    #[test]
    fn test_failing_sink_is_swallowed() {
        let attempts = Rc::new(RefCell::new(0));
        let analytics = Analytics::new(Box::new(FailingSink {
            attempts: attempts.clone(),
        }));

        analytics.track("toggle_fullscreen");
        analytics.track("toggle_fullscreen");
        assert_eq!(*attempts.borrow(), 2, "每次只尝试一次，不重试");
    }
}
