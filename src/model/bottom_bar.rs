//! 底栏视图模型：读取三个状态源生成渲染快照，并把用户意图分派到对应的 setter

use std::{cell::RefCell, rc::Rc};

use serde_json::Value;

use crate::model::analytics::Analytics;
use crate::model::edit_session::{EditError, EditSession};
use crate::model::format::{FileFormat, FORMATS};
use crate::model::stores::{ConfigStore, DocumentStore, GraphStore};

/// 窗口标题中的应用名
pub const APP_NAME: &str = "JSON Canvas";

pub const EVENT_TOGGLE_FULLSCREEN: &str = "toggle_fullscreen";
pub const EVENT_TOGGLE_LIVE_TRANSFORM: &str = "toggle_live_transform";

/// 底栏使用的图标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Check,
    Error,
    Edit,
    Sync,
    SyncIgnored,
    RunAll,
    Dock,
    ArrowUp,
    Checkmark,
}

impl Icon {
    pub fn glyph(self) -> &'static str {
        match self {
            Icon::Check => "✓",
            Icon::Error => "✗",
            Icon::Edit => "✎",
            Icon::Sync => "⟳",
            Icon::SyncIgnored => "⊘",
            Icon::RunAll => "▶",
            Icon::Dock => "◧",
            Icon::ArrowUp => "↑",
            Icon::Checkmark => "✔",
        }
    }
}

/// 文档有效性指示
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Invalid { detail: String },
}

impl Validity {
    pub fn label(&self) -> &'static str {
        match self {
            Validity::Valid => "Valid",
            Validity::Invalid { .. } => "Invalid",
        }
    }

    pub fn icon(&self) -> Icon {
        match self {
            Validity::Valid => Icon::Check,
            Validity::Invalid { .. } => Icon::Error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatMenuItem {
    pub value: FileFormat,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub draft_text: String,
    pub error_message: Option<String>,
}

/// 一次渲染所需的全部数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BottomBarView {
    pub validity: Validity,
    /// 编辑按钮，仅在空闲时出现
    pub show_edit: bool,
    pub live_transform: bool,
    pub live_transform_icon: Icon,
    /// 手动转换按钮：None 表示不显示，Some(enabled)
    pub transform_button: Option<bool>,
    pub fullscreen: bool,
    pub format_label: String,
    pub formats: Vec<FormatMenuItem>,
    pub modal: Option<ModalView>,
}

/// 意图分派结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Applied,
    /// 当前状态下该意图不生效（如文档有错误时的手动转换）
    Ignored,
}

/// 用户意图
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    BeginEdit,
    UpdateDraft(String),
    Save,
    Cancel,
    ToggleLiveTransform,
    RunTransform,
    ToggleFullscreen,
    SelectFormat(FileFormat),
}

pub struct BottomBar {
    document: Rc<RefCell<dyn DocumentStore>>,
    config: Rc<RefCell<dyn ConfigStore>>,
    graph: Rc<RefCell<dyn GraphStore>>,
    analytics: Analytics,
    session: EditSession,
    titled_name: Option<String>,
}

impl BottomBar {
    pub fn new(
        document: Rc<RefCell<dyn DocumentStore>>,
        config: Rc<RefCell<dyn ConfigStore>>,
        graph: Rc<RefCell<dyn GraphStore>>,
        analytics: Analytics,
    ) -> Self {
        Self {
            document,
            config,
            graph,
            analytics,
            session: EditSession::new(),
            titled_name: None,
        }
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// 生成当前渲染快照
    pub fn view(&self) -> BottomBarView {
        let snapshot = self.document.borrow().snapshot();
        let live_transform = self.config.borrow().live_transform_enabled();
        let fullscreen = self.graph.borrow().fullscreen();

        let validity = match snapshot.error {
            Some(detail) => Validity::Invalid { detail },
            None => Validity::Valid,
        };
        let transform_button = if live_transform {
            None
        } else {
            Some(validity == Validity::Valid)
        };
        let formats = FORMATS
            .iter()
            .map(|d| FormatMenuItem {
                value: d.value,
                label: d.label,
                active: d.value == snapshot.format,
            })
            .collect();
        let modal = self.session.is_editing().then(|| ModalView {
            draft_text: self.session.draft_text().to_string(),
            error_message: self.session.error_message().map(str::to_string),
        });

        BottomBarView {
            validity,
            show_edit: !self.session.is_editing(),
            live_transform,
            live_transform_icon: if live_transform { Icon::Sync } else { Icon::SyncIgnored },
            transform_button,
            fullscreen,
            format_label: snapshot.format.badge(),
            formats,
            modal,
        }
    }

    /// 分派意图；只有保存草稿可能失败，错误信息同时保存在编辑会话中
    pub fn dispatch(&mut self, intent: Intent) -> Result<Dispatch, EditError> {
        match intent {
            Intent::BeginEdit => {
                let snapshot = self.document.borrow().snapshot();
                self.session.begin_edit(&snapshot);
            }
            Intent::UpdateDraft(_) | Intent::Cancel if !self.session.is_editing() => {
                return Ok(Dispatch::Ignored);
            }
            Intent::UpdateDraft(text) => self.session.update_draft(&text),
            Intent::Save => {
                let mut document = self.document.borrow_mut();
                self.session.save(&mut *document)?;
            }
            Intent::Cancel => self.session.cancel(),
            Intent::ToggleLiveTransform => {
                let enabled = self.config.borrow().live_transform_enabled();
                self.config.borrow_mut().set_live_transform(!enabled);
                self.analytics.track(EVENT_TOGGLE_LIVE_TRANSFORM);
            }
            Intent::RunTransform => {
                if self.document.borrow().snapshot().error.is_some() {
                    tracing::debug!("文档存在错误，忽略手动转换");
                    return Ok(Dispatch::Ignored);
                }
                // 用空对象替换内容，不重新解析当前文本
                self.document
                    .borrow_mut()
                    .set_contents(Value::Object(Default::default()));
            }
            Intent::ToggleFullscreen => {
                let fullscreen = self.graph.borrow().fullscreen();
                self.graph.borrow_mut().set_fullscreen(!fullscreen);
                self.analytics.track(EVENT_TOGGLE_FULLSCREEN);
            }
            Intent::SelectFormat(format) => self.document.borrow_mut().set_format(format),
        }
        Ok(Dispatch::Applied)
    }

    /// 文档名变化且非空时返回新的窗口标题
    pub fn sync_title(&mut self) -> Option<String> {
        let name = self.document.borrow().snapshot().name;
        if name == self.titled_name {
            return None;
        }
        self.titled_name = name.clone();
        name.map(|n| format!("{} | {}", n, APP_NAME))
    }
}
