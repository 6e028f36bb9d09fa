//! 程序入口：初始化配置与日志、加载 Slint UI，并完成底栏 VM 绑定

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use anyhow::Context;
use slint::{ComponentHandle, ModelRc, VecModel};
use tracing_subscriber::fmt::SubscriberBuilder;

slint::include_modules!();

use json_canvas::model::{
    analytics::Analytics,
    bottom_bar::{BottomBar, BottomBarView, Dispatch, FormatMenuItem, Icon, Intent, Validity},
    config::ConfigState,
    data_core::AppState,
    format::FileFormat,
    graph::GraphState,
};
use json_canvas::vm::bridge::*;

// FormatEntry转换实现
impl From<&FormatMenuItem> for FormatEntry {
    fn from(item: &FormatMenuItem) -> Self {
        Self {
            value: item.value.as_str().into(),
            label: item.label.into(),
            active: item.active,
        }
    }
}

/// VM桥接器：管理UI与底栏视图模型的交互
struct ViewModelBridge {
    app_state: Rc<RefCell<AppState>>,
    bottom_bar: Rc<RefCell<BottomBar>>,
}

impl ViewModelBridge {
    /// 创建新的VM桥接器并绑定所有回调
    fn new(app_window: &AppWindow, app_state: Rc<RefCell<AppState>>, bottom_bar: Rc<RefCell<BottomBar>>) -> Self {
        let bridge = Self { app_state, bottom_bar };
        bridge.setup_callbacks(app_window);
        bridge
    }

    /// 设置所有UI回调函数
    fn setup_callbacks(&self, app_window: &AppWindow) {
        // === 打开文件回调 ===
        {
            let app_state = self.app_state.clone();
            let bottom_bar = self.bottom_bar.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_open_file(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_open_file(&app_window, &app_state, &bottom_bar);
                }
            });
        }

        // === 底栏意图回调 ===
        self.bind_intent(app_window, |w, f| w.on_toggle_fullscreen(f), || Intent::ToggleFullscreen);
        self.bind_intent(app_window, |w, f| w.on_begin_edit(f), || Intent::BeginEdit);
        self.bind_intent(app_window, |w, f| w.on_toggle_live_transform(f), || Intent::ToggleLiveTransform);
        self.bind_intent(app_window, |w, f| w.on_run_transform(f), || Intent::RunTransform);
        self.bind_intent(app_window, |w, f| w.on_save_edit(f), || Intent::Save);
        self.bind_intent(app_window, |w, f| w.on_cancel_edit(f), || Intent::Cancel);

        // === 格式选择回调 ===
        {
            let app_state = self.app_state.clone();
            let bottom_bar = self.bottom_bar.clone();
            let app_window_weak = app_window.as_weak();
            app_window.on_format_selected(move |value| {
                let Some(app_window) = app_window_weak.upgrade() else {
                    return;
                };
                match FileFormat::from_value(value.as_str()) {
                    Some(format) => {
                        Self::handle_intent(&app_window, &app_state, &bottom_bar, Intent::SelectFormat(format))
                    }
                    None => tracing::warn!("未知格式: {}", value),
                }
            });
        }

        // === 草稿编辑回调（逐键），不重绘弹窗以免打断输入 ===
        {
            let bottom_bar = self.bottom_bar.clone();
            app_window.on_draft_edited(move |text| {
                if let Err(e) = bottom_bar.borrow_mut().dispatch(Intent::UpdateDraft(text.to_string())) {
                    tracing::warn!("草稿更新失败: {}", e);
                }
            });
        }
    }

    /// 绑定一个无参回调到固定意图
    fn bind_intent(
        &self,
        app_window: &AppWindow,
        register: impl FnOnce(&AppWindow, Box<dyn Fn()>),
        intent: fn() -> Intent,
    ) {
        let app_state = self.app_state.clone();
        let bottom_bar = self.bottom_bar.clone();
        let app_window_weak = app_window.as_weak();
        register(
            app_window,
            Box::new(move || {
                if let Some(app_window) = app_window_weak.upgrade() {
                    Self::handle_intent(&app_window, &app_state, &bottom_bar, intent());
                }
            }),
        );
    }

    /// 初始化UI状态
    fn initialize_ui(&self, app_window: &AppWindow) {
        app_window.set_status_message(STATUS_READY.into());
        app_window.set_dock_icon(Icon::Dock.glyph().into());
        app_window.set_edit_icon(Icon::Edit.glyph().into());
        app_window.set_transform_icon(Icon::RunAll.glyph().into());
        app_window.set_format_icon(Icon::ArrowUp.glyph().into());
        app_window.set_active_mark(Icon::Checkmark.glyph().into());
        Self::refresh(app_window, &self.app_state, &self.bottom_bar);
    }

    /// 显示文件选择对话框
    fn show_file_dialog() -> Option<PathBuf> {
        use rfd::FileDialog;

        let file_path = FileDialog::new()
            .add_filter("JSON文件", &["json"])
            .add_filter("所有文件", &["*"])
            .set_title("选择要查看的JSON文件")
            .pick_file();

        match file_path {
            Some(path) => {
                tracing::info!("用户选择了文件: {}", path.display());
                Some(path)
            }
            None => {
                tracing::info!("用户取消了文件选择");
                None
            }
        }
    }

    /// 处理打开文件操作
    fn handle_open_file(
        app_window: &AppWindow,
        app_state: &Rc<RefCell<AppState>>,
        bottom_bar: &Rc<RefCell<BottomBar>>,
    ) {
        let Some(file_path) = Self::show_file_dialog() else {
            app_window.set_status_message("未选择文件".into());
            return;
        };

        let load_result = app_state.borrow_mut().load_file(&file_path);
        match load_result {
            Ok(()) => {
                app_window.set_status_message(STATUS_LOADED.into());
                tracing::info!("文件加载成功: {}", file_path.display());
            }
            Err(e) => {
                app_window.set_status_message(format!("{}{}", STATUS_ERROR_PREFIX, e).into());
                tracing::error!("文件加载失败: {}", e);
            }
        }
        Self::refresh(app_window, app_state, bottom_bar);
    }

    /// 分派底栏意图并刷新界面
    fn handle_intent(
        app_window: &AppWindow,
        app_state: &Rc<RefCell<AppState>>,
        bottom_bar: &Rc<RefCell<BottomBar>>,
        intent: Intent,
    ) {
        let status = match &intent {
            Intent::Save => Some(STATUS_SAVED),
            Intent::Cancel => Some(STATUS_CANCELLED),
            Intent::RunTransform => Some(STATUS_TRANSFORMED),
            _ => None,
        };

        let result = bottom_bar.borrow_mut().dispatch(intent);
        match result {
            Ok(Dispatch::Applied) => {
                if let Some(status) = status {
                    app_window.set_status_message(status.into());
                }
            }
            Ok(Dispatch::Ignored) => tracing::debug!("底栏操作未生效"),
            // 错误信息已保存在编辑会话中，由弹窗显示
            Err(e) => tracing::warn!("底栏操作失败: {}", e),
        }
        Self::refresh(app_window, app_state, bottom_bar);
    }

    /// 把视图快照写入UI属性
    fn refresh(
        app_window: &AppWindow,
        app_state: &Rc<RefCell<AppState>>,
        bottom_bar: &Rc<RefCell<BottomBar>>,
    ) {
        let (view, title): (BottomBarView, Option<String>) = {
            let mut bar = bottom_bar.borrow_mut();
            (bar.view(), bar.sync_title())
        };

        if let Some(title) = title {
            app_window.set_window_title(title.into());
        }

        {
            let state = app_state.borrow();
            app_window.set_document_name(state.name.clone().unwrap_or_default().into());
            let text = state.pretty_text().unwrap_or_else(|_| NO_DOCUMENT_TEXT.to_string());
            app_window.set_document_text(text.into());
        }

        app_window.set_validity_icon(view.validity.icon().glyph().into());
        app_window.set_validity_label(view.validity.label().into());
        match &view.validity {
            Validity::Valid => {
                app_window.set_document_valid(true);
                app_window.set_error_detail("".into());
            }
            Validity::Invalid { detail } => {
                app_window.set_document_valid(false);
                app_window.set_error_detail(detail.as_str().into());
            }
        }

        app_window.set_edit_visible(view.show_edit);
        app_window.set_live_transform_icon(view.live_transform_icon.glyph().into());
        app_window.set_transform_visible(view.transform_button.is_some());
        app_window.set_transform_enabled(view.transform_button.unwrap_or(false));
        app_window.set_fullscreen(view.fullscreen);
        app_window.set_format_label(view.format_label.into());

        let entries: Vec<FormatEntry> = view.formats.iter().map(FormatEntry::from).collect();
        app_window.set_formats(ModelRc::new(VecModel::from(entries)));

        match view.modal {
            Some(modal) => {
                // 仅在进入编辑时写入草稿，避免覆盖正在输入的文本
                if !app_window.get_editing() {
                    app_window.set_draft_text(modal.draft_text.into());
                }
                app_window.set_edit_error(modal.error_message.unwrap_or_default().into());
                app_window.set_editing(true);
            }
            None => {
                app_window.set_editing(false);
                app_window.set_draft_text("".into());
                app_window.set_edit_error("".into());
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = ConfigState::load(&ConfigState::default_path());

    // 初始化日志输出
    let _ = SubscriberBuilder::default()
        .with_max_level(config.settings.max_level())
        .try_init();

    let app = AppWindow::new().context("UI 初始化失败")?;
    let app_state = Rc::new(RefCell::new(AppState::default()));
    let config = Rc::new(RefCell::new(config));
    let graph = Rc::new(RefCell::new(GraphState::default()));
    let bottom_bar = Rc::new(RefCell::new(BottomBar::new(
        app_state.clone(),
        config,
        graph,
        Analytics::default(),
    )));

    // 创建VM桥接器并绑定UI回调
    let bridge = ViewModelBridge::new(&app, app_state, bottom_bar);
    bridge.initialize_ui(&app);

    tracing::info!("应用启动成功，UI已初始化");
    app.run().context("事件循环异常退出")?;
    Ok(())
}
