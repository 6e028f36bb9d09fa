//! 编辑会话：文本编辑弹窗的本地状态机
//!
//! Idle --begin_edit--> Editing --save(成功)/cancel--> Idle
//!
//! 只有保存成功才会写回文档状态源，其余转换都只改本地状态。

use serde_json::Value;
use thiserror::Error;

use crate::model::stores::{DocumentSnapshot, DocumentStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Idle,
    Editing,
}

#[derive(Error, Debug)]
pub enum EditError {
    #[error("当前不在编辑状态")]
    NotEditing,
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
pub struct EditSession {
    mode: EditMode,
    draft_text: String,
    error_message: Option<String>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditMode::Editing
    }

    /// 草稿文本，Idle 时总是空串
    pub fn draft_text(&self) -> &str {
        &self.draft_text
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// 进入编辑：用当前文档内容的格式化文本（两空格缩进）作为草稿
    pub fn begin_edit(&mut self, snapshot: &DocumentSnapshot) {
        self.draft_text = seed_draft(snapshot.content.as_ref());
        self.error_message = None;
        self.mode = EditMode::Editing;
        tracing::info!("进入编辑模式，草稿长度: {} 字符", self.draft_text.len());
    }

    /// 原样替换草稿，不做校验，也不清除上次保存的错误
    pub fn update_draft(&mut self, text: &str) {
        if !self.is_editing() {
            tracing::debug!("非编辑状态，忽略草稿更新");
            return;
        }
        self.draft_text.clear();
        self.draft_text.push_str(text);
    }

    /// 解析草稿并整体替换文档内容；失败时保留草稿并记录错误信息
    pub fn save<S>(&mut self, store: &mut S) -> Result<(), EditError>
    where
        S: DocumentStore + ?Sized,
    {
        if !self.is_editing() {
            return Err(EditError::NotEditing);
        }
        match serde_json::from_str::<Value>(&self.draft_text) {
            Ok(parsed) => {
                store.set_contents(parsed);
                self.reset();
                tracing::info!("编辑已保存");
                Ok(())
            }
            Err(e) => {
                let err = EditError::InvalidJson(e);
                self.error_message = Some(err.to_string());
                tracing::warn!("保存失败: {}", err);
                Err(err)
            }
        }
    }

    /// 放弃草稿，文档保持不变
    pub fn cancel(&mut self) {
        if !self.is_editing() {
            return;
        }
        self.reset();
        tracing::info!("编辑已取消");
    }

    fn reset(&mut self) {
        self.draft_text.clear();
        self.error_message = None;
        self.mode = EditMode::Idle;
    }
}

/// 没有内容或内容为“假值”（null/false/0/空串）时以空对象作为草稿
fn seed_draft(content: Option<&Value>) -> String {
    match content {
        Some(value) if !is_falsy(value) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
        }
        _ => "{}".to_string(),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::data_core::AppState;
    use serde_json::json;

    fn store_with(value: Value) -> AppState {
        let mut state = AppState::default();
        state.set_contents(value);
        state
    }

    #[test]
    fn test_begin_edit_seeds_pretty_draft() {
        let store = store_with(json!({"a": 1}));
        let mut session = EditSession::new();

        session.begin_edit(&store.snapshot());
        assert_eq!(session.mode(), EditMode::Editing);
        assert_eq!(session.draft_text(), "{\n  \"a\": 1\n}");
        assert!(session.error_message().is_none());
    }

    #[test]
    fn test_begin_edit_keeps_key_order() {
        let mut store = AppState::default();
        store.load_str(None, r#"{"zeta": 1, "alpha": {"y": 2, "b": 3}}"#).unwrap();
        let mut session = EditSession::new();

        session.begin_edit(&store.snapshot());
        assert_eq!(
            session.draft_text(),
            "{\n  \"zeta\": 1,\n  \"alpha\": {\n    \"y\": 2,\n    \"b\": 3\n  }\n}"
        );
    }

    #[test]
    fn test_begin_edit_without_content_seeds_empty_object() {
        let mut session = EditSession::new();
        session.begin_edit(&DocumentSnapshot::default());
        assert_eq!(session.draft_text(), "{}");
    }

    #[test]
    fn test_begin_edit_with_falsy_content_seeds_empty_object() {
        let mut session = EditSession::new();
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            let store = store_with(value.clone());
            session.begin_edit(&store.snapshot());
            assert_eq!(session.draft_text(), "{}", "假值内容应以空对象作为草稿: {}", value);
        }

        for (value, expected) in [(json!(true), "true"), (json!(7), "7"), (json!("x"), "\"x\""), (json!([]), "[]")] {
            let store = store_with(value);
            session.begin_edit(&store.snapshot());
            assert_eq!(session.draft_text(), expected);
        }
    }

    #[test]
    fn test_save_valid_draft_replaces_content() {
        let mut store = store_with(json!({"a": 1}));
        let mut session = EditSession::new();

        session.begin_edit(&store.snapshot());
        session.update_draft(r#"{"a":2}"#);
        assert!(session.save(&mut store).is_ok());

        assert_eq!(session.mode(), EditMode::Idle);
        assert_eq!(session.draft_text(), "");
        assert!(session.error_message().is_none());
        assert_eq!(store.snapshot().content, Some(json!({"a": 2})));
    }

    #[test]
    fn test_save_invalid_draft_stays_editing() {
        let mut store = store_with(json!({"a": 1}));
        let before = store.snapshot();
        let mut session = EditSession::new();

        session.begin_edit(&before);
        session.update_draft("{bad json");
        let result = session.save(&mut store);

        assert!(matches!(result, Err(EditError::InvalidJson(_))));
        assert_eq!(session.mode(), EditMode::Editing);
        assert_eq!(session.draft_text(), "{bad json", "草稿应保留以便修改");
        let message = session.error_message().expect("应有错误信息");
        assert!(message.starts_with("Invalid JSON: "), "错误信息: {}", message);
        assert_eq!(store.snapshot(), before, "文档不应被修改");
    }

    #[test]
    fn test_error_survives_typing_until_save() {
        let mut store = store_with(json!({}));
        let mut session = EditSession::new();

        session.begin_edit(&store.snapshot());
        session.update_draft("[1,");
        let _ = session.save(&mut store);
        assert!(session.error_message().is_some());

        session.update_draft("[1, 2]");
        assert!(session.error_message().is_some(), "输入时不清除旧错误");

        session.save(&mut store).unwrap();
        assert!(session.error_message().is_none());
        assert_eq!(store.snapshot().content, Some(json!([1, 2])));
    }

    #[test]
    fn test_reentering_edit_clears_error_and_reseeds() {
        let mut store = store_with(json!({"k": "v"}));
        let mut session = EditSession::new();

        session.begin_edit(&store.snapshot());
        session.update_draft("nope");
        let _ = session.save(&mut store);

        session.begin_edit(&store.snapshot());
        assert!(session.error_message().is_none());
        assert_eq!(session.draft_text(), "{\n  \"k\": \"v\"\n}", "不应沿用旧草稿");
    }

    #[test]
    fn test_cancel_discards_draft() {
        let store = store_with(json!({"a": 1}));
        let before = store.snapshot();
        let mut session = EditSession::new();

        session.begin_edit(&before);
        session.update_draft(r#"{"a": 99}"#);
        session.cancel();

        assert_eq!(session.mode(), EditMode::Idle);
        assert_eq!(session.draft_text(), "");
        assert!(session.error_message().is_none());
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_cancel_after_failed_save_clears_error() {
        let mut store = store_with(json!({"a": 1}));
        let before = store.snapshot();
        let mut session = EditSession::new();

        session.begin_edit(&before);
        session.update_draft("{bad");
        assert!(session.save(&mut store).is_err());
        assert!(session.error_message().is_some(), "保存失败后应有错误信息");

        session.cancel();
        assert_eq!(session.mode(), EditMode::Idle);
        assert!(session.error_message().is_none(), "取消后错误信息应清除");
        assert_eq!(session.draft_text(), "");
        assert_eq!(store.snapshot(), before, "文档不应被修改");
    }

    #[test]
    fn test_idle_operations_are_ignored() {
        let mut store = store_with(json!({"a": 1}));
        let mut session = EditSession::new();

        session.update_draft("ignored");
        assert_eq!(session.draft_text(), "");

        assert!(matches!(session.save(&mut store), Err(EditError::NotEditing)));
        assert!(session.error_message().is_none(), "空闲时保存不产生错误信息");

        session.cancel();
        assert_eq!(session.mode(), EditMode::Idle);
        assert_eq!(store.snapshot().content, Some(json!({"a": 1})));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn json_value() -> impl Strategy<Value = Value> {
            let leaf = prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::Bool),
                any::<i64>().prop_map(|n| json!(n)),
                "[a-z0-9 ]{0,8}".prop_map(Value::String),
            ];
            leaf.prop_recursive(3, 24, 4, |inner| {
                prop_oneof![
                    prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                    prop::collection::vec(("[a-z]{1,4}", inner), 0..4).prop_map(|entries| {
                        Value::Object(entries.into_iter().collect())
                    }),
                ]
            })
        }

        proptest! {
            #[test]
            fn valid_draft_always_saves(value in json_value()) {
                let mut store = store_with(json!({"seed": true}));
                let mut session = EditSession::new();
                let text = serde_json::to_string(&value).unwrap();

                session.begin_edit(&store.snapshot());
                session.update_draft(&text);
                prop_assert!(session.save(&mut store).is_ok());
                prop_assert_eq!(session.mode(), EditMode::Idle);
                prop_assert!(session.error_message().is_none());
                prop_assert_eq!(store.snapshot().content, Some(value));
            }

            #[test]
            fn invalid_draft_never_touches_store(tail in "[a-z ]{0,12}") {
                let mut store = store_with(json!({"seed": true}));
                let before = store.snapshot();
                let mut session = EditSession::new();
                let text = format!("{{{}", tail);

                session.begin_edit(&before);
                session.update_draft(&text);
                prop_assert!(session.save(&mut store).is_err());
                prop_assert_eq!(session.mode(), EditMode::Editing);
                prop_assert!(session.error_message().is_some());
                prop_assert_eq!(session.draft_text(), text.as_str());
                prop_assert_eq!(store.snapshot(), before);
            }

            #[test]
            fn cancel_never_touches_store(text in ".{0,40}") {
                let store = store_with(json!({"seed": true}));
                let before = store.snapshot();
                let mut session = EditSession::new();

                session.begin_edit(&before);
                session.update_draft(&text);
                session.cancel();
                prop_assert_eq!(session.mode(), EditMode::Idle);
                prop_assert!(session.error_message().is_none());
                prop_assert_eq!(store.snapshot(), before);
            }
        }
    }
}
