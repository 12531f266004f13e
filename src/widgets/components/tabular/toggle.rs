use crate::core::record::Record;
use crate::core::schema::{FieldSpec, Schema};
use crate::core::value::Value;
use crate::terminal::KeyEvent;
use crate::widgets::components::tabular::activation::{Activation, KeyOutcome};
use crate::widgets::components::tabular::array::ArrayEditor;
use crate::widgets::components::tabular::handler::NestedArrayHandler;
use crate::widgets::components::tabular::object::ObjectEditor;
use crate::widgets::components::tabular::view::EditorView;
use crate::widgets::traits::InteractionResult;
use tracing::debug;

const NESTED_CLASS: &str = "editor--inside";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToggleState {
    #[default]
    Closed,
    Open,
}

pub enum NestedEditor {
    Object(ObjectEditor),
    Array(ArrayEditor),
}

impl NestedEditor {
    /// Array editor for list values, object editor for everything else.
    fn for_value(schema: &Schema, current: Option<&Value>) -> Self {
        if current.is_some_and(Value::is_list) {
            Self::Array(ArrayEditor::new(schema.clone()).with_class_name(NESTED_CLASS))
        } else {
            Self::Object(ObjectEditor::new(schema.clone()).with_class_name(NESTED_CLASS))
        }
    }

    fn fits(&self, current: Option<&Value>) -> bool {
        let is_list = current.is_some_and(Value::is_list);
        matches!((self, is_list), (Self::Array(_), true) | (Self::Object(_), false))
    }

    fn view(&self, current: Option<&Value>) -> EditorView {
        match self {
            Self::Object(editor) => editor.view(current.and_then(Value::as_record)),
            Self::Array(editor) => editor.view(current.and_then(Value::as_collection)),
        }
    }
}

/// Open/closed state of one nested cell plus the editor it owns while open.
#[derive(Default)]
pub struct NestedToggle {
    state: ToggleState,
    editor: Option<NestedEditor>,
}

impl NestedToggle {
    pub fn state(&self) -> ToggleState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ToggleState::Open
    }

    pub fn editor(&self) -> Option<&NestedEditor> {
        self.editor.as_ref()
    }

    /// Returns `false` when already open.
    pub fn open(&mut self) -> bool {
        if self.is_open() {
            return false;
        }
        self.state = ToggleState::Open;
        true
    }

    /// Closes the cell and drops the nested editor's session state. Values
    /// already propagated through the owning row are unaffected.
    pub fn dismiss(&mut self) -> bool {
        if !self.is_open() {
            return false;
        }
        self.state = ToggleState::Closed;
        self.editor = None;
        true
    }

    pub fn view(&self, spec: &FieldSpec, current: Option<&Value>) -> Option<EditorView> {
        if !self.is_open() {
            return None;
        }
        let schema = spec.kind.nested_schema()?;
        match &self.editor {
            Some(editor) if editor.fits(current) => Some(editor.view(current)),
            _ => Some(NestedEditor::for_value(schema, current).view(current)),
        }
    }

    pub(super) fn translate_key(
        &mut self,
        spec: &FieldSpec,
        current: Option<&Value>,
        key: KeyEvent,
    ) -> KeyOutcome {
        let Some(editor) = self.editor_mut(spec, current) else {
            return KeyOutcome::Ignored;
        };
        match editor {
            NestedEditor::Object(editor) => {
                editor.translate_key(current.and_then(Value::as_record), key)
            }
            NestedEditor::Array(editor) => {
                editor.translate_key(current.and_then(Value::as_collection), key)
            }
        }
    }

    /// Routes `activation` into the open editor; whatever the editor emits
    /// reaches `on_change` as the field's new value.
    pub(super) fn forward(
        &mut self,
        spec: &FieldSpec,
        current: Option<&Value>,
        activation: Activation,
        on_change: &mut dyn FnMut(Value),
    ) -> InteractionResult {
        let Some(editor) = self.editor_mut(spec, current) else {
            debug!("activation for a closed nested cell ignored");
            return InteractionResult::ignored();
        };
        match editor {
            NestedEditor::Object(editor) => editor.activate(
                current.and_then(Value::as_record),
                activation,
                &mut |updated: Record| on_change(Value::Object(updated)),
            ),
            NestedEditor::Array(editor) => {
                let collection = current
                    .and_then(Value::as_collection)
                    .cloned()
                    .unwrap_or_default();
                let mut handler = NestedArrayHandler {
                    current: collection.clone(),
                    on_change,
                };
                editor.activate(Some(&collection), activation, &mut handler)
            }
        }
    }

    fn editor_mut(
        &mut self,
        spec: &FieldSpec,
        current: Option<&Value>,
    ) -> Option<&mut NestedEditor> {
        if !self.is_open() {
            return None;
        }
        let schema = spec.kind.nested_schema()?;
        if !self.editor.as_ref().is_some_and(|editor| editor.fits(current)) {
            self.editor = Some(NestedEditor::for_value(schema, current));
        }
        self.editor.as_mut()
    }
}
