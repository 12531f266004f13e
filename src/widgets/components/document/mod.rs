use thiserror::Error;
use tracing::{debug, info};

use crate::core::record::{Collection, Record};
use crate::core::schema::Schema;
use crate::core::value::Value;
use crate::terminal::KeyEvent;
use crate::ui::scrim::{BoxScrim, Scrim};
use crate::ui::span::Span;
use crate::ui::style::{Color, Style};
use crate::ui::table::{RenderedTable, render_editor};
use crate::widgets::base::WidgetBase;
use crate::widgets::components::tabular::{
    Activation, ArrayEditor, ArrayHandler, EditorOptions, EditorView, KeyOutcome, ObjectEditor,
};
use crate::widgets::traits::{
    DrawOutput, Drawable, InteractionResult, Interactive, RenderContext,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentMode {
    Object,
    Array,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document is {found}, expected {expected}")]
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// The value being edited. Absence is kept distinct from an empty container.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Object(Option<Record>),
    Array(Option<Collection>),
}

impl Document {
    pub fn empty(mode: DocumentMode) -> Self {
        match mode {
            DocumentMode::Object => Self::Object(None),
            DocumentMode::Array => Self::Array(None),
        }
    }

    /// Without an explicit mode the shape of `json` decides; `null` falls
    /// back to an absent array.
    pub fn from_json(
        json: serde_json::Value,
        mode: Option<DocumentMode>,
    ) -> Result<Self, DocumentError> {
        match (Value::from_json(json), mode) {
            (Value::None, mode) => Ok(Self::empty(mode.unwrap_or(DocumentMode::Array))),
            (Value::Object(record), None | Some(DocumentMode::Object)) => {
                Ok(Self::Object(Some(record)))
            }
            (Value::List(items), None | Some(DocumentMode::Array)) => {
                Ok(Self::Array(Some(items)))
            }
            (value, mode) => Err(DocumentError::ShapeMismatch {
                expected: match mode {
                    Some(DocumentMode::Object) => "an object",
                    _ => "an array",
                },
                found: shape_name(&value),
            }),
        }
    }

    pub fn mode(&self) -> DocumentMode {
        match self {
            Self::Object(_) => DocumentMode::Object,
            Self::Array(_) => DocumentMode::Array,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Object(Some(record)) => Value::Object(record.clone()),
            Self::Array(Some(items)) => Value::List(items.clone()),
            Self::Object(None) | Self::Array(None) => Value::None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.to_value().to_json()
    }
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::None => "null",
        Value::Text(_) => "a string",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::Object(_) => "an object",
        Value::List(_) => "an array",
    }
}

enum RootEditor {
    Object(ObjectEditor),
    Array(ArrayEditor),
}

impl RootEditor {
    fn for_mode(mode: DocumentMode, schema: &Schema, options: EditorOptions) -> Self {
        match mode {
            DocumentMode::Object => {
                Self::Object(ObjectEditor::new(schema.clone()).with_options(options))
            }
            DocumentMode::Array => {
                Self::Array(ArrayEditor::new(schema.clone()).with_options(options))
            }
        }
    }
}

/// Data owner of the root editor. Holds the document, applies every update
/// the editors emit, and exposes the whole thing as a widget.
pub struct DocumentEditor {
    base: WidgetBase,
    schema: Schema,
    options: EditorOptions,
    document: Document,
    root: RootEditor,
    scrim: Box<dyn Scrim>,
}

impl DocumentEditor {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        schema: Schema,
        document: Document,
    ) -> Self {
        let options = EditorOptions::default();
        let root = RootEditor::for_mode(document.mode(), &schema, options.clone());
        Self {
            base: WidgetBase::new(id, label),
            schema,
            options,
            document,
            root,
            scrim: Box::new(BoxScrim::new()),
        }
    }

    pub fn with_options(mut self, options: EditorOptions) -> Self {
        self.root = RootEditor::for_mode(self.document.mode(), &self.schema, options.clone());
        self.options = options;
        self
    }

    pub fn with_scrim(mut self, scrim: Box<dyn Scrim>) -> Self {
        self.scrim = scrim;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.document.to_json()
    }

    pub fn view(&self) -> EditorView {
        match (&self.root, &self.document) {
            (RootEditor::Object(editor), Document::Object(record)) => {
                editor.view(record.as_ref())
            }
            (RootEditor::Array(editor), Document::Array(items)) => editor.view(items.as_ref()),
            // Root editor and document are rebuilt together in set_value.
            (RootEditor::Object(editor), Document::Array(_)) => editor.view(None),
            (RootEditor::Array(editor), Document::Object(_)) => editor.view(None),
        }
    }

    /// Rendered editor with the label line on top. `focus_line` already
    /// accounts for the label.
    pub fn render(&self) -> RenderedTable {
        let mut table = render_editor(&self.view(), self.scrim.as_ref(), 0);
        if !self.base.label().is_empty() {
            table.lines.insert(
                0,
                vec![Span::styled(
                    self.base.label(),
                    Style::new().color(Color::Cyan).bold(),
                )],
            );
            table.focus_line = table.focus_line.map(|line| line + 1);
        }
        table
    }

    /// Runs one activation against the current document. Every update the
    /// editors emit lands in the document before this returns.
    pub fn activate(&mut self, activation: Activation) -> InteractionResult {
        match (&mut self.root, &mut self.document) {
            (RootEditor::Object(editor), Document::Object(record)) => {
                let current = record.clone();
                editor.activate(
                    current.as_ref(),
                    activation,
                    &mut |updated: Record| {
                        info!(fields = updated.len(), "document updated");
                        *record = Some(updated);
                    },
                )
            }
            (RootEditor::Array(editor), Document::Array(items)) => {
                let current = items.clone();
                let mut owner = CollectionOwner { items };
                editor.activate(current.as_ref(), activation, &mut owner)
            }
            _ => {
                debug!("root editor does not match the document shape");
                InteractionResult::ignored()
            }
        }
    }

    fn translate_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match (&mut self.root, &self.document) {
            (RootEditor::Object(editor), Document::Object(record)) => {
                editor.translate_key(record.as_ref(), key)
            }
            (RootEditor::Array(editor), Document::Array(items)) => {
                editor.translate_key(items.as_ref(), key)
            }
            _ => KeyOutcome::Ignored,
        }
    }
}

/// Owner of the root collection: rebuilds it for every element event.
struct CollectionOwner<'a> {
    items: &'a mut Option<Collection>,
}

impl ArrayHandler for CollectionOwner<'_> {
    fn update_element(&mut self, updated: Record, index: usize) {
        let items = self.items.take().unwrap_or_default();
        if index >= items.len() {
            debug!(index, len = items.len(), "update for a missing element ignored");
        }
        *self.items = Some(items.with_element(index, Value::Object(updated)));
    }

    fn remove_element(&mut self, _removed: Value, index: usize) {
        let items = self.items.take().unwrap_or_default();
        info!(index, "element removed from document");
        *self.items = Some(items.without_element(index));
    }

    fn add_element(&mut self, element: Record) -> bool {
        let items = self.items.take().unwrap_or_default();
        info!(index = items.len(), "element appended to document");
        *self.items = Some(items.appended(Value::Object(element)));
        true
    }
}

impl Drawable for DocumentEditor {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label()
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let mut lines = self.render().lines;
        if !self.base.label().is_empty()
            && let Some(title) = lines.first_mut()
        {
            let focused = self.base.is_focused(ctx);
            title.insert(0, Span::new(format!("{} ", self.base.focus_marker(focused))));
        }
        DrawOutput { lines }
    }
}

impl Interactive for DocumentEditor {
    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        match self.translate_key(key) {
            KeyOutcome::Ignored => InteractionResult::ignored(),
            KeyOutcome::Handled => InteractionResult::handled(),
            KeyOutcome::Activate(activation) => {
                debug!(?activation, "key activation");
                self.activate(activation)
            }
        }
    }

    fn value(&self) -> Option<Value> {
        Some(self.document.to_value())
    }

    /// Replaces the document. The shape of `value` picks the mode; anything
    /// else clears the document in its current mode. Editor state is reset.
    fn set_value(&mut self, value: Value) {
        self.document = match value {
            Value::Object(record) => Document::Object(Some(record)),
            Value::List(items) => Document::Array(Some(items)),
            _ => Document::empty(self.document.mode()),
        };
        self.root = RootEditor::for_mode(self.document.mode(), &self.schema, self.options.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::{Document, DocumentEditor, DocumentError, DocumentMode};
    use crate::core::record::{Collection, Record};
    use crate::core::schema::{FieldKind, FieldSpec, Schema};
    use crate::core::value::Value;
    use crate::terminal::{KeyCode, KeyEvent, TerminalSize};
    use crate::ui::span::line_text;
    use crate::ui::scrim::BoxScrim;
    use crate::widgets::components::tabular::{Activation, CellView, RowTarget};
    use crate::widgets::traits::{Drawable, Interactive, RenderContext};
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new()
            .field("name", FieldSpec::new(FieldKind::String).required())
            .field(
                "tags",
                FieldSpec::new(FieldKind::Array(
                    Schema::new().field("label", FieldSpec::new(FieldKind::String)),
                )),
            )
    }

    #[test]
    fn document_shape_follows_json_unless_mode_is_given() {
        let object = Document::from_json(json!({"name": "a"}), None).expect("object document");
        assert_eq!(object.mode(), DocumentMode::Object);

        let empty = Document::from_json(json!(null), None).expect("null document");
        assert_eq!(empty, Document::Array(None));

        let Err(DocumentError::ShapeMismatch { expected, found }) =
            Document::from_json(json!([1]), Some(DocumentMode::Object))
        else {
            panic!("array data in object mode should be rejected");
        };
        assert_eq!((expected, found), ("an object", "an array"));
    }

    #[test]
    fn object_document_takes_every_edit() {
        let mut editor =
            DocumentEditor::new("doc", "", schema(), Document::Object(None));

        editor.activate(Activation::input(RowTarget::Element(0), "name", "Ada"));

        assert_eq!(editor.to_json(), json!({"name": "Ada"}));
    }

    #[test]
    fn array_document_adds_and_removes_through_keys() {
        let mut editor = DocumentEditor::new("doc", "", schema(), Document::Array(None));

        editor.on_key(KeyEvent::plain(KeyCode::Char('x')));
        editor.on_key(KeyEvent::plain(KeyCode::Tab));
        editor.on_key(KeyEvent::plain(KeyCode::Tab));
        editor.on_key(KeyEvent::plain(KeyCode::Enter));
        assert_eq!(editor.to_json(), json!([{"name": "x"}]));

        editor.on_key(KeyEvent::plain(KeyCode::Up));
        editor.on_key(KeyEvent::plain(KeyCode::Enter));
        assert_eq!(editor.to_json(), json!([]));
    }

    #[test]
    fn nested_array_edit_lands_in_the_document() {
        let items = Collection::from_vec(vec![Value::Object(
            Record::new()
                .with_field("name", Value::from("a"))
                .with_field("tags", Value::List(Collection::new())),
        )]);
        let mut editor =
            DocumentEditor::new("doc", "", schema(), Document::Array(Some(items)));
        let row = RowTarget::Element(0);

        editor.activate(Activation::open(row, "tags"));
        editor.activate(Activation::input(RowTarget::Pending, "label", "red").within(row, "tags"));
        editor.activate(Activation::commit().within(row, "tags"));

        assert_eq!(
            editor.to_json(),
            json!([{"name": "a", "tags": [{"label": "red"}]}])
        );
    }

    fn press(editor: &mut DocumentEditor, keys: &[KeyCode]) {
        for key in keys {
            editor.on_key(KeyEvent::plain(*key));
        }
    }

    #[test]
    fn esc_closes_only_the_innermost_nested_editor() {
        let geo = Schema::new().field("lat", FieldSpec::new(FieldKind::Number));
        let address = Schema::new()
            .field("city", FieldSpec::new(FieldKind::String))
            .field("geo", FieldSpec::new(FieldKind::Object(geo)));
        let schema = Schema::new()
            .field("name", FieldSpec::new(FieldKind::String))
            .field("address", FieldSpec::new(FieldKind::Object(address)));
        let data = json!([{"name": "a", "address": {"city": "X", "geo": {"lat": 1}}}]);
        let document = Document::from_json(data, None).expect("array document");
        let mut editor = DocumentEditor::new("doc", "", schema, document);

        press(
            &mut editor,
            &[
                KeyCode::Up,
                KeyCode::Tab,
                KeyCode::Enter,
                KeyCode::Tab,
                KeyCode::Enter,
                KeyCode::Char('5'),
                KeyCode::Esc,
            ],
        );
        let view = editor.view();
        let CellView::Nested {
            overlay: Some(address_view),
            ..
        } = &view.rows[0].cells[1]
        else {
            panic!("address editor should stay open: {:?}", view.rows[0].cells[1]);
        };
        assert!(matches!(
            &address_view.rows[0].cells[1],
            CellView::Nested { overlay: None, .. }
        ));

        press(&mut editor, &[KeyCode::Tab, KeyCode::Char('Y')]);
        assert_eq!(
            editor.to_json(),
            json!([{"name": "a", "address": {"city": "XY", "geo": {"lat": "15"}}}])
        );
    }

    #[test]
    fn opening_an_open_cell_keeps_the_nested_buffer() {
        let data = json!([{"name": "a", "tags": []}]);
        let document = Document::from_json(data.clone(), None).expect("array document");
        let mut editor = DocumentEditor::new("doc", "", schema(), document);
        let row = RowTarget::Element(0);

        editor.activate(Activation::open(row, "tags"));
        editor.activate(Activation::input(RowTarget::Pending, "label", "re").within(row, "tags"));
        let again = editor.activate(Activation::open(row, "tags"));

        assert!(again.handled);
        let view = editor.view();
        let CellView::Nested {
            overlay: Some(tags),
            ..
        } = &view.rows[0].cells[1]
        else {
            panic!("tags editor should stay open");
        };
        let pending = tags.rows.last().expect("pending row");
        assert!(matches!(
            &pending.cells[0],
            CellView::Scalar { text, .. } if text == "re"
        ));
        assert_eq!(editor.to_json(), data);
    }

    #[test]
    fn custom_scrim_presents_nested_editors() {
        let items = Collection::from_vec(vec![Value::Object(
            Record::new().with_field("tags", Value::List(Collection::new())),
        )]);
        let mut editor = DocumentEditor::new("doc", "", schema(), Document::Array(Some(items)))
            .with_scrim(Box::new(BoxScrim::new().with_indent(4)));

        editor.activate(Activation::open(RowTarget::Element(0), "tags"));

        let texts: Vec<String> = editor.render().lines.iter().map(|line| line_text(line)).collect();
        let title = texts
            .iter()
            .find(|text| text.contains("tags · row 1"))
            .expect("nested editor title");
        assert!(title.starts_with("    ╭─"), "{texts:?}");
    }

    #[test]
    fn draw_marks_the_label_when_focused() {
        let editor = DocumentEditor::new("doc", "People", schema(), Document::Array(None));
        let size = TerminalSize {
            width: 80,
            height: 24,
        };

        let focused = editor.draw(&RenderContext::new(size).with_focus("doc"));
        let unfocused = editor.draw(&RenderContext::new(size));

        assert_eq!(line_text(&focused.lines[0]), "❯ People");
        assert_eq!(line_text(&unfocused.lines[0]), "  People");
    }

    #[test]
    fn set_value_switches_mode_and_value_reports_it() {
        let mut editor = DocumentEditor::new("doc", "Doc", schema(), Document::Array(None));
        let record = Record::new().with_field("name", Value::from("b"));

        editor.set_value(Value::Object(record.clone()));

        assert_eq!(editor.value(), Some(Value::Object(record)));
        assert_eq!(editor.document().mode(), DocumentMode::Object);
        let rendered = editor.render();
        assert_eq!(rendered.focus_line, Some(4));
    }
}
