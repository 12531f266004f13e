use tracing::{debug, info};

use crate::core::record::{Collection, Record};
use crate::core::schema::Schema;
use crate::core::value::Value;
use crate::terminal::{KeyCode, KeyEvent};
use crate::widgets::components::tabular::EditorOptions;
use crate::widgets::components::tabular::activation::{Activation, KeyOutcome, RowTarget};
use crate::widgets::components::tabular::handler::ArrayHandler;
use crate::widgets::components::tabular::pending::PendingRow;
use crate::widgets::components::tabular::row::{RowOutcome, RowState};
use crate::widgets::components::tabular::view::{
    EditorKind, EditorView, RowView, TrailingSlot, columns,
};
use crate::widgets::traits::InteractionResult;

/// One row per element plus a trailing add row. Row state is indexed by
/// position, so it stays with the slot rather than the element.
pub struct ArrayEditor {
    schema: Schema,
    options: EditorOptions,
    rows: Vec<RowState>,
    pending: PendingRow,
    cursor: RowTarget,
    col: usize,
}

impl ArrayEditor {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            options: EditorOptions::default(),
            rows: Vec::new(),
            pending: PendingRow::new(),
            cursor: RowTarget::Pending,
            col: 0,
        }
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.options.class_name = Some(class_name.into());
        self
    }

    pub fn with_options(mut self, options: EditorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn pending(&self) -> &PendingRow {
        &self.pending
    }

    pub fn view(&self, collection: Option<&Collection>) -> EditorView {
        let leading = self.options.leading();
        let fallback = RowState::default();
        let mut rows: Vec<RowView> = collection
            .into_iter()
            .flat_map(Collection::iter)
            .enumerate()
            .map(|(idx, element)| {
                self.rows.get(idx).unwrap_or(&fallback).compose(
                    &self.schema,
                    element.as_record(),
                    RowTarget::Element(idx),
                    &leading,
                    TrailingSlot::Remove,
                )
            })
            .collect();
        rows.push(self.pending.compose(&self.schema));

        let len = collection.map_or(0, Collection::len);
        EditorView {
            kind: EditorKind::Array,
            classes: self.options.classes("editor--array"),
            columns: columns(&self.schema),
            rows,
            focus: Some((clamp_cursor(self.cursor, len), self.col)),
        }
    }

    pub fn translate_key(
        &mut self,
        collection: Option<&Collection>,
        key: KeyEvent,
    ) -> KeyOutcome {
        let len = collection.map_or(0, Collection::len);
        self.sync_rows(len);
        self.cursor = clamp_cursor(self.cursor, len);

        let outcome = match self.cursor {
            RowTarget::Element(idx) => {
                let record = collection
                    .and_then(|collection| collection.get(idx))
                    .and_then(Value::as_record);
                self.rows[idx].translate_key(
                    &self.schema,
                    record,
                    &mut self.col,
                    self.cursor,
                    TrailingSlot::Remove,
                    key,
                )
            }
            RowTarget::Pending => self.pending.translate_key(&self.schema, &mut self.col, key),
        };
        if !matches!(outcome, KeyOutcome::Ignored) {
            return outcome;
        }

        let next = match (key.code, self.cursor) {
            (KeyCode::Up, RowTarget::Element(idx)) if idx > 0 => RowTarget::Element(idx - 1),
            (KeyCode::Up, RowTarget::Pending) if len > 0 => RowTarget::Element(len - 1),
            (KeyCode::Down, RowTarget::Element(idx)) if idx + 1 < len => {
                RowTarget::Element(idx + 1)
            }
            (KeyCode::Down, RowTarget::Element(_)) => RowTarget::Pending,
            _ => return KeyOutcome::Ignored,
        };
        self.cursor = next;
        KeyOutcome::Handled
    }

    pub fn activate(
        &mut self,
        collection: Option<&Collection>,
        activation: Activation,
        handler: &mut dyn ArrayHandler,
    ) -> InteractionResult {
        let len = collection.map_or(0, Collection::len);
        self.sync_rows(len);

        let idx = match activation.row {
            RowTarget::Pending => {
                let outcome = self.pending.apply(&self.schema, activation.action, handler);
                return interaction(outcome);
            }
            RowTarget::Element(idx) => idx,
        };
        let Some(element) = collection.and_then(|collection| collection.get(idx)) else {
            debug!(index = idx, len, "activation for a missing element ignored");
            return InteractionResult::ignored();
        };

        let outcome = self.rows[idx].apply(
            &self.schema,
            element.as_record(),
            activation.action,
            &mut |updated: Record| handler.update_element(updated, idx),
        );
        match outcome {
            RowOutcome::Remove => {
                info!(index = idx, "element removed");
                handler.remove_element(element.clone(), idx);
                InteractionResult::handled()
            }
            other => interaction(other),
        }
    }

    pub fn on_key(
        &mut self,
        collection: Option<&Collection>,
        key: KeyEvent,
        handler: &mut dyn ArrayHandler,
    ) -> InteractionResult {
        match self.translate_key(collection, key) {
            KeyOutcome::Ignored => InteractionResult::ignored(),
            KeyOutcome::Handled => InteractionResult::handled(),
            KeyOutcome::Activate(activation) => self.activate(collection, activation, handler),
        }
    }

    fn sync_rows(&mut self, len: usize) {
        if self.rows.len() != len {
            self.rows.resize_with(len, RowState::default);
        }
    }
}

/// Element cursors past the end fall through to the add row.
fn clamp_cursor(cursor: RowTarget, len: usize) -> RowTarget {
    match cursor {
        RowTarget::Element(idx) if idx < len => cursor,
        _ => RowTarget::Pending,
    }
}

fn interaction(outcome: RowOutcome) -> InteractionResult {
    match outcome {
        RowOutcome::Handled => InteractionResult::handled(),
        _ => InteractionResult::ignored(),
    }
}

#[cfg(test)]
mod tests {
    use super::ArrayEditor;
    use crate::core::record::{Collection, Record};
    use crate::core::schema::{FieldKind, FieldSpec, Schema};
    use crate::core::value::Value;
    use crate::terminal::{KeyCode, KeyEvent};
    use crate::widgets::components::tabular::activation::{Activation, RowTarget};
    use crate::widgets::components::tabular::handler::ArrayHandler;
    use crate::widgets::components::tabular::view::{CellView, EditorKind, SlotView};

    #[derive(Default)]
    struct Recorder {
        updates: Vec<(Record, usize)>,
        removed: Vec<(Value, usize)>,
        added: Vec<Record>,
    }

    impl ArrayHandler for Recorder {
        fn update_element(&mut self, updated: Record, index: usize) {
            self.updates.push((updated, index));
        }

        fn remove_element(&mut self, removed: Value, index: usize) {
            self.removed.push((removed, index));
        }

        fn add_element(&mut self, element: Record) -> bool {
            self.added.push(element);
            true
        }
    }

    fn record(key: &str, value: impl Into<Value>) -> Record {
        Record::new().with_field(key, value.into())
    }

    fn flat_schema() -> Schema {
        Schema::new().field("a", FieldSpec::new(FieldKind::Number))
    }

    #[test]
    fn view_has_element_rows_then_one_pending_row() {
        let editor = ArrayEditor::new(flat_schema());
        let items = Collection::from_vec(vec![
            Value::Object(record("a", 1.0)),
            Value::Object(record("a", 2.0)),
        ]);

        let view = editor.view(Some(&items));

        assert_eq!(view.kind, EditorKind::Array);
        assert_eq!(view.rows.len(), 3);
        assert_eq!(view.rows[0].target, RowTarget::Element(0));
        assert_eq!(view.rows[1].trailing, SlotView::RemoveButton);
        assert_eq!(view.rows[2].target, RowTarget::Pending);
        assert_eq!(view.rows[2].trailing, SlotView::CommitButton);
        assert_eq!(editor.view(None).rows.len(), 1);
    }

    #[test]
    fn element_edit_reports_the_row_index() {
        let mut editor = ArrayEditor::new(flat_schema());
        let items = Collection::from_vec(vec![
            Value::Object(record("a", 1.0)),
            Value::Object(record("a", 2.0)),
        ]);
        let mut owner = Recorder::default();

        let result = editor.activate(
            Some(&items),
            Activation::input(RowTarget::Element(1), "a", "9"),
            &mut owner,
        );

        assert!(result.handled);
        assert_eq!(owner.updates, vec![(record("a", "9"), 1)]);
        assert!(owner.removed.is_empty());
    }

    #[test]
    fn remove_reports_element_and_index() {
        let mut editor = ArrayEditor::new(flat_schema());
        let a = Value::Object(record("a", "A"));
        let b = Value::Object(record("a", "B"));
        let c = Value::Object(record("a", "C"));
        let items = Collection::from_vec(vec![a.clone(), b.clone(), c.clone()]);
        let mut owner = Recorder::default();

        editor.activate(Some(&items), Activation::remove(1), &mut owner);

        assert_eq!(owner.removed, vec![(b, 1)]);
        let (_, index) = &owner.removed[0];
        assert_eq!(
            items.without_element(*index),
            Collection::from_vec(vec![a, c])
        );
    }

    #[test]
    fn activation_for_missing_element_is_ignored() {
        let mut editor = ArrayEditor::new(flat_schema());
        let mut owner = Recorder::default();

        let result = editor.activate(
            None,
            Activation::input(RowTarget::Element(0), "a", "1"),
            &mut owner,
        );

        assert!(!result.handled);
        assert!(owner.updates.is_empty());
    }

    #[test]
    fn edit_two_levels_deep_reaches_the_root_once() {
        let geo = Schema::new().field("lat", FieldSpec::new(FieldKind::Number));
        let address = Schema::new()
            .field("city", FieldSpec::new(FieldKind::String))
            .field("geo", FieldSpec::new(FieldKind::Object(geo)));
        let schema = Schema::new()
            .field("name", FieldSpec::new(FieldKind::String))
            .field("address", FieldSpec::new(FieldKind::Object(address)));

        let element = Record::new()
            .with_field("name", Value::from("Ada"))
            .with_field(
                "address",
                Value::Object(
                    Record::new()
                        .with_field("city", Value::from("Oslo"))
                        .with_field("geo", Value::Object(record("lat", 1.0))),
                ),
            );
        let items = Collection::from_vec(vec![Value::Object(element.clone())]);
        let row = RowTarget::Element(0);
        let mut editor = ArrayEditor::new(schema);
        let mut owner = Recorder::default();

        editor.activate(Some(&items), Activation::open(row, "address"), &mut owner);
        editor.activate(
            Some(&items),
            Activation::open(row, "geo").within(row, "address"),
            &mut owner,
        );
        assert!(owner.updates.is_empty());

        let result = editor.activate(
            Some(&items),
            Activation::input(row, "lat", "2")
                .within(row, "geo")
                .within(row, "address"),
            &mut owner,
        );

        assert!(result.handled);
        assert_eq!(owner.updates.len(), 1);
        let (updated, index) = &owner.updates[0];
        assert_eq!(*index, 0);
        let Some(Value::Object(new_address)) = updated.get("address") else {
            panic!("address should stay an object");
        };
        assert_eq!(new_address.get("city"), Some(&Value::from("Oslo")));
        assert_eq!(
            new_address.get("geo"),
            Some(&Value::Object(record("lat", "2")))
        );
        assert_eq!(updated.get("name"), element.get("name"));
    }

    #[test]
    fn nested_array_commit_appends_and_clears_the_nested_buffer() {
        let tag = Schema::new().field("label", FieldSpec::new(FieldKind::String));
        let schema = Schema::new().field("tags", FieldSpec::new(FieldKind::Array(tag)));
        let items = Collection::from_vec(vec![Value::Object(record(
            "tags",
            Value::List(Collection::new()),
        ))]);
        let row = RowTarget::Element(0);
        let mut editor = ArrayEditor::new(schema);
        let mut owner = Recorder::default();

        editor.activate(Some(&items), Activation::open(row, "tags"), &mut owner);
        editor.activate(
            Some(&items),
            Activation::input(RowTarget::Pending, "label", "x").within(row, "tags"),
            &mut owner,
        );
        assert!(owner.updates.is_empty());

        editor.activate(
            Some(&items),
            Activation::commit().within(row, "tags"),
            &mut owner,
        );

        let expected_tags = Collection::from_vec(vec![Value::Object(record("label", "x"))]);
        assert_eq!(
            owner.updates,
            vec![(record("tags", Value::List(expected_tags.clone())), 0)]
        );
        assert!(owner.added.is_empty());

        let updated = Collection::from_vec(vec![Value::Object(record(
            "tags",
            Value::List(expected_tags),
        ))]);
        let view = editor.view(Some(&updated));
        let CellView::Nested {
            overlay: Some(nested),
            ..
        } = &view.rows[0].cells[0]
        else {
            panic!("tags editor should be open");
        };
        assert_eq!(nested.rows.len(), 2);
        let CellView::Scalar { text, .. } = &nested.rows[1].cells[0] else {
            panic!("label should be a scalar cell");
        };
        assert!(text.is_empty());
    }

    #[test]
    fn keys_move_between_rows_and_press_remove() {
        let mut editor = ArrayEditor::new(flat_schema());
        let items = Collection::from_vec(vec![
            Value::Object(record("a", 1.0)),
            Value::Object(record("a", 2.0)),
        ]);
        let mut owner = Recorder::default();

        editor.on_key(Some(&items), KeyEvent::plain(KeyCode::Up), &mut owner);
        editor.on_key(Some(&items), KeyEvent::plain(KeyCode::Up), &mut owner);
        editor.on_key(Some(&items), KeyEvent::plain(KeyCode::Tab), &mut owner);
        editor.on_key(Some(&items), KeyEvent::plain(KeyCode::Enter), &mut owner);

        assert_eq!(owner.removed, vec![(Value::Object(record("a", 1.0)), 0)]);
    }
}
