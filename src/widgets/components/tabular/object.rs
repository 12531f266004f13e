use tracing::debug;

use crate::core::record::Record;
use crate::core::schema::Schema;
use crate::terminal::KeyEvent;
use crate::widgets::components::tabular::EditorOptions;
use crate::widgets::components::tabular::activation::{Activation, KeyOutcome, RowTarget};
use crate::widgets::components::tabular::handler::ObjectHandler;
use crate::widgets::components::tabular::row::{RowOutcome, RowState};
use crate::widgets::components::tabular::view::{EditorKind, EditorView, TrailingSlot, columns};
use crate::widgets::traits::InteractionResult;

const ROW: RowTarget = RowTarget::Element(0);

/// Single-row editor for one record.
pub struct ObjectEditor {
    schema: Schema,
    options: EditorOptions,
    row: RowState,
    col: usize,
}

impl ObjectEditor {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            options: EditorOptions::default(),
            row: RowState::default(),
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

    pub fn view(&self, record: Option<&Record>) -> EditorView {
        let row = self.row.compose(
            &self.schema,
            record,
            ROW,
            &self.options.leading(),
            TrailingSlot::Blank,
        );
        EditorView {
            kind: EditorKind::Object,
            classes: self.options.classes("editor--object"),
            columns: columns(&self.schema),
            rows: vec![row],
            focus: Some((ROW, self.col)),
        }
    }

    pub fn translate_key(&mut self, record: Option<&Record>, key: KeyEvent) -> KeyOutcome {
        self.row.translate_key(
            &self.schema,
            record,
            &mut self.col,
            ROW,
            TrailingSlot::Blank,
            key,
        )
    }

    pub fn activate(
        &mut self,
        record: Option<&Record>,
        activation: Activation,
        handler: &mut dyn ObjectHandler,
    ) -> InteractionResult {
        if activation.row != ROW {
            debug!(row = ?activation.row, "object editor has a single row");
            return InteractionResult::ignored();
        }
        let outcome = self.row.apply(
            &self.schema,
            record,
            activation.action,
            &mut |updated: Record| handler.update_element(updated),
        );
        match outcome {
            RowOutcome::Handled => InteractionResult::handled(),
            // No trailing control: remove and commit have nothing to do.
            RowOutcome::Ignored | RowOutcome::Remove | RowOutcome::Commit => {
                InteractionResult::ignored()
            }
        }
    }

    pub fn on_key(
        &mut self,
        record: Option<&Record>,
        key: KeyEvent,
        handler: &mut dyn ObjectHandler,
    ) -> InteractionResult {
        match self.translate_key(record, key) {
            KeyOutcome::Ignored => InteractionResult::ignored(),
            KeyOutcome::Handled => InteractionResult::handled(),
            KeyOutcome::Activate(activation) => self.activate(record, activation, handler),
        }
    }
}
