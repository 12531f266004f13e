use tracing::{debug, info};

use crate::core::record::Record;
use crate::core::schema::Schema;
use crate::terminal::KeyEvent;
use crate::widgets::components::tabular::activation::{KeyOutcome, RowAction, RowTarget};
use crate::widgets::components::tabular::handler::ArrayHandler;
use crate::widgets::components::tabular::row::{RowOutcome, RowState};
use crate::widgets::components::tabular::view::{LeadingSlot, RowView, TrailingSlot};

/// Trailing add row of an array editor. Edits accumulate in `buffer` until a
/// commit is accepted by the owner.
#[derive(Default)]
pub struct PendingRow {
    buffer: Record,
    row: RowState,
}

impl PendingRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &Record {
        &self.buffer
    }

    pub fn translate_key(
        &mut self,
        schema: &Schema,
        col: &mut usize,
        key: KeyEvent,
    ) -> KeyOutcome {
        self.row.translate_key(
            schema,
            Some(&self.buffer),
            col,
            RowTarget::Pending,
            TrailingSlot::Commit,
            key,
        )
    }

    pub fn compose(&self, schema: &Schema) -> RowView {
        self.row.compose(
            schema,
            Some(&self.buffer),
            RowTarget::Pending,
            &LeadingSlot::Blank,
            TrailingSlot::Commit,
        )
    }

    pub fn apply(
        &mut self,
        schema: &Schema,
        action: RowAction,
        handler: &mut dyn ArrayHandler,
    ) -> RowOutcome {
        let current = self.buffer.clone();
        let mut next = None;
        let outcome = self.row.apply(
            schema,
            Some(&current),
            action,
            &mut |updated: Record| next = Some(updated),
        );
        if let Some(updated) = next {
            self.buffer = updated;
        }
        match outcome {
            RowOutcome::Commit => {
                self.commit(handler);
                RowOutcome::Handled
            }
            RowOutcome::Remove => RowOutcome::Ignored,
            other => other,
        }
    }

    /// Hands the buffer to the owner. An accepted element resets the buffer
    /// to an empty record; a rejected one stays for correction.
    pub fn commit(&mut self, handler: &mut dyn ArrayHandler) -> bool {
        let accepted = handler.add_element(self.buffer.clone());
        if accepted {
            info!(fields = self.buffer.len(), "pending row committed");
            self.buffer = Record::new();
        } else {
            debug!("pending row rejected by owner");
        }
        accepted
    }
}
