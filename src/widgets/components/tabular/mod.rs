pub mod activation;
pub mod array;
pub mod cell;
pub mod handler;
pub mod object;
pub mod pending;
pub mod row;
pub mod toggle;
pub mod view;

pub use activation::{Activation, KeyOutcome, RowAction, RowTarget};
pub use array::ArrayEditor;
pub use cell::{CellKind, cell_kind, dispatch};
pub use handler::{ArrayHandler, ObjectHandler};
pub use object::ObjectEditor;
pub use pending::PendingRow;
pub use row::{RowOutcome, RowState, merge_field};
pub use toggle::{NestedEditor, NestedToggle, ToggleState};
pub use view::{
    CellView, Column, DEFAULT_ICON, EditorKind, EditorView, IconFn, LeadingSlot, RowView,
    SlotView, TrailingSlot,
};

const BASE_CLASS: &str = "editor";

/// Cosmetic options shared by both editor variants.
#[derive(Clone, Default)]
pub struct EditorOptions {
    pub class_name: Option<String>,
    pub icon: Option<IconFn>,
}

impl EditorOptions {
    pub fn leading(&self) -> LeadingSlot {
        match &self.icon {
            Some(icon) => LeadingSlot::Custom(icon.clone()),
            None => LeadingSlot::Default,
        }
    }

    pub fn classes(&self, variant: &str) -> Vec<String> {
        let mut classes = vec![BASE_CLASS.to_string(), variant.to_string()];
        if let Some(class_name) = self.class_name.as_deref()
            && !class_name.is_empty()
        {
            classes.push(class_name.to_string());
        }
        classes
    }
}

impl std::fmt::Debug for EditorOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorOptions")
            .field("class_name", &self.class_name)
            .field("icon", &self.icon.as_ref().map(|_| ".."))
            .finish()
    }
}
