use std::fmt;
use std::sync::Arc;

use crate::core::schema::Schema;
use crate::widgets::components::tabular::activation::RowTarget;

/// Caller-supplied renderable for the leading cell of each row.
pub type IconFn = Arc<dyn Fn() -> String + Send + Sync>;

pub const DEFAULT_ICON: &str = "◆";

#[derive(Clone, Default)]
pub enum LeadingSlot {
    #[default]
    Default,
    Custom(IconFn),
    Blank,
}

impl LeadingSlot {
    pub fn render(&self) -> SlotView {
        match self {
            Self::Default => SlotView::Icon(DEFAULT_ICON.to_string()),
            Self::Custom(icon) => SlotView::Icon(icon()),
            Self::Blank => SlotView::Blank,
        }
    }
}

impl fmt::Debug for LeadingSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Custom(_) => f.write_str("Custom(..)"),
            Self::Blank => f.write_str("Blank"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrailingSlot {
    /// Remove button wired to the row's remove channel.
    #[default]
    Remove,
    /// Commit button of the pending-add row.
    Commit,
    Blank,
}

impl TrailingSlot {
    pub fn render(self) -> SlotView {
        match self {
            Self::Remove => SlotView::RemoveButton,
            Self::Commit => SlotView::CommitButton,
            Self::Blank => SlotView::Blank,
        }
    }

    pub fn is_focusable(self) -> bool {
        self != Self::Blank
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotView {
    Icon(String),
    RemoveButton,
    CommitButton,
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellView {
    Scalar {
        field: String,
        kind: &'static str,
        text: String,
        required: bool,
    },
    Nested {
        field: String,
        summary: String,
        required: bool,
        /// Present while the cell's toggle is open.
        overlay: Option<Box<EditorView>>,
    },
}

impl CellView {
    pub fn field(&self) -> &str {
        match self {
            Self::Scalar { field, .. } | Self::Nested { field, .. } => field,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub target: RowTarget,
    pub leading: SlotView,
    pub cells: Vec<CellView>,
    pub trailing: SlotView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    Object,
    Array,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub required: bool,
}

pub fn columns(schema: &Schema) -> Vec<Column> {
    schema
        .iter()
        .map(|(name, spec)| Column {
            name: name.clone(),
            required: spec.required,
        })
        .collect()
}

/// Render tree of one editor. `focus` is the row and column index of the
/// active cell; column `cells.len()` is the trailing slot.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorView {
    pub kind: EditorKind,
    pub classes: Vec<String>,
    pub columns: Vec<Column>,
    pub rows: Vec<RowView>,
    pub focus: Option<(RowTarget, usize)>,
}
