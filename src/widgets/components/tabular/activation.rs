/// Row addressed by an activation. Element rows are identified by position
/// only; removing an element shifts every later index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTarget {
    Element(usize),
    Pending,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowAction {
    /// Raw text typed into a scalar cell.
    Input { field: String, raw: String },
    Open { field: String },
    Dismiss { field: String },
    /// Activation for the editor opened under `field`.
    Nested {
        field: String,
        inner: Box<Activation>,
    },
    Remove,
    Commit,
}

/// A single user interaction addressed to a cell, slot, or nested editor.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    pub row: RowTarget,
    pub action: RowAction,
}

impl Activation {
    pub fn new(row: RowTarget, action: RowAction) -> Self {
        Self { row, action }
    }

    pub fn input(row: RowTarget, field: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::new(
            row,
            RowAction::Input {
                field: field.into(),
                raw: raw.into(),
            },
        )
    }

    pub fn open(row: RowTarget, field: impl Into<String>) -> Self {
        Self::new(
            row,
            RowAction::Open {
                field: field.into(),
            },
        )
    }

    pub fn dismiss(row: RowTarget, field: impl Into<String>) -> Self {
        Self::new(
            row,
            RowAction::Dismiss {
                field: field.into(),
            },
        )
    }

    pub fn remove(index: usize) -> Self {
        Self::new(RowTarget::Element(index), RowAction::Remove)
    }

    pub fn commit() -> Self {
        Self::new(RowTarget::Pending, RowAction::Commit)
    }

    /// Wraps `self` so it reaches the editor opened under `field` of `row`.
    pub fn within(self, row: RowTarget, field: impl Into<String>) -> Self {
        Self::new(
            row,
            RowAction::Nested {
                field: field.into(),
                inner: Box::new(self),
            },
        )
    }
}

/// What a key press turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    Ignored,
    /// Consumed without touching data (cursor moves, swallowed keys).
    Handled,
    Activate(Activation),
}
