pub mod app;
pub mod core;
pub mod terminal;
pub mod ui;
pub mod widgets;

pub use crate::core::{Collection, FieldKind, FieldSpec, Record, Schema, SchemaError, Value};
pub use crate::widgets::components::document::{Document, DocumentEditor, DocumentMode};
pub use crate::widgets::components::tabular;
