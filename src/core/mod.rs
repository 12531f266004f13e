pub mod record;
pub mod schema;
pub mod value;

pub use record::{Collection, Record};
pub use schema::{FieldKind, FieldSpec, Schema, SchemaError};
pub use value::Value;
