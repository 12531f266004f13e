pub mod scrim;
pub mod span;
pub mod style;
pub mod table;
