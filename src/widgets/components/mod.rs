pub mod document;
pub mod tabular;
