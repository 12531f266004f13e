pub mod command;
pub mod runtime;

pub use command::{Command, map_key_to_command};
pub use runtime::{App, ExitReason};
