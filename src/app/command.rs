use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Exit,
    Save,
    InputKey(KeyEvent),
}

/// Global bindings. Everything else, Esc included, belongs to the editor.
pub fn map_key_to_command(key: KeyEvent) -> Command {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Command::Exit,
        (KeyCode::Char('s'), m) if m.contains(KeyModifiers::CONTROL) => Command::Save,
        _ => Command::InputKey(key),
    }
}
