use std::io;
use std::time::Duration;

use tracing::{debug, info};

use crate::app::command::{Command, map_key_to_command};
use crate::terminal::{KeyEvent, Terminal, TerminalEvent};
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};
use crate::widgets::components::document::DocumentEditor;
use crate::widgets::traits::Interactive;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const HELP: &str = "↑↓ rows  ⇥ columns  ⏎ open/press  esc close  ^U clear  ^S save  ^C quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Save,
    Discard,
}

/// Event loop state around a single document editor.
pub struct App {
    editor: DocumentEditor,
    exit: Option<ExitReason>,
}

impl App {
    pub fn new(editor: DocumentEditor) -> Self {
        Self { editor, exit: None }
    }

    pub fn editor(&self) -> &DocumentEditor {
        &self.editor
    }

    pub fn should_exit(&self) -> Option<ExitReason> {
        self.exit
    }

    /// Returns `true` when the frame needs to be redrawn.
    pub fn handle_event(&mut self, event: TerminalEvent) -> bool {
        match event {
            TerminalEvent::Key(key) => self.handle_key(key),
            TerminalEvent::Resize(_) => true,
            TerminalEvent::Tick => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match map_key_to_command(key) {
            Command::Exit => {
                info!("quit without saving");
                self.exit = Some(ExitReason::Discard);
                false
            }
            Command::Save => {
                info!("save requested");
                self.exit = Some(ExitReason::Save);
                false
            }
            Command::InputKey(key) => {
                let result = self.editor.on_key(key);
                if !result.handled {
                    debug!(?key, "key not handled");
                }
                result.request_render
            }
        }
    }

    pub fn frame(&self) -> (Vec<SpanLine>, Option<usize>) {
        let rendered = self.editor.render();
        let mut lines = rendered.lines;
        lines.push(Vec::new());
        lines.push(vec![Span::styled(
            HELP,
            Style::new().color(Color::DarkGrey),
        )]);
        (lines, rendered.focus_line)
    }

    pub fn run(&mut self, terminal: &mut Terminal) -> io::Result<ExitReason> {
        let mut render_requested = true;
        loop {
            if render_requested {
                let (lines, focus) = self.frame();
                terminal.render(&lines, focus)?;
                render_requested = false;
            }

            let event = terminal.poll_event(POLL_INTERVAL)?;
            if self.handle_event(event) {
                render_requested = true;
            }

            if let Some(reason) = self.exit {
                return Ok(reason);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{App, ExitReason};
    use crate::core::schema::{FieldKind, FieldSpec, Schema};
    use crate::terminal::{KeyCode, KeyEvent, TerminalEvent, TerminalSize};
    use crate::ui::span::line_text;
    use crate::widgets::components::document::{Document, DocumentEditor};
    use serde_json::json;

    fn people_app() -> App {
        let schema = Schema::new().field("name", FieldSpec::new(FieldKind::String));
        App::new(DocumentEditor::new(
            "doc",
            "People",
            schema,
            Document::Array(None),
        ))
    }

    #[test]
    fn typing_goes_to_the_editor_and_requests_render() {
        let mut app = people_app();

        assert!(app.handle_event(TerminalEvent::Key(KeyEvent::plain(KeyCode::Char('a')))));
        assert!(!app.handle_event(TerminalEvent::Tick));
        assert!(app.handle_event(TerminalEvent::Resize(TerminalSize {
            width: 80,
            height: 24,
        })));
        assert_eq!(app.should_exit(), None);

        let pending = app.editor().view().rows.pop().expect("pending row");
        assert_eq!(pending.cells[0].field(), "name");
        assert_eq!(app.editor().to_json(), json!(null));
    }

    #[test]
    fn save_and_quit_set_the_exit_reason() {
        let mut app = people_app();
        app.handle_key(KeyEvent::ctrl('s'));
        assert_eq!(app.should_exit(), Some(ExitReason::Save));

        let mut app = people_app();
        app.handle_key(KeyEvent::ctrl('c'));
        assert_eq!(app.should_exit(), Some(ExitReason::Discard));
    }

    #[test]
    fn frame_ends_with_the_key_help() {
        let app = people_app();
        let (lines, focus) = app.frame();

        assert_eq!(line_text(&lines[0]), "People");
        assert!(line_text(lines.last().expect("help line")).contains("^S save"));
        assert!(focus.is_some());
    }
}
