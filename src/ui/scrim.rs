use unicode_width::UnicodeWidthStr;

use crate::ui::span::{Span, SpanLine, span_line_width};
use crate::ui::style::{Color, Style};

/// Surface that presents an open nested editor on top of its owner.
pub trait Scrim: Send {
    /// Wraps already rendered `content` for an editor opened `depth` levels
    /// below the root.
    fn present(&self, title: &str, content: Vec<SpanLine>, depth: usize) -> Vec<SpanLine>;

    /// Index of the first content line in the output of `present`.
    fn content_offset(&self) -> usize;
}

/// Rounded box indented by nesting depth.
#[derive(Debug, Clone)]
pub struct BoxScrim {
    indent: usize,
}

impl BoxScrim {
    pub fn new() -> Self {
        Self { indent: 2 }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

impl Default for BoxScrim {
    fn default() -> Self {
        Self::new()
    }
}

impl Scrim for BoxScrim {
    fn present(&self, title: &str, content: Vec<SpanLine>, depth: usize) -> Vec<SpanLine> {
        let border = Style::new().color(Color::DarkGrey);
        let pad = " ".repeat(self.indent.saturating_mul(depth));
        let title_width = UnicodeWidthStr::width(title);
        let inner = content
            .iter()
            .map(|line| span_line_width(line))
            .max()
            .unwrap_or(0)
            .max(title_width + 1);

        let mut lines = Vec::with_capacity(content.len() + 2);
        lines.push(vec![
            Span::new(pad.clone()),
            Span::styled("╭─ ", border),
            Span::styled(title, Style::new().color(Color::Cyan).bold()),
            Span::styled(format!(" {}╮", "─".repeat(inner - title_width - 1)), border),
        ]);
        for line in content {
            let used = span_line_width(&line);
            let mut row = vec![Span::new(pad.clone()), Span::styled("│ ", border)];
            row.extend(line);
            row.push(Span::new(" ".repeat(inner - used)));
            row.push(Span::styled(" │", border));
            lines.push(row);
        }
        lines.push(vec![
            Span::new(pad),
            Span::styled(format!("╰{}╯", "─".repeat(inner + 2)), border),
        ]);
        lines
    }

    fn content_offset(&self) -> usize {
        1
    }
}
