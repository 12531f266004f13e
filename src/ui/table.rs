use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::ui::scrim::Scrim;
use crate::ui::span::{Span, SpanLine, span_line_width};
use crate::ui::style::{Color, Style};
use crate::widgets::components::tabular::{CellView, Column, EditorView, RowTarget, SlotView};

const MAX_CELL_WIDTH: usize = 28;
const MIN_CELL_WIDTH: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct RenderedTable {
    pub lines: Vec<SpanLine>,
    /// Line holding the innermost focused row, for scrolling.
    pub focus_line: Option<usize>,
}

/// Draws `view` as a grid and appends every open nested editor below it,
/// presented through `scrim`.
pub fn render_editor(view: &EditorView, scrim: &dyn Scrim, depth: usize) -> RenderedTable {
    let descends = view
        .focus
        .is_some_and(|(target, col)| open_overlay(view, target, col).is_some());
    let has_trailing = view.rows.iter().any(|row| row.trailing != SlotView::Blank);

    let mut header = Vec::<SpanLine>::with_capacity(view.columns.len() + 2);
    header.push(Vec::new());
    header.extend(view.columns.iter().map(header_cell));
    if has_trailing {
        header.push(Vec::new());
    }

    let body: Vec<(RowTarget, Vec<SpanLine>)> = view
        .rows
        .iter()
        .map(|row| {
            let row_focused = view.focus.is_some_and(|(target, _)| target == row.target);
            let focused_col = view
                .focus
                .filter(|(target, _)| *target == row.target && !descends)
                .map(|(_, col)| col);

            let marker = if row_focused { "❯" } else { " " };
            let mut cells = Vec::<SpanLine>::with_capacity(row.cells.len() + 2);
            cells.push(vec![
                Span::styled(marker, Style::new().color(Color::Cyan)),
                slot_span(&row.leading),
            ]);
            for (idx, cell) in row.cells.iter().enumerate() {
                let mut line = cell_line(cell);
                if focused_col == Some(idx) {
                    accent_active_cell(&mut line);
                }
                cells.push(line);
            }
            if has_trailing {
                let mut line = vec![slot_span(&row.trailing)];
                if focused_col == Some(row.cells.len()) {
                    accent_active_cell(&mut line);
                }
                cells.push(line);
            }
            (row.target, cells)
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|idx| {
            let schema_col = idx > 0 && idx <= view.columns.len();
            let natural = body
                .iter()
                .filter_map(|(_, cells)| cells.get(idx))
                .chain(header.get(idx))
                .map(|line| span_line_width(line))
                .max()
                .unwrap_or(0);
            if schema_col {
                natural.clamp(MIN_CELL_WIDTH, MAX_CELL_WIDTH)
            } else {
                natural
            }
        })
        .collect();

    let mut lines = Vec::<SpanLine>::new();
    let mut focus_line = None;
    lines.push(grid_border_line('┌', '┬', '┐', &widths));
    lines.push(grid_row(header, &widths));
    lines.push(grid_border_line('├', '┼', '┤', &widths));
    let element_rows = body.len().saturating_sub(1);
    for (target, cells) in body {
        if target == RowTarget::Pending && element_rows > 0 {
            lines.push(grid_border_line('├', '┼', '┤', &widths));
        }
        if view.focus.is_some_and(|(focused, _)| focused == target) {
            focus_line = Some(lines.len());
        }
        lines.push(grid_row(cells, &widths));
    }
    lines.push(grid_border_line('└', '┴', '┘', &widths));

    for row in &view.rows {
        for (col, cell) in row.cells.iter().enumerate() {
            let CellView::Nested {
                field,
                overlay: Some(nested),
                ..
            } = cell
            else {
                continue;
            };
            let inner = render_editor(nested, scrim, depth + 1);
            if descends && view.focus == Some((row.target, col)) {
                let start = lines.len() + scrim.content_offset();
                focus_line = inner.focus_line.map(|line| start + line).or(focus_line);
            }
            lines.extend(scrim.present(
                &overlay_title(field, row.target),
                inner.lines,
                depth + 1,
            ));
        }
    }

    RenderedTable { lines, focus_line }
}

fn open_overlay(view: &EditorView, target: RowTarget, col: usize) -> Option<&EditorView> {
    let row = view.rows.iter().find(|row| row.target == target)?;
    match row.cells.get(col)? {
        CellView::Nested {
            overlay: Some(nested),
            ..
        } => Some(nested.as_ref()),
        _ => None,
    }
}

fn header_cell(column: &Column) -> SpanLine {
    let mut line = vec![Span::styled(column.name.clone(), Style::new().bold())];
    if column.required {
        line.push(Span::styled("*", Style::new().color(Color::Red)));
    }
    line
}

fn cell_line(cell: &CellView) -> SpanLine {
    let muted = Style::new().color(Color::DarkGrey);
    match cell {
        CellView::Scalar { kind, text, .. } if text.is_empty() => {
            vec![Span::styled(format!("<{kind}>"), muted)]
        }
        CellView::Scalar { text, .. } => vec![Span::new(text.clone())],
        CellView::Nested {
            summary, overlay, ..
        } => {
            let summary = if summary.is_empty() {
                "·"
            } else {
                summary.as_str()
            };
            let marker = if overlay.is_some() { " ▾" } else { " ▸" };
            vec![
                Span::styled(summary, muted),
                Span::styled(marker, Style::new().color(Color::Yellow)),
            ]
        }
    }
}

fn slot_span(slot: &SlotView) -> Span {
    match slot {
        SlotView::Icon(icon) => Span::styled(icon.clone(), Style::new().color(Color::Magenta)),
        SlotView::RemoveButton => Span::styled("✕", Style::new().color(Color::Red)),
        SlotView::CommitButton => Span::styled("+", Style::new().color(Color::Green).bold()),
        SlotView::Blank => Span::new(" "),
    }
}

fn overlay_title(field: &str, target: RowTarget) -> String {
    match target {
        RowTarget::Element(idx) => format!("{field} · row {}", idx + 1),
        RowTarget::Pending => format!("{field} · new row"),
    }
}

fn accent_active_cell(spans: &mut [Span]) {
    for span in spans {
        if span.style.color.is_none() || span.style.color == Some(Color::DarkGrey) {
            span.style.color = Some(Color::Cyan);
        }
        span.style.bold = true;
    }
}

fn fit_spans_to_width(spans: SpanLine, width: usize) -> SpanLine {
    if width == 0 {
        return vec![];
    }

    let mut out = Vec::<Span>::new();
    let mut used = 0usize;
    for span in spans {
        if used >= width {
            break;
        }
        let clipped = clip_text_to_width(span.text.as_str(), width - used);
        if clipped.is_empty() {
            continue;
        }
        used = used.saturating_add(UnicodeWidthStr::width(clipped.as_str()));
        out.push(Span::styled(clipped, span.style));
    }

    if used < width {
        out.push(Span::new(" ".repeat(width - used)));
    }
    out
}

fn clip_text_to_width(text: &str, max_width: usize) -> String {
    let mut used = 0usize;
    let mut out = String::new();
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used.saturating_add(ch_width) > max_width {
            break;
        }
        out.push(ch);
        used = used.saturating_add(ch_width);
    }
    out
}

fn grid_border_line(left: char, middle: char, right: char, widths: &[usize]) -> SpanLine {
    let border_style = Style::new().color(Color::DarkGrey);
    let mut line = Vec::<Span>::new();
    line.push(Span::styled(left.to_string(), border_style));
    for (idx, width) in widths.iter().enumerate() {
        line.push(Span::styled("─".repeat(width.saturating_add(2)), border_style));
        if idx + 1 < widths.len() {
            line.push(Span::styled(middle.to_string(), border_style));
        }
    }
    line.push(Span::styled(right.to_string(), border_style));
    line
}

fn grid_row(cells: Vec<SpanLine>, widths: &[usize]) -> SpanLine {
    let border_style = Style::new().color(Color::DarkGrey);
    let mut cells = cells.into_iter();
    let mut line = Vec::<Span>::new();
    for width in widths {
        line.push(Span::styled("│ ", border_style));
        line.extend(fit_spans_to_width(cells.next().unwrap_or_default(), *width));
        line.push(Span::new(" "));
    }
    line.push(Span::styled("│", border_style));
    line
}

#[cfg(test)]
mod tests {
    use super::render_editor;
    use crate::core::record::{Collection, Record};
    use crate::core::schema::{FieldKind, FieldSpec, Schema};
    use crate::core::value::Value;
    use crate::ui::scrim::BoxScrim;
    use crate::ui::span::{line_text, span_line_width};
    use crate::ui::style::Color;
    use crate::widgets::components::tabular::{
        Activation, ArrayEditor, ObjectEditor, RowTarget,
    };

    fn schema() -> Schema {
        Schema::new()
            .field("name", FieldSpec::new(FieldKind::String).required())
            .field(
                "tags",
                FieldSpec::new(FieldKind::Array(
                    Schema::new().field("label", FieldSpec::new(FieldKind::String)),
                )),
            )
    }

    #[test]
    fn grid_has_header_with_required_marker_and_even_rows() {
        let editor = ObjectEditor::new(schema());
        let record = Record::new().with_field("name", Value::from("Ada"));
        let table = render_editor(&editor.view(Some(&record)), &BoxScrim::new(), 0);

        let texts: Vec<String> = table.lines.iter().map(|line| line_text(line)).collect();
        assert_eq!(texts.len(), 5);
        assert!(texts[1].contains("name*"), "{texts:?}");
        assert!(texts[3].contains("Ada"), "{texts:?}");
        assert_eq!(table.focus_line, Some(3));

        let width = span_line_width(&table.lines[0]);
        assert!(table.lines.iter().all(|line| span_line_width(line) == width));
    }

    #[test]
    fn focused_cell_is_accented() {
        let editor = ObjectEditor::new(schema());
        let record = Record::new().with_field("name", Value::from("Ada"));
        let table = render_editor(&editor.view(Some(&record)), &BoxScrim::new(), 0);

        let ada = table.lines[3]
            .iter()
            .find(|span| span.text.starts_with("Ada"))
            .expect("name cell");
        assert_eq!(ada.style.color, Some(Color::Cyan));
        assert!(ada.style.bold);
    }

    #[test]
    fn open_nested_editor_is_presented_below_the_table() {
        let mut editor = ArrayEditor::new(schema());
        let items = Collection::from_vec(vec![Value::Object(
            Record::new().with_field("tags", Value::List(Collection::new())),
        )]);
        editor.activate(
            Some(&items),
            Activation::open(RowTarget::Element(0), "tags"),
            &mut Discard,
        );

        let table = render_editor(&editor.view(Some(&items)), &BoxScrim::new(), 0);
        let texts: Vec<String> = table.lines.iter().map(|line| line_text(line)).collect();

        let title = texts
            .iter()
            .position(|text| text.contains("tags · row 1"))
            .expect("overlay title");
        assert!(texts[title].starts_with("  ╭─"), "{texts:?}");
        assert!(texts[title + 2].contains("label"), "{texts:?}");
    }

    struct Discard;

    impl crate::widgets::components::tabular::ArrayHandler for Discard {
        fn update_element(&mut self, _updated: Record, _index: usize) {}
        fn remove_element(&mut self, _removed: Value, _index: usize) {}
        fn add_element(&mut self, _element: Record) -> bool {
            true
        }
    }
}
