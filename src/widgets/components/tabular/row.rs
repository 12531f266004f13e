use indexmap::IndexMap;
use tracing::debug;

use crate::core::record::Record;
use crate::core::schema::{FieldSpec, Schema};
use crate::core::value::Value;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use crate::widgets::components::tabular::activation::{
    Activation, KeyOutcome, RowAction, RowTarget,
};
use crate::widgets::components::tabular::cell::dispatch;
use crate::widgets::components::tabular::toggle::NestedToggle;
use crate::widgets::components::tabular::view::{LeadingSlot, RowView, TrailingSlot};

/// New record equal to `record` with `key` replaced. An absent record yields
/// the single-field record `{ key: value }`.
pub fn merge_field(record: Option<&Record>, key: &str, value: Value) -> Record {
    match record {
        Some(record) => record.with_field(key, value),
        None => Record::new().with_field(key, value),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Ignored,
    Handled,
    /// The trailing remove button was pressed; the editor decides what that
    /// means for its owner.
    Remove,
    Commit,
}

/// Session state of one rendered row: the toggles of its nested cells,
/// keyed by field name and created on first use.
#[derive(Default)]
pub struct RowState {
    toggles: IndexMap<String, NestedToggle>,
}

impl RowState {
    pub fn toggle(&self, field: &str) -> Option<&NestedToggle> {
        self.toggles.get(field)
    }

    pub fn compose(
        &self,
        schema: &Schema,
        record: Option<&Record>,
        target: RowTarget,
        leading: &LeadingSlot,
        trailing: TrailingSlot,
    ) -> RowView {
        let cells = schema
            .iter()
            .map(|(field, spec)| {
                dispatch(
                    field,
                    spec,
                    record.and_then(|record| record.get(field)),
                    self.toggles.get(field.as_str()),
                )
            })
            .collect();
        RowView {
            target,
            leading: leading.render(),
            cells,
            trailing: trailing.render(),
        }
    }

    /// Applies one activation to this row. Every data change leaves through
    /// `on_change` as a whole new record; `record` itself is never touched.
    pub fn apply(
        &mut self,
        schema: &Schema,
        record: Option<&Record>,
        action: RowAction,
        on_change: &mut dyn FnMut(Record),
    ) -> RowOutcome {
        match action {
            RowAction::Input { field, raw } => {
                if !scalar_field(schema, &field) {
                    debug!(field = %field, "input for a non-scalar or unknown field ignored");
                    return RowOutcome::Ignored;
                }
                on_change(merge_field(record, &field, Value::Text(raw)));
                RowOutcome::Handled
            }
            RowAction::Open { field } => {
                if nested_field(schema, &field).is_none() {
                    debug!(field = %field, "open for a non-nested field ignored");
                    return RowOutcome::Ignored;
                }
                self.toggles.entry(field).or_default().open();
                RowOutcome::Handled
            }
            RowAction::Dismiss { field } => {
                if let Some(toggle) = self.toggles.get_mut(field.as_str()) {
                    toggle.dismiss();
                }
                RowOutcome::Handled
            }
            RowAction::Nested { field, inner } => {
                let Some(spec) = nested_field(schema, &field) else {
                    return RowOutcome::Ignored;
                };
                let Some(toggle) = self.toggles.get_mut(field.as_str()) else {
                    debug!(field = %field, "activation for a never-opened cell ignored");
                    return RowOutcome::Ignored;
                };
                let current = record.and_then(|record| record.get(&field)).cloned();
                let result = toggle.forward(
                    spec,
                    current.as_ref(),
                    *inner,
                    &mut |value: Value| on_change(merge_field(record, &field, value)),
                );
                if result.handled {
                    RowOutcome::Handled
                } else {
                    RowOutcome::Ignored
                }
            }
            RowAction::Remove => RowOutcome::Remove,
            RowAction::Commit => RowOutcome::Commit,
        }
    }

    /// Turns a key into cursor movement or an activation for this row. Keys
    /// go to the open nested editor under the cursor first; Esc it does not
    /// use dismisses it.
    pub fn translate_key(
        &mut self,
        schema: &Schema,
        record: Option<&Record>,
        col: &mut usize,
        target: RowTarget,
        trailing: TrailingSlot,
        key: KeyEvent,
    ) -> KeyOutcome {
        let fields: Vec<(&String, &FieldSpec)> = schema.iter().collect();
        let width = fields.len() + usize::from(trailing.is_focusable());
        if width == 0 {
            return KeyOutcome::Ignored;
        }
        *col = (*col).min(width - 1);

        if let Some((name, spec)) = fields.get(*col).copied()
            && let Some(toggle) = self.toggles.get_mut(name.as_str())
            && toggle.is_open()
        {
            let current = record.and_then(|record| record.get(name));
            return match toggle.translate_key(spec, current, key) {
                KeyOutcome::Activate(inner) => KeyOutcome::Activate(inner.within(target, name)),
                KeyOutcome::Ignored if key.code == KeyCode::Esc => {
                    KeyOutcome::Activate(Activation::dismiss(target, name))
                }
                _ => KeyOutcome::Handled,
            };
        }

        let scalar = fields
            .get(*col)
            .filter(|(_, spec)| spec.kind.is_scalar())
            .map(|(name, _)| name.as_str());
        let text = scalar
            .and_then(|name| record.and_then(|record| record.get(name)))
            .map(Value::to_display_text)
            .unwrap_or_default();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Tab | KeyCode::Right => {
                *col = (*col + 1) % width;
                KeyOutcome::Handled
            }
            KeyCode::BackTab | KeyCode::Left => {
                *col = (*col + width - 1) % width;
                KeyOutcome::Handled
            }
            KeyCode::Enter => match fields.get(*col) {
                Some((name, spec)) if !spec.kind.is_scalar() => {
                    KeyOutcome::Activate(Activation::open(target, name.as_str()))
                }
                Some(_) => KeyOutcome::Ignored,
                None => match trailing {
                    TrailingSlot::Remove => {
                        KeyOutcome::Activate(Activation::new(target, RowAction::Remove))
                    }
                    TrailingSlot::Commit => {
                        KeyOutcome::Activate(Activation::new(target, RowAction::Commit))
                    }
                    TrailingSlot::Blank => KeyOutcome::Ignored,
                },
            },
            KeyCode::Char('u') if ctrl => match scalar {
                Some(name) => KeyOutcome::Activate(Activation::input(target, name, "")),
                None => KeyOutcome::Ignored,
            },
            KeyCode::Char(ch) if !ctrl => match scalar {
                Some(name) => {
                    let mut raw = text;
                    raw.push(ch);
                    KeyOutcome::Activate(Activation::input(target, name, raw))
                }
                None => KeyOutcome::Ignored,
            },
            KeyCode::Backspace => match scalar {
                Some(name) if !text.is_empty() => {
                    let mut raw = text;
                    raw.pop();
                    KeyOutcome::Activate(Activation::input(target, name, raw))
                }
                _ => KeyOutcome::Ignored,
            },
            _ => KeyOutcome::Ignored,
        }
    }
}

fn scalar_field(schema: &Schema, field: &str) -> bool {
    schema.get(field).is_some_and(|spec| spec.kind.is_scalar())
}

fn nested_field<'a>(schema: &'a Schema, field: &str) -> Option<&'a FieldSpec> {
    schema.get(field).filter(|spec| !spec.kind.is_scalar())
}
