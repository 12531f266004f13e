use crate::core::schema::FieldSpec;
use crate::core::value::Value;
use crate::widgets::components::tabular::toggle::NestedToggle;
use crate::widgets::components::tabular::view::CellView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Text input bound to the value's display string.
    Scalar,
    /// Edit button that opens a nested editor.
    Nested,
}

/// Decided by the field kind alone, never by the current value.
pub fn cell_kind(spec: &FieldSpec) -> CellKind {
    if spec.kind.is_scalar() {
        CellKind::Scalar
    } else {
        CellKind::Nested
    }
}

pub fn dispatch(
    field: &str,
    spec: &FieldSpec,
    value: Option<&Value>,
    toggle: Option<&NestedToggle>,
) -> CellView {
    match cell_kind(spec) {
        CellKind::Scalar => CellView::Scalar {
            field: field.to_string(),
            kind: spec.kind.name(),
            text: value.map(Value::to_display_text).unwrap_or_default(),
            required: spec.required,
        },
        CellKind::Nested => CellView::Nested {
            field: field.to_string(),
            summary: value.map(Value::to_display_text).unwrap_or_default(),
            required: spec.required,
            overlay: toggle
                .and_then(|toggle| toggle.view(spec, value))
                .map(Box::new),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{CellKind, cell_kind, dispatch};
    use crate::core::record::{Collection, Record};
    use crate::core::schema::{FieldKind, FieldSpec, Schema};
    use crate::core::value::Value;
    use crate::widgets::components::tabular::view::CellView;

    fn sample_values() -> Vec<Option<Value>> {
        vec![
            None,
            Some(Value::None),
            Some(Value::from("text")),
            Some(Value::from(4_i64)),
            Some(Value::Bool(false)),
            Some(Value::Object(Record::new())),
            Some(Value::List(Collection::new())),
        ]
    }

    #[test]
    fn scalar_kinds_always_get_scalar_cells() {
        for kind in [
            FieldKind::String,
            FieldKind::Boolean,
            FieldKind::Number,
            FieldKind::Date,
        ] {
            let spec = FieldSpec::new(kind);
            assert_eq!(cell_kind(&spec), CellKind::Scalar);
            for value in sample_values() {
                let cell = dispatch("f", &spec, value.as_ref(), None);
                assert!(matches!(cell, CellView::Scalar { .. }), "{cell:?}");
            }
        }
    }

    #[test]
    fn nested_kinds_always_get_launcher_cells() {
        let inner = Schema::new().field("x", FieldSpec::new(FieldKind::String));
        for kind in [FieldKind::Object(inner.clone()), FieldKind::Array(inner)] {
            let spec = FieldSpec::new(kind);
            assert_eq!(cell_kind(&spec), CellKind::Nested);
            for value in sample_values() {
                let cell = dispatch("f", &spec, value.as_ref(), None);
                assert!(
                    matches!(cell, CellView::Nested { overlay: None, .. }),
                    "{cell:?}"
                );
            }
        }
    }

    #[test]
    fn absent_scalar_displays_as_empty_text() {
        let spec = FieldSpec::new(FieldKind::Number).required();
        let cell = dispatch("count", &spec, None, None);
        assert_eq!(
            cell,
            CellView::Scalar {
                field: "count".to_string(),
                kind: "number",
                text: String::new(),
                required: true,
            }
        );
    }
}
