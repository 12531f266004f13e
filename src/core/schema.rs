use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("field `{path}` has unknown type `{kind}`")]
    UnknownKind { path: String, kind: String },

    #[error("field `{path}` of type `{kind}` needs a `fields` mapping")]
    MissingFields { path: String, kind: &'static str },

    #[error("invalid schema json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid schema yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("cannot read schema {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    String,
    Boolean,
    Number,
    Date,
    Object(Schema),
    Array(Schema),
}

impl FieldKind {
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::String | Self::Boolean | Self::Number | Self::Date)
    }

    pub fn nested_schema(&self) -> Option<&Schema> {
        match self {
            Self::Object(schema) | Self::Array(schema) => Some(schema),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Date => "date",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Field names mapped to a `type` and an optional `required` flag. `object`
/// and `array` fields carry a nested `fields` mapping that is itself a
/// schema, shared by every array element:
///
/// ```yaml
/// name: { type: string, required: true }
/// tags:
///   type: array
///   fields:
///     label: { type: string }
/// ```
///
/// Key order in the document is column order in the editor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    fields: Arc<IndexMap<String, FieldSpec>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        Arc::make_mut(&mut self.fields).insert(name.into(), spec);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldSpec)> {
        self.fields.iter()
    }

    pub fn from_json_str(input: &str) -> Result<Self, SchemaError> {
        let raw: IndexMap<String, RawFieldSpec> = serde_json::from_str(input)?;
        Self::from_raw(raw, "")
    }

    pub fn from_yaml_str(input: &str) -> Result<Self, SchemaError> {
        let raw: IndexMap<String, RawFieldSpec> = serde_yaml::from_str(input)?;
        Self::from_raw(raw, "")
    }

    /// Loads a schema file; `.json` is parsed as JSON, anything else as YAML.
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    fn from_raw(raw: IndexMap<String, RawFieldSpec>, parent: &str) -> Result<Self, SchemaError> {
        let mut fields = IndexMap::with_capacity(raw.len());
        for (name, spec) in raw {
            let path = if parent.is_empty() {
                name.clone()
            } else {
                format!("{parent}.{name}")
            };
            let kind = match spec.kind.as_str() {
                "string" => FieldKind::String,
                "boolean" => FieldKind::Boolean,
                "number" => FieldKind::Number,
                "date" => FieldKind::Date,
                "object" => FieldKind::Object(Self::nested(spec.fields, &path, "object")?),
                "array" => FieldKind::Array(Self::nested(spec.fields, &path, "array")?),
                other => {
                    return Err(SchemaError::UnknownKind {
                        path,
                        kind: other.to_string(),
                    });
                }
            };
            fields.insert(
                name,
                FieldSpec {
                    kind,
                    required: spec.required,
                },
            );
        }
        Ok(Self {
            fields: Arc::new(fields),
        })
    }

    fn nested(
        fields: Option<IndexMap<String, RawFieldSpec>>,
        path: &str,
        kind: &'static str,
    ) -> Result<Self, SchemaError> {
        let Some(fields) = fields else {
            return Err(SchemaError::MissingFields {
                path: path.to_string(),
                kind,
            });
        };
        Self::from_raw(fields, path)
    }
}

#[derive(Debug, Deserialize)]
struct RawFieldSpec {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    fields: Option<IndexMap<String, RawFieldSpec>>,
}
