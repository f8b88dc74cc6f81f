use serde_json::Value;
use tracing::debug;

/// One element of a document's `specific_codes` list.
///
/// The source data mixes bare strings with objects that carry a `code`
/// field next to other metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecificCode {
    Plain(String),
    Object { code: Option<String> },
}

impl SpecificCode {
    /// Convert a raw list element. Returns `None` for shapes that are
    /// neither a string nor an object.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(code) => Some(SpecificCode::Plain(code.clone())),
            Value::Object(fields) => Some(SpecificCode::Object {
                code: fields.get("code").and_then(Value::as_str).map(str::to_string),
            }),
            _ => None,
        }
    }

    /// The code this element points at, if it has one
    pub fn code(&self) -> Option<&str> {
        match self {
            SpecificCode::Plain(code) => Some(code),
            SpecificCode::Object { code } => code.as_deref(),
        }
    }
}

/// A code document as read from a source: `"<year>_<code>"` identifier plus
/// its specific codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeDocument {
    pub id: String,
    pub specific_codes: Vec<SpecificCode>,
}

impl CodeDocument {
    pub fn new(id: impl Into<String>, specific_codes: Vec<SpecificCode>) -> Self {
        Self {
            id: id.into(),
            specific_codes,
        }
    }

    /// Build a document from its JSON form (`_id` or `identifier`, plus
    /// `specific_codes`).
    ///
    /// Returns `None` when the value is not an object or has no
    /// `specific_codes` field. Identifiers that are not strings are kept as
    /// their JSON text so that index build can classify them.
    pub fn from_json(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        let raw_codes = fields.get("specific_codes")?;

        let id = match fields.get("_id").or_else(|| fields.get("identifier")) {
            Some(Value::String(id)) => id.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };

        let specific_codes = match raw_codes {
            Value::Array(items) => items
                .iter()
                .filter_map(|item| {
                    let code = SpecificCode::from_json(item);
                    if code.is_none() {
                        debug!(id = %id, element = %item, "dropping unrecognized specific code");
                    }
                    code
                })
                .collect(),
            _ => Vec::new(),
        };

        Some(CodeDocument { id, specific_codes })
    }
}
