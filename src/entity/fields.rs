use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::ApiError;

/// Format constraint applied to non-null field values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// ISO date, `YYYY-MM-DD`
    Date,
    Email,
    Url,
}

/// One column of an entity's write schema
#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Required on create; on update a supplied null/empty value is rejected
    pub required: bool,
    pub kind: FieldKind,
    pub max_len: Option<usize>,
}

/// Whether required fields must be present (create) or only valid when supplied (update)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Update,
}

impl FieldSpec {
    /// Validate a supplied value; `None` means the value is acceptable
    fn check(&self, value: &Value) -> Option<String> {
        let text = match value {
            Value::Null => {
                if self.required {
                    return Some("This field is required".to_string());
                }
                return None;
            }
            Value::String(s) => s,
            _ => return Some("This field must be a string".to_string()),
        };

        if self.required && text.trim().is_empty() {
            return Some("This field is required".to_string());
        }

        if let Some(max) = self.max_len {
            if text.chars().count() > max {
                return Some(format!("This field must not exceed {} characters", max));
            }
        }

        if text.trim().is_empty() {
            // Optional empty values carry no format to check
            return None;
        }

        match self.kind {
            FieldKind::Text => None,
            FieldKind::Date => match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                Ok(_) => None,
                Err(_) => Some("This field must be a date in YYYY-MM-DD format".to_string()),
            },
            FieldKind::Email => {
                let mut parts = text.split('@');
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(local), Some(domain), None)
                        if !local.is_empty() && domain.contains('.') =>
                    {
                        None
                    }
                    _ => Some("This field must be a valid email address".to_string()),
                }
            }
            FieldKind::Url => {
                if text.starts_with("http://") || text.starts_with("https://") {
                    None
                } else {
                    Some("This field must be a valid http(s) URL".to_string())
                }
            }
        }
    }
}

/// Validate a write payload against an entity's field schema.
///
/// Returns the subset of schema fields present in the payload (plus, on
/// create, explicit nulls for omitted optional fields so every stored record
/// has the full column shape). Unknown payload keys are ignored; id and
/// timestamps are never writable because they are not schema fields.
pub fn validate_payload(
    fields: &'static [FieldSpec],
    payload: &Value,
    mode: WriteMode,
) -> Result<Map<String, Value>, ApiError> {
    let body = payload
        .as_object()
        .ok_or_else(|| ApiError::invalid_json("Expected a JSON object"))?;

    let mut errors: HashMap<String, String> = HashMap::new();
    let mut accepted = Map::new();

    for spec in fields {
        match body.get(spec.name) {
            Some(value) => {
                if let Some(message) = spec.check(value) {
                    errors.insert(spec.name.to_string(), message);
                } else {
                    accepted.insert(spec.name.to_string(), value.clone());
                }
            }
            None => match mode {
                WriteMode::Create => {
                    if spec.required {
                        errors.insert(
                            spec.name.to_string(),
                            "This field is required".to_string(),
                        );
                    } else {
                        accepted.insert(spec.name.to_string(), Value::Null);
                    }
                }
                // Absent on update: prior value is retained
                WriteMode::Update => {}
            },
        }
    }

    if !errors.is_empty() {
        return Err(ApiError::unprocessable_entity(
            "The given data was invalid",
            errors,
        ));
    }

    Ok(accepted)
}
