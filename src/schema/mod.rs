//! Schema checks for loosely typed YAML documents.
//!
//! Decoders built on [`FieldReader`] never fail loudly: a usable document yields a typed
//! value together with any non-fatal issues, an unusable one yields only the issues.

use serde_yaml::{Mapping, Value};

/// A decoded value plus the non-fatal problems noticed while decoding it.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    pub value: T,
    pub issues: Vec<String>,
}

/// Outcome of decoding one document.
pub type Decoded<T> = Result<Validated<T>, Vec<String>>;

/// Field-by-field reader over a YAML mapping that records type problems instead of
/// returning early.
pub struct FieldReader<'a> {
    map: &'a Mapping,
    issues: Vec<String>,
}

impl<'a> FieldReader<'a> {
    /// Start reading `value`, which must be a mapping.
    pub fn new(value: &'a Value) -> Result<Self, Vec<String>> {
        match value.as_mapping() {
            Some(map) => Ok(Self { map, issues: Vec::new() }),
            None if value.is_null() => Err(vec!["document is empty".to_string()]),
            None => Err(vec![format!("expected a mapping, found {}", type_name(value))]),
        }
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    pub fn issue(&mut self, message: impl Into<String>) {
        self.issues.push(message.into());
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn required_str(&mut self, key: &str) -> Option<String> {
        match self.get(key) {
            Some(value) => self.expect_str(key, value),
            None => {
                self.issue(format!("missing required field `{key}`"));
                None
            }
        }
    }

    pub fn optional_str(&mut self, key: &str) -> Option<String> {
        let value = self.get(key)?;
        self.expect_str(key, value)
    }

    pub fn optional_u32(&mut self, key: &str) -> Option<u32> {
        let value = self.get(key)?;
        match value.as_u64().and_then(|n| u32::try_from(n).ok()) {
            Some(n) => Some(n),
            None => {
                self.issue(format!(
                    "field `{key}` must be a non-negative integer, found {}",
                    type_name(value)
                ));
                None
            }
        }
    }

    pub fn optional_bool(&mut self, key: &str) -> Option<bool> {
        let value = self.get(key)?;
        match value.as_bool() {
            Some(b) => Some(b),
            None => {
                self.issue(format!("field `{key}` must be a boolean, found {}", type_name(value)));
                None
            }
        }
    }

    /// Optional list of strings. Non-string entries are reported and skipped.
    pub fn string_list(&mut self, key: &str) -> Option<Vec<String>> {
        let value = self.get(key)?;
        let Some(items) = value.as_sequence() else {
            self.issue(format!("field `{key}` must be a list, found {}", type_name(value)));
            return None;
        };
        let mut out = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(s) => out.push(s.to_string()),
                None => self.issue(format!(
                    "field `{key}[{idx}]` must be a string, found {}",
                    type_name(item)
                )),
            }
        }
        Some(out)
    }

    pub fn finish<T>(self, value: T) -> Validated<T> {
        Validated { value, issues: self.issues }
    }

    /// Give up on the document, returning everything recorded so far.
    pub fn reject(mut self, message: impl Into<String>) -> Vec<String> {
        self.issues.push(message.into());
        self.issues
    }

    fn expect_str(&mut self, key: &str, value: &Value) -> Option<String> {
        match value.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                self.issue(format!("field `{key}` must be a string, found {}", type_name(value)));
                None
            }
        }
    }
}

/// Short description of a YAML node's kind for error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Parse YAML text, mapping syntax errors to a single issue.
pub fn parse_yaml(content: &str) -> Result<Value, Vec<String>> {
    serde_yaml::from_str(content).map_err(|e| vec![format!("invalid YAML: {e}")])
}
