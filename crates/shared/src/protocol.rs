use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{domain::FieldKey, error::JobValidationError};

/// Interprets a store/action response the way the pages do: anything other
/// than `null`, `false`, `0`, `""` or a missing body counts as success.
pub fn is_truthy(response: Option<&Value>) -> bool {
    match response {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Query parameters of one `/store/<resource>` write.
///
/// Extra fields come first so `key` and `value` always win on a name clash.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorePayload(pub Map<String, Value>);

impl StorePayload {
    pub fn new(key: &FieldKey, value: Value) -> Self {
        Self::with_extra(Map::new(), key, value)
    }

    pub fn with_extra(extra: Map<String, Value>, key: &FieldKey, value: Value) -> Self {
        let mut fields = extra;
        fields.insert("key".into(), Value::String(key.0.clone()));
        fields.insert("value".into(), value);
        Self(fields)
    }

    pub fn key_only(key: &FieldKey) -> Self {
        let mut fields = Map::new();
        fields.insert("key".into(), Value::String(key.0.clone()));
        Self(fields)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Flattens the payload into query-string pairs. Strings are sent
    /// unquoted; booleans and numbers use their JSON spelling.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(name, value)| (name.clone(), query_value(value)))
            .collect()
    }
}

pub fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorQuery {
    pub show_all: bool,
    pub inc_tail: bool,
}

/// Response of `/info/<path>` used to prefill the render form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    #[serde(default)]
    pub start: Value,
    #[serde(default)]
    pub end: Value,
    #[serde(default, rename = "final")]
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderJobDraft {
    pub path: String,
    pub name: String,
    pub start: String,
    pub end: String,
    #[serde(rename = "final")]
    pub is_final: bool,
}

impl RenderJobDraft {
    pub fn from_file_info(path: impl Into<String>, info: &FileInfo) -> Self {
        Self {
            path: path.into(),
            name: info.name.clone(),
            start: query_value(&info.start),
            end: query_value(&info.end),
            is_final: info.is_final,
        }
    }

    /// Range check only applies when both ends parse as integers.
    pub fn validate(&self) -> Result<(), JobValidationError> {
        if self.path.is_empty() {
            return Err(JobValidationError::MissingFile);
        }
        if self.name.is_empty() {
            return Err(JobValidationError::MissingName);
        }
        if let (Ok(start), Ok(end)) = (
            self.start.trim().parse::<i64>(),
            self.end.trim().parse::<i64>(),
        ) {
            if end < start {
                return Err(JobValidationError::BackwardsRange);
            }
        }
        Ok(())
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("name".into(), self.name.clone()),
            ("start".into(), self.start.clone()),
            ("end".into(), self.end.clone()),
            ("final".into(), self.is_final.to_string()),
        ]
    }
}
