use serde::Deserialize;
use serde_json::Value;

/// Error body returned by the backend on a non-success status.
///
/// `detail` is either a plain message or a list of validation entries carrying `msg`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Array(entries) => {
                let messages: Vec<&str> = entries
                    .iter()
                    .filter_map(|entry| match entry {
                        Value::String(text) => Some(text.as_str()),
                        Value::Object(fields) => fields.get("msg").and_then(Value::as_str),
                        _ => None,
                    })
                    .filter(|text| !text.trim().is_empty())
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            _ => None,
        }
    }
}

/// Extracts a human-readable `detail` from a raw response body, if there is one.
pub fn detail_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message())
}
