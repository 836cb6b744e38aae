use serde_json::Value;

/// One side of a comparison: plain text, or a structured value diffed
/// through its serialized form.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffInput {
    Text(String),
    Structured(Value),
}

impl DiffInput {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Structured(_) => "structured",
        }
    }
}

impl From<&str> for DiffInput {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for DiffInput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Value> for DiffInput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            other => Self::Structured(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_strings_are_text() {
        assert_eq!(DiffInput::from(json!("a\nb")), DiffInput::Text("a\nb".into()));
        assert!(matches!(
            DiffInput::from(json!({"a": 1})),
            DiffInput::Structured(_)
        ));
    }
}
