use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Error body returned by the platform's services.
///
/// `message` is usually a string; validation failures from connector send
/// a list of strings instead.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<JsonValue>,
    #[serde(default)]
    pub error_identifier: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

impl ErrorBody {
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    pub fn message(&self) -> Option<String> {
        match &self.message {
            Some(JsonValue::String(message)) => Some(message.clone()),
            Some(JsonValue::Array(items)) => Some(join_messages(items)),
            Some(JsonValue::Null) | None => self.errors.as_ref().map(|errors| errors.join(", ")),
            Some(other) => Some(other.to_string()),
        }
    }
}

fn join_messages(items: &[JsonValue]) -> String {
    items
        .iter()
        .map(|item| match item {
            JsonValue::String(text) => text.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn parse_data(body: &str) -> JsonValue {
    if body.trim().is_empty() {
        return JsonValue::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| JsonValue::String(body.to_owned()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{parse_data, ErrorBody};

    #[test]
    fn structured_body_keeps_message_and_identifier() {
        let body = ErrorBody::parse(r#"{"error_identifier":"AN-ERROR","message":"a-message"}"#);
        assert_eq!(body.message().as_deref(), Some("a-message"));
        assert_eq!(body.error_identifier.as_deref(), Some("AN-ERROR"));
    }

    #[test]
    fn message_list_is_joined() {
        let body = ErrorBody::parse(r#"{"message":["first","second"]}"#);
        assert_eq!(body.message().as_deref(), Some("first, second"));
    }

    #[test]
    fn errors_field_is_used_without_message() {
        let body = ErrorBody::parse(r#"{"errors":["bad field"]}"#);
        assert_eq!(body.message().as_deref(), Some("bad field"));
    }

    #[test]
    fn non_json_body_has_no_message() {
        let body = ErrorBody::parse("<html>Bad Gateway</html>");
        assert_eq!(body.message(), None);
        assert_eq!(body.error_identifier, None);
    }

    #[test]
    fn data_falls_back_to_text_or_null() {
        assert_eq!(parse_data(""), serde_json::Value::Null);
        assert_eq!(parse_data("ok"), json!("ok"));
        assert_eq!(parse_data(r#"{"foo":"bar"}"#), json!({"foo": "bar"}));
    }
}
