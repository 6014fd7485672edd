//! Interpretation of a single `data: ` payload.

use serde_json::Value;

use crate::sse::is_done_marker;

/// What one `data: ` event means for the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedPayload {
    /// Text to append to the answer.
    ContentFragment { text: String },
    /// The stream is finished (`[DONE]` or `{"done": true}`).
    CompletionSignal,
    /// The server reported a failure in-band.
    ErrorSignal { message: String },
    /// Well-formed payload carrying nothing actionable (e.g. `{}` or empty content).
    Empty,
    /// Payload that is not a valid JSON object of the expected shape.
    Unparseable,
}

impl ParsedPayload {
    /// Classify the trimmed text following the `data: ` prefix.
    ///
    /// Field precedence is `error`, then `done`, then `content`. Fields are
    /// read by truthiness: `null`, `false`, `0`, `""` and missing all count
    /// as absent. A non-string `error` is reported as its JSON text.
    ///
    /// # Example
    /// ```
    /// use focusflow_ai::payload::ParsedPayload;
    ///
    /// assert_eq!(ParsedPayload::parse("[DONE]"), ParsedPayload::CompletionSignal);
    /// assert_eq!(
    ///     ParsedPayload::parse(r#"{"content":"Hi"}"#),
    ///     ParsedPayload::ContentFragment { text: "Hi".to_string() }
    /// );
    /// assert_eq!(ParsedPayload::parse("{not json"), ParsedPayload::Unparseable);
    /// ```
    pub fn parse(data: &str) -> Self {
        if is_done_marker(data) {
            return ParsedPayload::CompletionSignal;
        }

        let fields = match serde_json::from_str::<Value>(data) {
            Ok(Value::Object(fields)) => fields,
            _ => return ParsedPayload::Unparseable,
        };

        if let Some(error) = fields.get("error").filter(|v| is_truthy(v)) {
            let message = match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return ParsedPayload::ErrorSignal { message };
        }
        if fields.get("done").is_some_and(is_truthy) {
            return ParsedPayload::CompletionSignal;
        }
        match fields.get("content") {
            Some(Value::String(text)) if !text.is_empty() => ParsedPayload::ContentFragment {
                text: text.clone(),
            },
            _ => ParsedPayload::Empty,
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
