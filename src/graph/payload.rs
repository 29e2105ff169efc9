//! Parsing of Graph API response bodies.

use serde_json::Value;

use super::GraphError;

/// Error type name the API uses for OAuth failures.
const OAUTH_EXCEPTION: &str = "OAuthException";

/// A parsed response body.
///
/// The API usually answers with JSON, but some endpoints answer with bare
/// strings (for instance form-encoded token responses); those are kept as
/// [`Payload::Text`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A JSON document.
    Json(Value),
    /// A body that is not valid JSON, kept verbatim.
    Text(String),
}

impl Payload {
    /// Parses a response body, surfacing errors the API embeds in it.
    ///
    /// # Errors
    ///
    /// - [`GraphError::Auth`] for an `error` object of type `OAuthException`
    /// - [`GraphError::Remote`] for any other `error` object, or for the
    ///   legacy `error_msg` format
    pub fn parse(body: &[u8]) -> Result<Self, GraphError> {
        let Ok(value) = serde_json::from_slice::<Value>(body) else {
            return Ok(Self::Text(String::from_utf8_lossy(body).into_owned()));
        };

        if let Value::Object(map) = &value {
            if let Some(error) = map.get("error") {
                return Err(embedded_error(error));
            }

            if let Some(message) = map.get("error_msg") {
                return Err(GraphError::Remote {
                    message: text_of(message),
                    code: map.get("error_code").and_then(code_of),
                });
            }
        }

        Ok(Self::Json(value))
    }

    /// Returns the JSON value, if this is JSON.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Consumes the payload, returning the JSON value if this is JSON.
    #[must_use]
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Returns the raw text, if the body was not JSON.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    /// Returns true if the body is exactly the JSON literal `false`.
    #[must_use]
    pub const fn is_false(&self) -> bool {
        matches!(self, Self::Json(Value::Bool(false)))
    }

    /// Returns the URL of the next page from `paging.next`, if present.
    #[must_use]
    pub fn next_page_url(&self) -> Option<&str> {
        self.as_json()?.get("paging")?.get("next")?.as_str()
    }

    /// Returns true for values a batch treats as an empty sub-response:
    /// `null`, `false`, `0`, `""`, `[]`, `{}`.
    #[must_use]
    pub fn is_empty_value(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
        }
    }
}

fn embedded_error(error: &Value) -> GraphError {
    let message = error.get("message").map_or_else(|| text_of(error), text_of);
    let code = error.get("code").and_then(code_of);

    if error.get("type").and_then(Value::as_str) == Some(OAUTH_EXCEPTION) {
        GraphError::Auth { message, code }
    } else {
        GraphError::Remote { message, code }
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn code_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
