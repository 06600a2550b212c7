use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde_json::Value;
use thiserror::Error;

/// Top-level error type for the `megaport-api` crate.
///
/// Covers transport failures, the vendor's `{message, data}` error
/// envelope, and response decoding. `megaport-core` maps these into the
/// provisioning error taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed or the login response carried no token.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Remote ──────────────────────────────────────────────────────
    /// HTTP 404 from the provider.
    #[error("megaport-api: not found ({path})")]
    NotFound { path: String },

    /// Any other non-success response. `message` is the normalized
    /// `message: detail` text built from the error envelope.
    #[error("{message}")]
    Remote {
        status: u16,
        message: String,
        data: ErrorData,
    },

    /// Non-success response whose `data` field has a shape the error
    /// normalizer cannot render (boolean, number).
    #[error("{message}")]
    UnsupportedErrorData {
        status: u16,
        message: String,
        type_name: &'static str,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            // Without a status the request never got a full response:
            // refused, reset, or closed mid-message.
            Self::Transport(e) => match e.status() {
                Some(status) => matches!(status.as_u16(), 429 | 502 | 503 | 504),
                None => !e.is_builder(),
            },
            Self::Remote { status, .. } => matches!(status, 429 | 502 | 503 | 504),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// HTTP status of a remote error, if there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Remote { status, .. } | Self::UnsupportedErrorData { status, .. } => {
                Some(*status)
            }
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Build the error for a non-success envelope.
    ///
    /// `{"message":"foo"}` renders as `foo`, `{"message":"foo","data":"bar"}`
    /// as `foo: bar`. Unrenderable data yields [`Error::UnsupportedErrorData`].
    pub fn from_envelope(status: u16, message: &str, data: ErrorData) -> Self {
        if let ErrorData::Unsupported { type_name, .. } = &data {
            let type_name = *type_name;
            let message = join_detail(message, data.detail().as_deref());
            return Self::UnsupportedErrorData {
                status,
                message,
                type_name,
            };
        }
        let message = join_detail(message, data.detail().as_deref());
        Self::Remote {
            status,
            message,
            data,
        }
    }
}

fn join_detail(message: &str, detail: Option<&str>) -> String {
    match detail {
        Some(detail) if message.is_empty() => detail.to_owned(),
        Some(detail) => format!("{message}: {detail}"),
        None => message.to_owned(),
    }
}

// ── Error data ──────────────────────────────────────────────────────

/// The `data` field of a vendor error envelope, decoded into a closed set.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorData {
    /// Absent or `null`.
    Null,
    Text(String),
    List(Vec<ErrorData>),
    /// Object fields, kept sorted by key so rendering is stable.
    Map(BTreeMap<String, Value>),
    /// Scalar shapes that carry no renderable message.
    Unsupported {
        type_name: &'static str,
        raw: String,
    },
}

impl ErrorData {
    /// Classify a raw JSON value.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from_value).collect()),
            Value::Object(fields) => Self::Map(fields.into_iter().collect()),
            Value::Bool(b) => Self::Unsupported {
                type_name: "bool",
                raw: b.to_string(),
            },
            Value::Number(n) => Self::Unsupported {
                type_name: "number",
                raw: n.to_string(),
            },
        }
    }

    /// Render the detail text appended to the vendor message, if any.
    ///
    /// - text: itself
    /// - map: `key=value` pairs separated by spaces, string values quoted
    /// - list: `N errors: ['a', 'b']`
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Text(s) => Some(s.clone()),
            Self::Map(fields) => {
                let mut out = String::new();
                for (key, value) in fields {
                    if !out.is_empty() {
                        out.push(' ');
                    }
                    let _ = write!(out, "{key}={}", render_map_value(value));
                }
                Some(out)
            }
            Self::List(items) => {
                let rendered: Vec<String> = items
                    .iter()
                    .map(|item| item.detail().unwrap_or_else(|| "null".into()))
                    .collect();
                Some(format!(
                    "{} errors: ['{}']",
                    items.len(),
                    rendered.join("', '")
                ))
            }
            Self::Unsupported { type_name, raw } => Some(format!(
                "cannot process error data of type {type_name}: {raw}"
            )),
        }
    }
}

fn render_map_value(value: &Value) -> String {
    // serde_json's Display quotes and escapes strings, everything else is compact JSON.
    value.to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn render(body: &Value) -> Error {
        let message = body["message"].as_str().unwrap_or_default();
        Error::from_envelope(400, message, ErrorData::from_value(body["data"].clone()))
    }

    #[test]
    fn message_only() {
        let err = render(&json!({"message": "foo"}));
        assert_eq!(err.to_string(), "foo");
        assert!(matches!(err, Error::Remote { data: ErrorData::Null, .. }));
    }

    #[test]
    fn string_data() {
        let err = render(&json!({"message": "foo", "data": "bar"}));
        assert_eq!(err.to_string(), "foo: bar");
    }

    #[test]
    fn list_data() {
        let err = render(&json!({"message": "foo", "data": ["bar", "baz"]}));
        assert_eq!(err.to_string(), "foo: 2 errors: ['bar', 'baz']");
    }

    #[test]
    fn map_data_is_sorted_and_quoted() {
        let err = render(&json!({"message": "foo", "data": {"c": 5, "a": "b"}}));
        assert_eq!(err.to_string(), "foo: a=\"b\" c=5");
    }

    #[test]
    fn bool_data_is_a_distinct_variant() {
        let err = render(&json!({"message": "foo", "data": true}));
        assert_eq!(
            err.to_string(),
            "foo: cannot process error data of type bool: true"
        );
        assert!(matches!(
            err,
            Error::UnsupportedErrorData {
                type_name: "bool",
                ..
            }
        ));
    }

    #[test]
    fn transient_classification() {
        let unavailable = Error::from_envelope(503, "busy", ErrorData::Null);
        assert!(unavailable.is_transient());
        let bad_request = Error::from_envelope(400, "nope", ErrorData::Null);
        assert!(!bad_request.is_transient());
        assert!(Error::NotFound { path: "/v2/product/x".into() }.is_not_found());
    }
}
