// ── Core error types ──
//
// Provisioning-level errors. Callers of the engine never see HTTP bodies
// or reqwest internals; the `From<megaport_api::Error>` impl folds the
// transport layer into this taxonomy.

use thiserror::Error;

use crate::model::{ProductUid, ProvisioningStatus};

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Submission errors ────────────────────────────────────────────
    /// The vendor refused the order or update during validation.
    #[error("Order rejected: {message}")]
    ValidationRejected { message: String },

    /// The intent was malformed before anything was sent.
    #[error("Invalid intent: {message}")]
    InvalidIntent { message: String },

    #[error("VLAN id {vlan} is unavailable on product {product_uid}")]
    VlanUnavailable { vlan: u16, product_uid: String },

    // ── Lifecycle errors ─────────────────────────────────────────────
    #[error("Product not found: {identifier}")]
    NotFound { identifier: String },

    /// The deadline passed before the product converged. Nothing was
    /// rolled back; the remote state is unknown.
    #[error(
        "Timed out waiting for {uid} (last status: {})",
        status_or_unknown(.last_status.as_ref())
    )]
    Timeout {
        uid: ProductUid,
        last_status: Option<ProvisioningStatus>,
    },

    // ── Remote errors ────────────────────────────────────────────────
    /// Retryable transport failure (timeout, refused connection, 429/5xx gateway).
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Non-retryable error response or undecodable body.
    #[error("API error: {message}")]
    Remote { status: Option<u16>, message: String },

    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Reference data ───────────────────────────────────────────────
    #[error("{message}")]
    Lookup { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

fn status_or_unknown(status: Option<&ProvisioningStatus>) -> String {
    status.map_or_else(|| "unknown".into(), ToString::to_string)
}

impl CoreError {
    /// Whether the polling loop should retry after this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidIntent {
            message: message.into(),
        }
    }

    /// Translate an error from a validate/update submission. Any vendor
    /// error response there is a rejection of the request itself.
    pub(crate) fn rejection(err: megaport_api::Error) -> Self {
        if err.is_transient() || matches!(err.status(), Some(401 | 403)) {
            return Self::from(err);
        }
        match err {
            megaport_api::Error::Remote { message, .. }
            | megaport_api::Error::UnsupportedErrorData { message, .. } => {
                Self::ValidationRejected { message }
            }
            other => Self::from(other),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<megaport_api::Error> for CoreError {
    fn from(err: megaport_api::Error) -> Self {
        if err.is_transient() {
            return CoreError::Transport {
                message: err.to_string(),
            };
        }
        match err {
            megaport_api::Error::NotFound { path } => CoreError::NotFound { identifier: path },
            megaport_api::Error::Authentication { message } => {
                CoreError::Authentication { message }
            }
            megaport_api::Error::Remote {
                status: status @ (401 | 403),
                message,
                ..
            } => CoreError::Authentication {
                message: format!("{message} (HTTP {status})"),
            },
            megaport_api::Error::Remote {
                status, message, ..
            }
            | megaport_api::Error::UnsupportedErrorData {
                status, message, ..
            } => CoreError::Remote {
                status: Some(status),
                message,
            },
            megaport_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            megaport_api::Error::ClientBuild(message) => CoreError::Config { message },
            megaport_api::Error::Transport(ref e) => CoreError::Remote {
                status: e.status().map(|s| s.as_u16()),
                message: err.to_string(),
            },
            megaport_api::Error::Deserialization { message, body: _ } => CoreError::Remote {
                status: None,
                message: format!("Deserialization error: {message}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use megaport_api::ErrorData;

    use super::*;

    #[test]
    fn gateway_errors_are_transient() {
        let err = CoreError::from(megaport_api::Error::from_envelope(
            503,
            "maintenance",
            ErrorData::Null,
        ));
        assert!(err.is_transient());
    }

    #[test]
    fn not_found_is_distinct() {
        let err = CoreError::from(megaport_api::Error::NotFound {
            path: "/v2/product/abc".into(),
        });
        assert!(err.is_not_found());
        assert!(!err.is_transient());
    }

    #[test]
    fn forbidden_maps_to_authentication() {
        let err = CoreError::from(megaport_api::Error::from_envelope(
            401,
            "token expired",
            ErrorData::Null,
        ));
        assert!(matches!(err, CoreError::Authentication { .. }));
    }

    #[test]
    fn rejection_keeps_vendor_message() {
        let err = CoreError::rejection(megaport_api::Error::from_envelope(
            400,
            "Validation failed",
            ErrorData::Text("bad term".into()),
        ));
        assert_eq!(err.to_string(), "Order rejected: Validation failed: bad term");
    }

    #[test]
    fn rejection_keeps_authentication_failures() {
        let err = CoreError::rejection(megaport_api::Error::from_envelope(
            403,
            "forbidden",
            ErrorData::Null,
        ));
        assert!(matches!(err, CoreError::Authentication { .. }), "got: {err:?}");
    }

    #[test]
    fn timeout_reports_last_status() {
        let err = CoreError::Timeout {
            uid: ProductUid::from("p-1"),
            last_status: Some(ProvisioningStatus::Deployable),
        };
        assert_eq!(
            err.to_string(),
            "Timed out waiting for p-1 (last status: DEPLOYABLE)"
        );
    }
}
