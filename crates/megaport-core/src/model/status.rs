use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Remote provisioning status of a product.
///
/// Owned entirely by the provider; the engine only observes it. Values the
/// provider adds later land in [`Unknown`](Self::Unknown) instead of failing
/// the read.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProvisioningStatus {
    New,
    Design,
    Deployable,
    Configured,
    Live,
    Decommissioned,
    Cancelled,
    CancelledParent,
    Unknown(String),
}

impl ProvisioningStatus {
    /// `CONFIGURED` or `LIVE`: the product reflects the last submission.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Configured | Self::Live)
    }

    /// Terminal states after a cancel.
    pub fn is_deleted(&self) -> bool {
        matches!(
            self,
            Self::Decommissioned | Self::Cancelled | Self::CancelledParent
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::New => "NEW",
            Self::Design => "DESIGN",
            Self::Deployable => "DEPLOYABLE",
            Self::Configured => "CONFIGURED",
            Self::Live => "LIVE",
            Self::Decommissioned => "DECOMMISSIONED",
            Self::Cancelled => "CANCELLED",
            Self::CancelledParent => "CANCELLED_PARENT",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for ProvisioningStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "NEW" => Self::New,
            "DESIGN" => Self::Design,
            "DEPLOYABLE" => Self::Deployable,
            "CONFIGURED" => Self::Configured,
            "LIVE" => Self::Live,
            "DECOMMISSIONED" => Self::Decommissioned,
            "CANCELLED" => Self::Cancelled,
            "CANCELLED_PARENT" => Self::CancelledParent,
            other => Self::Unknown(other.to_owned()),
        }
    }
}

impl FromStr for ProvisioningStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for ProvisioningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ProvisioningStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProvisioningStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from(raw.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_and_unknown_values() {
        assert_eq!(ProvisioningStatus::from("LIVE"), ProvisioningStatus::Live);
        assert_eq!(
            ProvisioningStatus::from("CANCELLED_PARENT"),
            ProvisioningStatus::CancelledParent
        );
        let odd = ProvisioningStatus::from("PENDING_REVIEW");
        assert_eq!(odd, ProvisioningStatus::Unknown("PENDING_REVIEW".into()));
        assert_eq!(odd.to_string(), "PENDING_REVIEW");
    }

    #[test]
    fn readiness_and_deletion() {
        assert!(ProvisioningStatus::Configured.is_ready());
        assert!(ProvisioningStatus::Live.is_ready());
        assert!(!ProvisioningStatus::Deployable.is_ready());

        for status in ["DECOMMISSIONED", "CANCELLED", "CANCELLED_PARENT"] {
            assert!(ProvisioningStatus::from(status).is_deleted(), "{status}");
        }
        assert!(!ProvisioningStatus::Live.is_deleted());
    }
}
