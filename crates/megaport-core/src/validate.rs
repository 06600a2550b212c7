// ── Local intent validation ──
//
// Checks the provider would otherwise reject after a round trip, or worse,
// accept and then fail on asynchronously. Runs before anything is sent.

use std::sync::LazyLock;

use ipnet::IpNet;
use regex::Regex;

use crate::error::CoreError;
use crate::intent::{
    AwsConnectionType, AwsPartnerConfig, CreateCloudVxcIntent, CreateMcrIntent, CreatePortIntent,
    CreatePrivateVxcIntent, GcpPartnerConfig, PartnerConfig, UpdateCloudVxcIntent,
    UpdateMcrIntent, UpdatePortIntent, UpdatePrivateVxcIntent,
};

/// Port speeds the provider sells, in Mbps.
pub const PORT_SPEEDS: [u64; 3] = [1_000, 10_000, 100_000];

/// Contract terms in months.
pub const CONTRACT_TERMS: [u64; 4] = [1, 12, 24, 36];

static GCP_PAIRING_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[[:xdigit:]]{8}-([[:xdigit:]]{4}-){3}[[:xdigit:]]{12}/\w+-\w+\d/\d$")
        .expect("pairing key pattern is valid")
});

/// Pre-submission validation of an intent.
pub trait Validate {
    fn validate(&self) -> Result<(), CoreError>;
}

impl Validate for CreatePortIntent {
    fn validate(&self) -> Result<(), CoreError> {
        if let Some(speed) = self.speed {
            one_of("speed", speed, &PORT_SPEEDS)?;
        }
        if let Some(term) = self.term {
            one_of("term", term, &CONTRACT_TERMS)?;
        }
        Ok(())
    }
}

impl Validate for UpdatePortIntent {
    fn validate(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

impl Validate for CreateMcrIntent {
    fn validate(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

impl Validate for UpdateMcrIntent {
    fn validate(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

impl Validate for CreatePrivateVxcIntent {
    fn validate(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

impl Validate for UpdatePrivateVxcIntent {
    fn validate(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

impl Validate for CreateCloudVxcIntent {
    fn validate(&self) -> Result<(), CoreError> {
        self.partner.validate()
    }
}

impl Validate for UpdateCloudVxcIntent {
    fn validate(&self) -> Result<(), CoreError> {
        self.partner.validate()
    }
}

impl Validate for PartnerConfig {
    fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::Aws(aws) => aws.validate(),
            Self::Gcp(gcp) => gcp.validate(),
        }
    }
}

impl Validate for AwsPartnerConfig {
    fn validate(&self) -> Result<(), CoreError> {
        if let Some(key) = &self.bgp_auth_key {
            validate_bgp_auth_key(key)?;
        }
        if let Some(ip) = &self.amazon_ip_address {
            validate_cidr("amazon_ip_address", ip)?;
        }
        if let Some(ip) = &self.customer_ip_address {
            validate_cidr("customer_ip_address", ip)?;
        }
        if let Some(prefixes) = self.prefixes.as_ref().filter(|p| !p.is_empty()) {
            if self.connection_type != Some(AwsConnectionType::Public) {
                return Err(CoreError::invalid(
                    "cannot specify 'prefixes' for a private VXC",
                ));
            }
            for prefix in prefixes {
                validate_cidr("prefixes", prefix)?;
            }
        }
        Ok(())
    }
}

impl Validate for GcpPartnerConfig {
    fn validate(&self) -> Result<(), CoreError> {
        match &self.pairing_key {
            Some(key) if !GCP_PAIRING_KEY.is_match(key) => Err(CoreError::invalid(format!(
                "invalid GCP pairing key format: {key:?}"
            ))),
            _ => Ok(()),
        }
    }
}

fn one_of(field: &str, value: u64, allowed: &[u64]) -> Result<(), CoreError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    let allowed: Vec<String> = allowed.iter().map(ToString::to_string).collect();
    Err(CoreError::invalid(format!(
        "{field} must be one of {}, got {value}",
        allowed.join(", ")
    )))
}

/// BGP MD5 keys accepted by AWS: 6 to 24 characters, no whitespace.
pub fn validate_bgp_auth_key(key: &str) -> Result<(), CoreError> {
    let len = key.chars().count();
    if !(6..=24).contains(&len) {
        return Err(CoreError::invalid(
            "bgp_auth_key must be between 6 and 24 characters long",
        ));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(CoreError::invalid("bgp_auth_key cannot contain any whitespace"));
    }
    Ok(())
}

pub fn validate_cidr(field: &str, value: &str) -> Result<(), CoreError> {
    value.parse::<IpNet>().map(|_| ()).map_err(|e| {
        CoreError::invalid(format!("expected {field} to be a valid CIDR, got {value:?}: {e}"))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn aws(f: impl FnOnce(&mut AwsPartnerConfig)) -> AwsPartnerConfig {
        let mut cfg = AwsPartnerConfig::default();
        f(&mut cfg);
        cfg
    }

    #[test]
    fn port_speed_and_term() {
        let ok = CreatePortIntent {
            speed: Some(10_000),
            term: Some(12),
            ..CreatePortIntent::default()
        };
        assert!(ok.validate().is_ok());

        let bad_speed = CreatePortIntent {
            speed: Some(2_500),
            ..CreatePortIntent::default()
        };
        let err = bad_speed.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid intent: speed must be one of 1000, 10000, 100000, got 2500"
        );

        let bad_term = CreatePortIntent {
            term: Some(6),
            ..CreatePortIntent::default()
        };
        assert!(bad_term.validate().is_err());
        assert!(CreatePortIntent::default().validate().is_ok());
    }

    #[test]
    fn bgp_auth_key_rules() {
        assert!(validate_bgp_auth_key("abcdef").is_ok());
        assert!(validate_bgp_auth_key("abcde").is_err());
        assert!(validate_bgp_auth_key(&"x".repeat(25)).is_err());
        assert!(validate_bgp_auth_key("abc def").is_err());
        assert!(validate_bgp_auth_key("abc\tdef").is_err());
    }

    #[test]
    fn prefixes_only_on_public_connections() {
        let private = aws(|c| {
            c.connection_type = Some(AwsConnectionType::Private);
            c.prefixes = Some(vec!["10.0.0.0/24".into()]);
        });
        assert!(matches!(
            private.validate(),
            Err(CoreError::InvalidIntent { .. })
        ));

        let public = aws(|c| {
            c.connection_type = Some(AwsConnectionType::Public);
            c.prefixes = Some(vec!["10.0.0.0/24".into()]);
        });
        assert!(public.validate().is_ok());

        let empty = aws(|c| c.prefixes = Some(Vec::new()));
        assert!(empty.validate().is_ok());
    }

    #[test]
    fn addresses_must_be_cidr() {
        let bad = aws(|c| c.amazon_ip_address = Some("169.254.0.1".into()));
        assert!(bad.validate().is_err());
        let good = aws(|c| {
            c.amazon_ip_address = Some("169.254.0.1/30".into());
            c.customer_ip_address = Some("169.254.0.2/30".into());
        });
        assert!(good.validate().is_ok());
    }

    #[test]
    fn gcp_pairing_key_format() {
        let good = GcpPartnerConfig {
            pairing_key: Some("7e51371e-72a3-40b5-b844-2e3efefaee59/australia-southeast1/2".into()),
        };
        assert!(good.validate().is_ok());

        let bad = GcpPartnerConfig {
            pairing_key: Some("not-a-key".into()),
        };
        assert!(bad.validate().is_err());
        assert!(GcpPartnerConfig::default().validate().is_ok());
    }
}
