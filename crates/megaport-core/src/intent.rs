// ── Caller intents ──
//
// One value type per operation. Every attribute is optional: `None` means
// "do not send, do not compare", which is not the same as `Some(0)` or
// `Some("")`. Update intents additionally name the product they target.

use serde::{Deserialize, Serialize};

use crate::model::ProductUid;

// ── Ports ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatePortIntent {
    pub name: Option<String>,
    pub location_id: Option<u64>,
    /// Mbps: 1000, 10000 or 100000.
    pub speed: Option<u64>,
    /// Contract term in months: 1, 12, 24 or 36.
    pub term: Option<u64>,
    pub invoice_reference: Option<String>,
    pub marketplace_visibility: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePortIntent {
    pub product_uid: ProductUid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub invoice_reference: Option<String>,
    #[serde(default)]
    pub marketplace_visibility: Option<bool>,
}

impl UpdatePortIntent {
    pub fn new(product_uid: impl Into<ProductUid>) -> Self {
        Self {
            product_uid: product_uid.into(),
            name: None,
            invoice_reference: None,
            marketplace_visibility: None,
        }
    }
}

// ── Virtual routers ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateMcrIntent {
    pub name: Option<String>,
    pub location_id: Option<u64>,
    /// Mbps.
    pub rate_limit: Option<u64>,
    /// Only sent when non-zero; the provider picks one otherwise.
    pub asn: Option<u64>,
    pub invoice_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMcrIntent {
    pub product_uid: ProductUid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub invoice_reference: Option<String>,
}

impl UpdateMcrIntent {
    pub fn new(product_uid: impl Into<ProductUid>) -> Self {
        Self {
            product_uid: product_uid.into(),
            name: None,
            invoice_reference: None,
        }
    }
}

// ── Cross-connects ───────────────────────────────────────────────────

/// One end of a VXC. A VLAN of `None` or `Some(0)` lets the provider
/// assign the tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoint {
    pub product_uid: Option<ProductUid>,
    pub vlan: Option<u16>,
}

impl Endpoint {
    pub fn new(product_uid: impl Into<ProductUid>) -> Self {
        Self {
            product_uid: Some(product_uid.into()),
            vlan: None,
        }
    }

    pub fn with_vlan(mut self, vlan: u16) -> Self {
        self.vlan = Some(vlan);
        self
    }

    /// The explicitly requested tag, if one was requested.
    pub(crate) fn requested_vlan(&self) -> Option<u16> {
        self.vlan.filter(|v| *v > 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatePrivateVxcIntent {
    pub name: Option<String>,
    pub rate_limit: Option<u64>,
    pub invoice_reference: Option<String>,
    pub a_end: Endpoint,
    pub b_end: Endpoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePrivateVxcIntent {
    pub product_uid: ProductUid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rate_limit: Option<u64>,
    #[serde(default)]
    pub invoice_reference: Option<String>,
    #[serde(default)]
    pub vlan_a: Option<u16>,
    #[serde(default)]
    pub vlan_b: Option<u16>,
}

impl UpdatePrivateVxcIntent {
    pub fn new(product_uid: impl Into<ProductUid>) -> Self {
        Self {
            product_uid: product_uid.into(),
            name: None,
            rate_limit: None,
            invoice_reference: None,
            vlan_a: None,
            vlan_b: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCloudVxcIntent {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rate_limit: Option<u64>,
    #[serde(default)]
    pub invoice_reference: Option<String>,
    #[serde(default)]
    pub a_end: Endpoint,
    /// The partner (cloud) port the VXC terminates on.
    #[serde(default)]
    pub b_end_product_uid: Option<ProductUid>,
    pub partner: PartnerConfig,
}

impl CreateCloudVxcIntent {
    pub fn new(partner: PartnerConfig) -> Self {
        Self {
            name: None,
            rate_limit: None,
            invoice_reference: None,
            a_end: Endpoint::default(),
            b_end_product_uid: None,
            partner,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCloudVxcIntent {
    pub product_uid: ProductUid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub rate_limit: Option<u64>,
    #[serde(default)]
    pub invoice_reference: Option<String>,
    #[serde(default)]
    pub vlan_a: Option<u16>,
    pub partner: PartnerConfig,
}

impl UpdateCloudVxcIntent {
    pub fn new(product_uid: impl Into<ProductUid>, partner: PartnerConfig) -> Self {
        Self {
            product_uid: product_uid.into(),
            name: None,
            rate_limit: None,
            invoice_reference: None,
            vlan_a: None,
            partner,
        }
    }
}

// ── Partner configuration ────────────────────────────────────────────

/// Cloud-side settings of a cloud VXC. Exactly one cloud per intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cloud", rename_all = "lowercase")]
pub enum PartnerConfig {
    Aws(AwsPartnerConfig),
    Gcp(GcpPartnerConfig),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AwsConnectionType {
    Private,
    Public,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsPartnerConfig {
    pub connection_name: Option<String>,
    pub account_id: Option<String>,
    /// CIDR, e.g. `169.254.0.1/30`.
    pub amazon_ip_address: Option<String>,
    /// CIDR, e.g. `169.254.0.2/30`.
    pub customer_ip_address: Option<String>,
    pub customer_asn: Option<u64>,
    pub bgp_auth_key: Option<String>,
    pub connection_type: Option<AwsConnectionType>,
    /// Only valid on public connections.
    pub prefixes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcpPartnerConfig {
    /// `<uuid>/<region>/<zone>` as issued by Google.
    pub pairing_key: Option<String>,
}
