// Request payloads for `/v2/networkdesign/*` and `/v2/product/{kind}/{uid}`.
//
// Every field is optional and skipped when unset: the provider treats a
// missing field as "leave alone", which is different from sending zero.

use serde::Serialize;

// ── Port / MCR orders ───────────────────────────────────────────────

/// One element of a port or MCR order list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortOrder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_speed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_centre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketplace_visibility: Option<bool>,
    #[serde(rename = "virtual", skip_serializing_if = "Option::is_none")]
    pub is_virtual: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PortOrderConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortOrderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcr_asn: Option<u64>,
}

// ── VXC orders ──────────────────────────────────────────────────────

/// One element of a VXC order list, keyed by the A-end product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VxcOrder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_uid: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub associated_vxcs: Vec<AssociatedVxcOrder>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociatedVxcOrder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_centre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a_end: Option<VxcEndOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b_end: Option<VxcEndOrder>,
    #[serde(rename = "partnerConfigs", skip_serializing_if = "Option::is_none")]
    pub partner_config: Option<PartnerConfigPayload>,
}

impl AssociatedVxcOrder {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VxcEndOrder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_uid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vlan: Option<u16>,
}

impl VxcEndOrder {
    pub fn is_empty(&self) -> bool {
        self.product_uid.is_none() && self.vlan.is_none()
    }
}

// ── Partner configuration ───────────────────────────────────────────

/// Cloud-side configuration for a partner B-end, tagged by `connectType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "connectType")]
pub enum PartnerConfigPayload {
    #[serde(rename = "AWS")]
    Aws(AwsPartnerPayload),
    #[serde(rename = "GOOGLE")]
    Gcp(GcpPartnerPayload),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsPartnerPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amazon_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asn: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_account: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    /// Comma-separated prefixes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefixes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpPartnerPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pairing_key: Option<String>,
}

// ── Updates ─────────────────────────────────────────────────────────

/// Body of `PUT /v2/product/{megaport|mcr2}/{uid}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_centre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marketplace_visibility: Option<bool>,
}

/// Body of `PUT /v2/product/vxc/{uid}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VxcUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a_end_vlan: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b_end_vlan: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_centre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b_end_config: Option<PartnerConfigPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<u64>,
}
