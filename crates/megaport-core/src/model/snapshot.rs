// ── Observed snapshots ──
//
// Typed views of what the provider currently reports for a product,
// converted from the raw `megaport_api::models` shapes.

use chrono::{DateTime, Utc};
use megaport_api::models::{CspConnection, Product, VxcEnd, VxcProduct};
use serde::Serialize;

use super::{ProductUid, ProvisioningStatus};

// ── Ports and MCRs ───────────────────────────────────────────────────

/// A port or virtual router as last observed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortSnapshot {
    pub uid: ProductUid,
    pub name: String,
    pub product_type: String,
    pub status: ProvisioningStatus,
    pub location_id: u64,
    /// Port speed, or the rate limit for an MCR (Mbps).
    pub speed: u64,
    pub term: u64,
    pub invoice_reference: String,
    pub marketplace_visibility: bool,
    pub is_virtual: bool,
    /// Virtual router ASN; only present for MCRs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asn: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

/// MCRs share the product shape with ports.
pub type McrSnapshot = PortSnapshot;

impl From<Product> for PortSnapshot {
    fn from(p: Product) -> Self {
        Self {
            uid: ProductUid::from(p.product_uid),
            status: ProvisioningStatus::from(p.provisioning_status.as_str()),
            name: p.product_name,
            product_type: p.product_type,
            location_id: p.location_id,
            speed: p.port_speed,
            term: p.contract_term_months,
            invoice_reference: p.cost_centre,
            marketplace_visibility: p.marketplace_visibility,
            is_virtual: p.is_virtual,
            asn: p.resources.virtual_router.map(|vr| vr.mcr_asn),
            created: p.create_date,
        }
    }
}

// ── Cross-connects ───────────────────────────────────────────────────

/// Private VXCs join two customer products; cloud VXCs terminate on a
/// partner port and carry a cloud-side connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VxcKind {
    Private,
    Cloud,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EndpointSnapshot {
    pub product_uid: String,
    pub location_id: u64,
    /// `0` when the provider has not assigned a tag.
    pub vlan: u16,
}

impl From<VxcEnd> for EndpointSnapshot {
    fn from(end: VxcEnd) -> Self {
        Self {
            product_uid: end.product_uid,
            location_id: end.location_id,
            vlan: end.vlan,
        }
    }
}

/// AWS side of a hosted connection, as reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AwsConnectionState {
    pub name: String,
    pub owner_account: String,
    pub amazon_ip_address: String,
    pub customer_ip_address: String,
    pub asn: u64,
    pub auth_key: String,
    /// Upper case as reported (`PRIVATE` / `PUBLIC`).
    pub connection_type: String,
    pub prefixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "connect_type", rename_all = "lowercase")]
pub enum PartnerConnection {
    Aws(AwsConnectionState),
    Gcp { pairing_key: String },
    /// A cloud the engine does not model.
    Other,
}

impl From<CspConnection> for PartnerConnection {
    fn from(c: CspConnection) -> Self {
        match c {
            CspConnection::Aws(aws) => Self::Aws(AwsConnectionState {
                name: aws.name,
                owner_account: aws.owner_account,
                amazon_ip_address: aws.amazon_ip_address,
                customer_ip_address: aws.customer_ip_address,
                asn: aws.asn,
                auth_key: aws.auth_key,
                connection_type: aws.connection_type,
                prefixes: aws
                    .prefixes
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_owned)
                    .collect(),
            }),
            CspConnection::Gcp(gcp) => Self::Gcp {
                pairing_key: gcp.pairing_key,
            },
            CspConnection::Other => Self::Other,
        }
    }
}

/// A VXC as last observed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VxcSnapshot {
    pub uid: ProductUid,
    pub name: String,
    pub status: ProvisioningStatus,
    pub rate_limit: u64,
    pub invoice_reference: String,
    pub a_end: EndpointSnapshot,
    pub b_end: EndpointSnapshot,
    pub partners: Vec<PartnerConnection>,
}

impl VxcSnapshot {
    pub fn kind(&self) -> VxcKind {
        if self.partners.is_empty() {
            VxcKind::Private
        } else {
            VxcKind::Cloud
        }
    }

    pub fn aws(&self) -> Option<&AwsConnectionState> {
        self.partners.iter().find_map(|p| match p {
            PartnerConnection::Aws(aws) => Some(aws),
            _ => None,
        })
    }

    pub fn gcp_pairing_key(&self) -> Option<&str> {
        self.partners.iter().find_map(|p| match p {
            PartnerConnection::Gcp { pairing_key } => Some(pairing_key.as_str()),
            _ => None,
        })
    }
}

impl From<VxcProduct> for VxcSnapshot {
    fn from(v: VxcProduct) -> Self {
        Self {
            uid: ProductUid::from(v.product_uid),
            status: ProvisioningStatus::from(v.provisioning_status.as_str()),
            name: v.product_name,
            rate_limit: v.rate_limit,
            invoice_reference: v.cost_centre,
            a_end: v.a_end.into(),
            b_end: v.b_end.into(),
            partners: v
                .resources
                .csp_connection
                .into_iter()
                .map(PartnerConnection::from)
                .collect(),
        }
    }
}
