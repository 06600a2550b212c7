// Response types for the Megaport v2 API.
//
// Several shapes differ from the published documentation; these structs
// follow what the API actually returns. Every struct is `#[serde(default)]`
// because the provider omits fields freely depending on product state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── Envelope ────────────────────────────────────────────────────────

/// The `{message, data}` wrapper around every response body.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LoginData {
    pub token: String,
}

// ── Product kind ────────────────────────────────────────────────────

/// Product family, as used in update paths (`/v2/product/{kind}/{uid}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ProductKind {
    #[strum(serialize = "megaport")]
    Port,
    #[strum(serialize = "mcr2")]
    Mcr,
    Vxc,
}

impl ProductKind {
    /// The `productType` value sent in order payloads.
    pub fn product_type(self) -> &'static str {
        match self {
            Self::Port => "MEGAPORT",
            Self::Mcr => "MCR2",
            Self::Vxc => "VXC",
        }
    }
}

// ── Orders ──────────────────────────────────────────────────────────

/// One element of the `/v2/networkdesign/buy` response list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderResult {
    #[serde(rename = "technicalServiceUid", skip_serializing_if = "Option::is_none")]
    pub technical_service_uid: Option<String>,
    #[serde(
        rename = "vxcJTechnicalServiceUid",
        skip_serializing_if = "Option::is_none"
    )]
    pub vxc_technical_service_uid: Option<String>,
}

impl OrderResult {
    /// The identity assigned to the purchased product of the given kind.
    pub fn uid_for(&self, kind: ProductKind) -> Option<&str> {
        match kind {
            ProductKind::Vxc => self.vxc_technical_service_uid.as_deref(),
            ProductKind::Port | ProductKind::Mcr => self.technical_service_uid.as_deref(),
        }
    }
}

// ── Ports and virtual routers ───────────────────────────────────────

/// A port or MCR as returned by `GET /v2/product/{uid}` and `/v2/products`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub product_uid: String,
    pub product_name: String,
    pub product_type: String,
    pub provisioning_status: String,
    pub location_id: u64,
    pub port_speed: u64,
    #[serde(deserialize_with = "null_default")]
    pub cost_centre: String,
    pub marketplace_visibility: bool,
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
    pub contract_term_months: u64,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub create_date: Option<DateTime<Utc>>,
    pub resources: ProductResources,
    pub associated_vxcs: Vec<VxcProduct>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductResources {
    #[serde(alias = "virtualRouter", skip_serializing_if = "Option::is_none")]
    pub virtual_router: Option<VirtualRouter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualRouter {
    #[serde(alias = "mcrASN")]
    pub mcr_asn: u64,
    pub resource_name: String,
}

// ── Cross-connects ──────────────────────────────────────────────────

/// A VXC as returned by `GET /v2/product/{uid}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VxcProduct {
    pub product_uid: String,
    pub product_name: String,
    pub product_type: String,
    pub provisioning_status: String,
    pub rate_limit: u64,
    #[serde(deserialize_with = "null_default")]
    pub cost_centre: String,
    pub a_end: VxcEnd,
    pub b_end: VxcEnd,
    pub resources: VxcResources,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VxcEnd {
    pub product_uid: String,
    pub product_name: String,
    pub location_id: u64,
    #[serde(deserialize_with = "null_default")]
    pub vlan: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VxcResources {
    /// The provider returns either a single object or a list here.
    #[serde(deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub csp_connection: Vec<CspConnection>,
}

impl VxcResources {
    pub fn aws(&self) -> Option<&AwsConnection> {
        self.csp_connection.iter().find_map(|c| match c {
            CspConnection::Aws(aws) => Some(aws),
            _ => None,
        })
    }

    pub fn gcp(&self) -> Option<&GcpConnection> {
        self.csp_connection.iter().find_map(|c| match c {
            CspConnection::Gcp(gcp) => Some(gcp),
            _ => None,
        })
    }
}

/// Cloud-side connection details, tagged by `connectType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "connectType")]
pub enum CspConnection {
    #[serde(rename = "AWS")]
    Aws(AwsConnection),
    #[serde(rename = "GOOGLE")]
    Gcp(GcpConnection),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AwsConnection {
    pub name: String,
    pub owner_account: String,
    pub amazon_ip_address: String,
    pub customer_ip_address: String,
    pub asn: u64,
    pub auth_key: String,
    #[serde(rename = "type")]
    pub connection_type: String,
    /// Comma-separated list of advertised prefixes (public connections).
    pub prefixes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GcpConnection {
    pub pairing_key: String,
}

fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<CspConnection>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(D::Error::custom))
            .collect(),
        obj @ Value::Object(_) => serde_json::from_value(obj)
            .map(|c| vec![c])
            .map_err(D::Error::custom),
        other => Err(D::Error::custom(format!(
            "expected csp_connection object or list, got {other}"
        ))),
    }
}

// ── Reference data ──────────────────────────────────────────────────

/// A data-centre location from `/v2/locations`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub id: u64,
    pub name: String,
    pub country: String,
    pub metro: String,
    pub market: String,
    pub site_code: String,
    pub network_region: String,
    pub status: String,
    #[serde(rename = "vRouterAvailable")]
    pub v_router_available: bool,
    pub products: LocationProducts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationProducts {
    pub mcr: bool,
    pub mcr_version: u64,
    pub megaport: Vec<u64>,
    pub mcr2: Vec<u64>,
}

/// A partner (cloud or marketplace) port from `/v2/dropdowns/partner/megaports`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartnerPort {
    pub product_uid: String,
    pub title: String,
    pub company_name: String,
    pub company_uid: String,
    /// `AWS`, `GOOGLE`, `DEFAULT` (marketplace) and others.
    pub connect_type: String,
    pub location_id: u64,
    pub speed: u64,
    pub rank: u64,
    pub vxc_permitted: bool,
    #[serde(rename = "lag_id")]
    pub lag_id: u64,
    #[serde(rename = "aggregation_id")]
    pub aggregation_id: u64,
}

// ── Price book ──────────────────────────────────────────────────────

/// A quote from `/v2/pricebook/{product}`. Amounts are in `currency`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Charges {
    pub price: f64,
    pub monthly_rate: f64,
    pub monthly_setup: f64,
    pub discount: f64,
    pub currency: String,
    pub product_type: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn csp_connection_accepts_single_object() {
        let res: VxcResources =
            serde_json::from_value(json!({"csp_connection": {"connectType": "AWS"}})).unwrap();
        assert_eq!(
            res.csp_connection,
            vec![CspConnection::Aws(AwsConnection::default())]
        );
    }

    #[test]
    fn csp_connection_accepts_list() {
        let res: VxcResources = serde_json::from_value(json!({
            "csp_connection": [
                {"connectType": "AWS", "type": "PRIVATE", "asn": 65000},
                {"connectType": "GOOGLE", "pairingKey": "k/europe-west2/1"},
                {"connectType": "AZURE"}
            ]
        }))
        .unwrap();
        assert_eq!(res.csp_connection.len(), 3);
        assert_eq!(res.aws().unwrap().asn, 65000);
        assert_eq!(res.gcp().unwrap().pairing_key, "k/europe-west2/1");
        assert_eq!(res.csp_connection[2], CspConnection::Other);
    }

    #[test]
    fn csp_connection_rejects_untagged_and_scalars() {
        assert!(serde_json::from_value::<VxcResources>(json!({"csp_connection": {}})).is_err());
        assert!(
            serde_json::from_value::<VxcResources>(json!({"csp_connection": "foo"})).is_err()
        );
    }

    #[test]
    fn product_kind_paths() {
        assert_eq!(ProductKind::Port.to_string(), "megaport");
        assert_eq!(ProductKind::Mcr.to_string(), "mcr2");
        assert_eq!(ProductKind::Vxc.to_string(), "vxc");
    }

    #[test]
    fn order_result_picks_uid_by_kind() {
        let vxc: OrderResult =
            serde_json::from_value(json!({"vxcJTechnicalServiceUid": "v-1"})).unwrap();
        assert_eq!(vxc.uid_for(ProductKind::Vxc), Some("v-1"));
        assert_eq!(vxc.uid_for(ProductKind::Port), None);
    }
}
