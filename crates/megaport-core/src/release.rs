// ── VLAN release checks ──
//
// A cancelled VXC keeps its VLAN tags reserved on the owning ports until
// the provider finishes tearing it down. These helpers find the tags a
// VXC holds and ask the port whether each one is free again.

use std::fmt;

use megaport_api::MegaportClient;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{VxcKind, VxcSnapshot};

/// A VLAN tag held on a port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlanClaim {
    pub port_uid: String,
    pub vlan: u16,
}

impl fmt::Display for VlanClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VLAN {} on {}", self.vlan, self.port_uid)
    }
}

/// Whether `vlan` is free on `port_uid`.
///
/// The port's VLAN endpoint lists the ids still assigned for the query;
/// the tag is available iff it is absent from that list.
pub async fn is_vlan_available(
    client: &MegaportClient,
    port_uid: &str,
    vlan: u16,
) -> Result<bool, CoreError> {
    let assigned = client.port_vlan_ids(port_uid, vlan).await?;
    let available = !assigned.contains(&vlan);
    debug!(port_uid, vlan, available, "checked VLAN availability");
    Ok(available)
}

/// Claims that must be released before a deleted VXC is really gone.
///
/// The A-end tag always counts. The B-end tag only counts for private
/// VXCs: on a cloud VXC the B-end sits on a partner port, which never
/// reports the tag as released to the customer.
pub fn claims_of(snapshot: &VxcSnapshot) -> Vec<VlanClaim> {
    let mut claims = Vec::new();
    if snapshot.a_end.vlan > 0 {
        claims.push(VlanClaim {
            port_uid: snapshot.a_end.product_uid.clone(),
            vlan: snapshot.a_end.vlan,
        });
    }
    if snapshot.b_end.vlan > 0 && snapshot.kind() == VxcKind::Private {
        claims.push(VlanClaim {
            port_uid: snapshot.b_end.product_uid.clone(),
            vlan: snapshot.b_end.vlan,
        });
    }
    claims
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EndpointSnapshot, PartnerConnection, ProductUid, ProvisioningStatus};

    fn snapshot(a_vlan: u16, b_vlan: u16, partners: Vec<PartnerConnection>) -> VxcSnapshot {
        VxcSnapshot {
            uid: ProductUid::from("vxc-1"),
            name: String::new(),
            status: ProvisioningStatus::Live,
            rate_limit: 0,
            invoice_reference: String::new(),
            a_end: EndpointSnapshot {
                product_uid: "port-a".into(),
                location_id: 0,
                vlan: a_vlan,
            },
            b_end: EndpointSnapshot {
                product_uid: "port-b".into(),
                location_id: 0,
                vlan: b_vlan,
            },
            partners,
        }
    }

    #[test]
    fn private_vxc_claims_both_ends() {
        let claims = claims_of(&snapshot(100, 200, Vec::new()));
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[1].to_string(), "VLAN 200 on port-b");
    }

    #[test]
    fn cloud_vxc_claims_a_end_only() {
        let claims = claims_of(&snapshot(
            100,
            200,
            vec![PartnerConnection::Gcp {
                pairing_key: "k".into(),
            }],
        ));
        assert_eq!(
            claims,
            vec![VlanClaim {
                port_uid: "port-a".into(),
                vlan: 100
            }]
        );
    }

    #[test]
    fn unassigned_tags_are_not_claims() {
        assert!(claims_of(&snapshot(0, 0, Vec::new())).is_empty());
    }
}
