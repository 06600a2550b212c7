// ── Order payload builder ──
//
// Pure intent → wire translation. Unset intent fields are omitted, never
// zeroed, and an intent with nothing set still produces the emptiest legal
// payload for its shape: `[{}]` for orders, `{}` for updates.

use megaport_api::ProductKind;
use megaport_api::order::{
    AssociatedVxcOrder, AwsPartnerPayload, GcpPartnerPayload, PartnerConfigPayload, PortOrder,
    PortOrderConfig, ProductUpdate, VxcEndOrder, VxcOrder, VxcUpdate,
};
use serde::Serialize;

use crate::intent::{
    AwsPartnerConfig, CreateCloudVxcIntent, CreateMcrIntent, CreatePortIntent,
    CreatePrivateVxcIntent, GcpPartnerConfig, PartnerConfig, UpdateCloudVxcIntent,
    UpdateMcrIntent, UpdatePortIntent, UpdatePrivateVxcIntent,
};
use crate::model::ProductUid;

/// An intent that is submitted through validate-then-buy.
pub trait OrderIntent {
    type Order: Serialize + Send + Sync;
    /// Which response field carries the new product's identity.
    const KIND: ProductKind;

    /// The one-element order list.
    fn order(&self) -> Vec<Self::Order>;
}

/// An intent applied in place with `PUT /v2/product/{kind}/{uid}`.
pub trait UpdateIntent {
    type Update: Serialize + Send + Sync;
    const KIND: ProductKind;

    fn product_uid(&self) -> &ProductUid;
    fn update(&self) -> Self::Update;
}

// ── Ports and MCRs ───────────────────────────────────────────────────

impl OrderIntent for CreatePortIntent {
    type Order = PortOrder;
    const KIND: ProductKind = ProductKind::Port;

    fn order(&self) -> Vec<PortOrder> {
        let mut order = PortOrder {
            location_id: self.location_id,
            port_speed: self.speed,
            product_name: self.name.clone(),
            term: self.term,
            cost_centre: self.invoice_reference.clone(),
            marketplace_visibility: self.marketplace_visibility,
            ..PortOrder::default()
        };
        // The discriminators belong to the shape; an empty intent stays `{}`.
        if order != PortOrder::default() {
            order.product_type = Some(ProductKind::Port.product_type().to_owned());
            order.is_virtual = Some(false);
        }
        vec![order]
    }
}

impl OrderIntent for CreateMcrIntent {
    type Order = PortOrder;
    const KIND: ProductKind = ProductKind::Mcr;

    fn order(&self) -> Vec<PortOrder> {
        let mut order = PortOrder {
            location_id: self.location_id,
            port_speed: self.rate_limit,
            product_name: self.name.clone(),
            cost_centre: self.invoice_reference.clone(),
            config: self
                .asn
                .filter(|asn| *asn > 0)
                .map(|asn| PortOrderConfig { mcr_asn: Some(asn) }),
            ..PortOrder::default()
        };
        if order != PortOrder::default() {
            order.product_type = Some(ProductKind::Mcr.product_type().to_owned());
        }
        vec![order]
    }
}

impl UpdateIntent for UpdatePortIntent {
    type Update = ProductUpdate;
    const KIND: ProductKind = ProductKind::Port;

    fn product_uid(&self) -> &ProductUid {
        &self.product_uid
    }

    fn update(&self) -> ProductUpdate {
        ProductUpdate {
            name: self.name.clone(),
            cost_centre: self.invoice_reference.clone(),
            marketplace_visibility: self.marketplace_visibility,
        }
    }
}

impl UpdateIntent for UpdateMcrIntent {
    type Update = ProductUpdate;
    const KIND: ProductKind = ProductKind::Mcr;

    fn product_uid(&self) -> &ProductUid {
        &self.product_uid
    }

    fn update(&self) -> ProductUpdate {
        ProductUpdate {
            name: self.name.clone(),
            cost_centre: self.invoice_reference.clone(),
            marketplace_visibility: None,
        }
    }
}

// ── Cross-connects ───────────────────────────────────────────────────

fn vxc_order(a_end_uid: Option<&ProductUid>, associated: AssociatedVxcOrder) -> Vec<VxcOrder> {
    let associated_vxcs = if associated.is_empty() {
        Vec::new()
    } else {
        vec![associated]
    };
    vec![VxcOrder {
        product_uid: a_end_uid.map(|uid| uid.as_str().to_owned()),
        associated_vxcs,
    }]
}

fn end(product_uid: Option<&ProductUid>, vlan: Option<u16>) -> Option<VxcEndOrder> {
    let end = VxcEndOrder {
        product_uid: product_uid.map(|uid| uid.as_str().to_owned()),
        vlan,
    };
    (!end.is_empty()).then_some(end)
}

impl OrderIntent for CreatePrivateVxcIntent {
    type Order = VxcOrder;
    const KIND: ProductKind = ProductKind::Vxc;

    fn order(&self) -> Vec<VxcOrder> {
        let associated = AssociatedVxcOrder {
            product_name: self.name.clone(),
            rate_limit: self.rate_limit,
            cost_centre: self.invoice_reference.clone(),
            a_end: end(None, self.a_end.vlan),
            b_end: end(self.b_end.product_uid.as_ref(), self.b_end.vlan),
            partner_config: None,
        };
        vxc_order(self.a_end.product_uid.as_ref(), associated)
    }
}

impl OrderIntent for CreateCloudVxcIntent {
    type Order = VxcOrder;
    const KIND: ProductKind = ProductKind::Vxc;

    fn order(&self) -> Vec<VxcOrder> {
        let associated = AssociatedVxcOrder {
            product_name: self.name.clone(),
            rate_limit: self.rate_limit,
            cost_centre: self.invoice_reference.clone(),
            a_end: end(None, self.a_end.vlan),
            b_end: end(self.b_end_product_uid.as_ref(), None),
            partner_config: partner_payload(&self.partner),
        };
        vxc_order(self.a_end.product_uid.as_ref(), associated)
    }
}

impl UpdateIntent for UpdatePrivateVxcIntent {
    type Update = VxcUpdate;
    const KIND: ProductKind = ProductKind::Vxc;

    fn product_uid(&self) -> &ProductUid {
        &self.product_uid
    }

    fn update(&self) -> VxcUpdate {
        VxcUpdate {
            a_end_vlan: self.vlan_a,
            b_end_vlan: self.vlan_b,
            cost_centre: self.invoice_reference.clone(),
            name: self.name.clone(),
            b_end_config: None,
            rate_limit: self.rate_limit,
        }
    }
}

impl UpdateIntent for UpdateCloudVxcIntent {
    type Update = VxcUpdate;
    const KIND: ProductKind = ProductKind::Vxc;

    fn product_uid(&self) -> &ProductUid {
        &self.product_uid
    }

    fn update(&self) -> VxcUpdate {
        VxcUpdate {
            a_end_vlan: self.vlan_a,
            b_end_vlan: None,
            cost_centre: self.invoice_reference.clone(),
            name: self.name.clone(),
            b_end_config: partner_payload(&self.partner),
            rate_limit: self.rate_limit,
        }
    }
}

// ── Partner configuration ────────────────────────────────────────────

/// Wire form of a partner config. `None` when no attribute is set, so an
/// empty intent does not grow a bare `connectType` object.
pub fn partner_payload(partner: &PartnerConfig) -> Option<PartnerConfigPayload> {
    match partner {
        PartnerConfig::Aws(aws) if *aws != AwsPartnerConfig::default() => {
            Some(PartnerConfigPayload::Aws(AwsPartnerPayload {
                amazon_ip_address: aws.amazon_ip_address.clone(),
                asn: aws.customer_asn,
                auth_key: aws.bgp_auth_key.clone(),
                customer_ip_address: aws.customer_ip_address.clone(),
                name: aws.connection_name.clone(),
                owner_account: aws.account_id.clone(),
                connection_type: aws.connection_type.map(|t| t.to_string()),
                prefixes: aws
                    .prefixes
                    .as_ref()
                    .filter(|p| !p.is_empty())
                    .map(|p| p.join(",")),
            }))
        }
        PartnerConfig::Gcp(gcp) if *gcp != GcpPartnerConfig::default() => {
            Some(PartnerConfigPayload::Gcp(GcpPartnerPayload {
                pairing_key: gcp.pairing_key.clone(),
            }))
        }
        PartnerConfig::Aws(_) | PartnerConfig::Gcp(_) => None,
    }
}
