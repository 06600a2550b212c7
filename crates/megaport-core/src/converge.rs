// ── Convergence predicates ──
//
// Decide whether an observed snapshot reflects an update intent. A field
// left unset in the intent always matches; a set field must equal what the
// provider reports. The first mismatch is named so the poll loop can log it.

use crate::intent::{
    AwsPartnerConfig, GcpPartnerConfig, PartnerConfig, UpdateCloudVxcIntent, UpdateMcrIntent,
    UpdatePortIntent, UpdatePrivateVxcIntent,
};
use crate::model::{AwsConnectionState, PortSnapshot, VxcSnapshot};

/// Outcome of comparing an intent with a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    Converged,
    /// `field` is the first attribute that does not match yet.
    Pending { field: &'static str },
}

impl Convergence {
    pub fn is_converged(self) -> bool {
        matches!(self, Self::Converged)
    }
}

/// A per-kind convergence predicate.
pub trait Converge<S> {
    fn converge(&self, snapshot: &S) -> Convergence;
}

/// Accumulates field checks, keeping the first mismatch.
#[derive(Default)]
struct Fields {
    pending: Option<&'static str>,
}

impl Fields {
    fn check<T: PartialEq + ?Sized>(mut self, field: &'static str, want: Option<&T>, have: &T) -> Self {
        if self.pending.is_none() && !want.is_none_or(|w| w == have) {
            self.pending = Some(field);
        }
        self
    }

    /// VLAN tags of `0` ask the provider to assign one; nothing to compare.
    fn vlan(self, field: &'static str, want: Option<u16>, have: u16) -> Self {
        self.check(field, want.filter(|v| *v > 0).as_ref(), &have)
    }

    fn nested(mut self, inner: Convergence) -> Self {
        if let (None, Convergence::Pending { field }) = (self.pending, inner) {
            self.pending = Some(field);
        }
        self
    }

    fn finish(self) -> Convergence {
        self.pending
            .map_or(Convergence::Converged, |field| Convergence::Pending { field })
    }
}

// ── Ports and MCRs ───────────────────────────────────────────────────

impl Converge<PortSnapshot> for UpdatePortIntent {
    fn converge(&self, s: &PortSnapshot) -> Convergence {
        Fields::default()
            .check("name", self.name.as_deref(), s.name.as_str())
            .check(
                "invoice_reference",
                self.invoice_reference.as_deref(),
                s.invoice_reference.as_str(),
            )
            .check(
                "marketplace_visibility",
                self.marketplace_visibility.as_ref(),
                &s.marketplace_visibility,
            )
            .finish()
    }
}

impl Converge<PortSnapshot> for UpdateMcrIntent {
    fn converge(&self, s: &PortSnapshot) -> Convergence {
        Fields::default()
            .check("name", self.name.as_deref(), s.name.as_str())
            .check(
                "invoice_reference",
                self.invoice_reference.as_deref(),
                s.invoice_reference.as_str(),
            )
            .finish()
    }
}

// ── Cross-connects ───────────────────────────────────────────────────

impl Converge<VxcSnapshot> for UpdatePrivateVxcIntent {
    fn converge(&self, s: &VxcSnapshot) -> Convergence {
        Fields::default()
            .check("name", self.name.as_deref(), s.name.as_str())
            .check("rate_limit", self.rate_limit.as_ref(), &s.rate_limit)
            .check(
                "invoice_reference",
                self.invoice_reference.as_deref(),
                s.invoice_reference.as_str(),
            )
            .vlan("vlan_a", self.vlan_a, s.a_end.vlan)
            .vlan("vlan_b", self.vlan_b, s.b_end.vlan)
            .finish()
    }
}

impl Converge<VxcSnapshot> for UpdateCloudVxcIntent {
    fn converge(&self, s: &VxcSnapshot) -> Convergence {
        Fields::default()
            .check("name", self.name.as_deref(), s.name.as_str())
            .check("rate_limit", self.rate_limit.as_ref(), &s.rate_limit)
            .check(
                "invoice_reference",
                self.invoice_reference.as_deref(),
                s.invoice_reference.as_str(),
            )
            .vlan("vlan_a", self.vlan_a, s.a_end.vlan)
            .nested(self.partner.converge(s))
            .finish()
    }
}

impl Converge<VxcSnapshot> for PartnerConfig {
    fn converge(&self, s: &VxcSnapshot) -> Convergence {
        match self {
            Self::Aws(aws) => s
                .aws()
                .map_or(Convergence::Pending { field: "partner" }, |state| {
                    aws.converge(state)
                }),
            Self::Gcp(gcp) => converge_gcp(gcp, s.gcp_pairing_key()),
        }
    }
}

fn converge_gcp(gcp: &GcpPartnerConfig, observed: Option<&str>) -> Convergence {
    let Some(observed) = observed else {
        return Convergence::Pending { field: "partner" };
    };
    Fields::default()
        .check("pairing_key", gcp.pairing_key.as_deref(), observed)
        .finish()
}

impl Converge<AwsConnectionState> for AwsPartnerConfig {
    fn converge(&self, s: &AwsConnectionState) -> Convergence {
        // The provider reports the type upper case.
        let observed_type = s.connection_type.to_lowercase();
        let wanted_type = self.connection_type.map(|t| t.to_string());

        let mut wanted_prefixes = self.prefixes.clone();
        if let Some(p) = wanted_prefixes.as_mut() {
            p.sort();
        }
        let mut observed_prefixes = s.prefixes.clone();
        observed_prefixes.sort();

        Fields::default()
            .check("connection_name", self.connection_name.as_deref(), s.name.as_str())
            .check("account_id", self.account_id.as_deref(), s.owner_account.as_str())
            .check(
                "amazon_ip_address",
                self.amazon_ip_address.as_deref(),
                s.amazon_ip_address.as_str(),
            )
            .check(
                "customer_ip_address",
                self.customer_ip_address.as_deref(),
                s.customer_ip_address.as_str(),
            )
            .check("customer_asn", self.customer_asn.as_ref(), &s.asn)
            .check("bgp_auth_key", self.bgp_auth_key.as_deref(), s.auth_key.as_str())
            .check("type", wanted_type.as_deref(), observed_type.as_str())
            .check("prefixes", wanted_prefixes.as_ref(), &observed_prefixes)
            .finish()
    }
}
