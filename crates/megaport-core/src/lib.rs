//! Provisioning reconciliation engine on top of `megaport-api`.
//!
//! The provider's API is asynchronous and eventually consistent: an order
//! returns long before the product exists, and a cancelled cross-connect
//! keeps its VLAN tags reserved for a while. This crate turns those calls
//! into operations that return only once the provider agrees:
//!
//! - **[`Provisioner`]**: facade owning the client, poll policy and
//!   reference cache. Create, read, update and delete for ports, MCRs and
//!   VXCs (private and cloud).
//!
//! - **Intents** ([`intent`]): caller-facing value types where every field
//!   is optional and `None` means "leave alone". [`Validate`] checks them
//!   locally; [`payload`] turns them into wire orders.
//!
//! - **Convergence** ([`converge`]): per-kind predicates deciding whether
//!   an observed snapshot reflects an update intent.
//!
//! - **Release** ([`release`]): VLAN claims of a VXC and the availability
//!   probe used to wait for their release after a delete.
//!
//! - **[`ReferenceCache`]**: locations, partner ports and the account's own
//!   ports, fetched once and searched by name regex.

pub mod cache;
pub mod config;
pub mod converge;
pub mod engine;
pub mod error;
pub mod intent;
pub mod model;
pub mod payload;
mod poll;
pub mod release;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{PartnerPortQuery, ReferenceCache};
pub use config::{Credentials, PollPolicy, ProvisionerConfig};
pub use converge::{Converge, Convergence};
pub use engine::{DeleteOutcome, Phase, Provisioner};
pub use error::CoreError;
pub use intent::{
    AwsConnectionType, AwsPartnerConfig, CreateCloudVxcIntent, CreateMcrIntent, CreatePortIntent,
    CreatePrivateVxcIntent, Endpoint, GcpPartnerConfig, PartnerConfig, UpdateCloudVxcIntent,
    UpdateMcrIntent, UpdatePortIntent, UpdatePrivateVxcIntent,
};
pub use payload::{OrderIntent, UpdateIntent};
pub use poll::MIN_POLL_INTERVAL;
pub use release::VlanClaim;
pub use validate::Validate;

pub use model::{
    AwsConnectionState, EndpointSnapshot, McrSnapshot, PartnerConnection, PortSnapshot,
    ProductUid, ProvisioningStatus, VxcKind, VxcSnapshot,
};
