// ── Domain model ──
//
// Identity, lifecycle status and typed snapshots of remote products.

mod identity;
mod snapshot;
mod status;

pub use identity::ProductUid;
pub use snapshot::{
    AwsConnectionState, EndpointSnapshot, McrSnapshot, PartnerConnection, PortSnapshot,
    VxcKind, VxcSnapshot,
};
pub use status::ProvisioningStatus;
