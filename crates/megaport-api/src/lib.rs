// megaport-api: Async Rust client for the Megaport provisioning API

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod order;
pub mod transport;

pub use auth::Environment;
pub use client::MegaportClient;
pub use error::{Error, ErrorData};
pub use models::ProductKind;
pub use transport::TransportConfig;
