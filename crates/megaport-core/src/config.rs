// ── Runtime provisioning configuration ──
//
// Describes how the engine talks to the provider and how patiently it
// waits. Never touches disk: the CLI (or any other host) builds a
// `ProvisionerConfig` and hands it in.

use std::time::Duration;

use megaport_api::{Environment, TransportConfig};
use secrecy::SecretString;

/// How long to wait before the first poll, between polls, and overall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Grace period after a submission before the first read.
    pub initial_delay: Duration,
    /// Minimum delay between two reads of the same product.
    pub interval: Duration,
    /// Deadline for the whole wait, measured from submission.
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            interval: Duration::from_secs(10),
            timeout: Duration::from_secs(5 * 60),
        }
    }
}

/// How to authenticate with the provider.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// A token obtained earlier (e.g. via `megaport token`).
    Token(SecretString),
    /// Log in on connect.
    Login {
        username: String,
        password: SecretString,
        otp: Option<String>,
    },
}

/// Configuration for a single provider account.
#[derive(Debug, Clone)]
pub struct ProvisionerConfig {
    /// API base URL. Defaults to the production endpoint.
    pub endpoint: String,
    pub credentials: Option<Credentials>,
    pub transport: TransportConfig,
    pub poll: PollPolicy,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            endpoint: Environment::Production.base_url().to_owned(),
            credentials: None,
            transport: TransportConfig::default(),
            poll: PollPolicy::default(),
        }
    }
}
