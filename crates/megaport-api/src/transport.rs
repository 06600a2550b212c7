// Shared transport configuration for building reqwest::Client instances.
//
// Timeout and user agent live here so the CLI and tests build clients the
// same way the provisioner does.

use std::time::Duration;

use crate::error::Error;

/// Default user agent sent with every request.
pub const USER_AGENT: &str = concat!("megaport-rs/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    /// Appended to [`USER_AGENT`] when set.
    pub user_agent_suffix: Option<String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent_suffix: None,
        }
    }
}

impl TransportConfig {
    pub fn user_agent(&self) -> String {
        match &self.user_agent_suffix {
            Some(suffix) => format!("{USER_AGENT} {suffix}"),
            None => USER_AGENT.to_owned(),
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent())
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_suffix_is_appended() {
        let transport = TransportConfig {
            user_agent_suffix: Some("terraform/1.5".into()),
            ..TransportConfig::default()
        };
        assert_eq!(transport.user_agent(), format!("{USER_AGENT} terraform/1.5"));
        assert_eq!(TransportConfig::default().user_agent(), USER_AGENT);
    }
}
