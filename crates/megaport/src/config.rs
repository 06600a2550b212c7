//! CLI configuration — thin wrapper around `megaport_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--endpoint, --environment, --token, --timeout).

use std::time::Duration;

use megaport_api::Environment;
use megaport_core::{Credentials, ProvisionerConfig};
use secrecy::SecretString;

use crate::cli::{ApiEnvironment, GlobalOpts};
use crate::error::CliError;

pub use megaport_config::{Config, Profile, config_path, load_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// The profile to build from. A missing profile is only an error when it
/// was asked for by name and the file defines others.
fn select_profile(global: &GlobalOpts, config: &Config) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);
    if let Some(profile) = config.profiles.get(&name) {
        return Ok((name, profile.clone()));
    }
    if global.profile.is_some() && !config.profiles.is_empty() {
        let mut available: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
        available.sort_unstable();
        return Err(CliError::ProfileNotFound {
            name,
            available: available.join(", "),
            path: config_path().display().to_string(),
        });
    }
    Ok((name, Profile::default()))
}

/// Build a `ProvisionerConfig` from the config file, profile, and CLI
/// overrides. Flags win over the profile.
pub fn build_provisioner_config(global: &GlobalOpts) -> Result<ProvisionerConfig, CliError> {
    let cfg = load_config()?;
    let (profile_name, mut profile) = select_profile(global, &cfg)?;

    if let Some(env) = global.environment {
        profile.environment = Some(match env {
            ApiEnvironment::Production => Environment::Production,
            ApiEnvironment::Staging => Environment::Staging,
        });
        profile.endpoint = None;
    }
    if let Some(endpoint) = &global.endpoint {
        profile.endpoint = Some(endpoint.clone());
    }

    let mut config = megaport_config::profile_to_provisioner_config(&profile, &profile_name)?;

    if let Some(token) = &global.token {
        config.credentials = Some(Credentials::Token(SecretString::from(token.clone())));
    }
    let timeout = global.timeout.or(profile.timeout).unwrap_or(cfg.defaults.timeout);
    config.transport.timeout = Duration::from_secs(timeout);

    tracing::debug!(
        profile = %profile_name,
        endpoint = %config.endpoint,
        "resolved provisioner config"
    );
    Ok(config)
}
