//! Shared configuration for Megaport tools.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `megaport_core::ProvisionerConfig`. The CLI layers
//! its global flags on top of what this crate resolves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use megaport_api::{Environment, TransportConfig};
use megaport_core::{Credentials, PollPolicy, ProvisionerConfig};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Keyring service name for stored secrets.
pub const KEYRING_SERVICE: &str = "megaport";

/// Environment variable consulted for a token when the profile names none.
pub const TOKEN_ENV: &str = "MEGAPORT_TOKEN";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile by name, falling back to `default_profile`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, p)| (k.as_str(), p))
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

/// Settings shared by every profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// HTTP request timeout in seconds, unless the profile or `--timeout`
    /// says otherwise.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named Megaport account profile.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// `production` or `staging`. Ignored when `endpoint` is set.
    pub environment: Option<Environment>,

    /// Explicit API base URL.
    pub endpoint: Option<String>,

    /// API token (plaintext — prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the token.
    pub token_env: Option<String>,

    /// Username for login.
    pub username: Option<String>,

    /// Password for login (plaintext — prefer keyring).
    pub password: Option<String>,

    /// One-time password, for accounts with MFA.
    pub otp: Option<String>,

    /// HTTP request timeout in seconds.
    pub timeout: Option<u64>,

    /// Grace period after a submission before the first poll.
    pub poll_delay_secs: Option<u64>,

    /// Delay between polls.
    pub poll_interval_secs: Option<u64>,

    /// Deadline for a whole create/update/delete.
    pub operation_timeout_secs: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "megaport", "megaport").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("megaport");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file + environment.
///
/// Nested keys use a double underscore, e.g.
/// `MEGAPORT_PROFILES__LAB__ENVIRONMENT=staging`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MEGAPORT_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Keyring ─────────────────────────────────────────────────────────

fn keyring_entry(profile_name: &str, kind: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{kind}"))
}

fn keyring_secret(profile_name: &str, kind: &str) -> Option<SecretString> {
    keyring_entry(profile_name, kind)
        .and_then(|entry| entry.get_password())
        .ok()
        .map(SecretString::from)
}

/// Store a token for `profile_name` in the system keyring.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name, "token")?.set_password(token)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve a token from the credential chain: the profile's `token_env`,
/// then `MEGAPORT_TOKEN`, then the keyring, then plaintext config.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Option<SecretString> {
    // 1. Profile's token_env → env var lookup
    if let Some(val) = profile
        .token_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
    {
        return Some(SecretString::from(val));
    }

    // 2. Well-known env var
    if let Ok(val) = std::env::var(TOKEN_ENV) {
        return Some(SecretString::from(val));
    }

    // 3. System keyring
    if let Some(secret) = keyring_secret(profile_name, "token") {
        return Some(secret);
    }

    // 4. Plaintext in config
    profile.token.clone().map(SecretString::from)
}

/// Resolve login credentials (username + password + optional OTP).
pub fn resolve_login(profile: &Profile, profile_name: &str) -> Result<Credentials, ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("MEGAPORT_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    let password = std::env::var("MEGAPORT_PASSWORD")
        .ok()
        .map(SecretString::from)
        .or_else(|| keyring_secret(profile_name, "password"))
        .or_else(|| profile.password.clone().map(SecretString::from))
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    Ok(Credentials::Login {
        username,
        password,
        otp: profile.otp.clone().filter(|o| !o.is_empty()),
    })
}

/// A token if one resolves, otherwise a login.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Credentials, ConfigError> {
    match resolve_token(profile, profile_name) {
        Some(token) => Ok(Credentials::Token(token)),
        None => resolve_login(profile, profile_name),
    }
}

/// API base URL for a profile: explicit `endpoint`, else `environment`.
pub fn resolve_endpoint(profile: &Profile) -> Result<String, ConfigError> {
    match &profile.endpoint {
        Some(endpoint) => {
            let url: url::Url = endpoint.parse().map_err(|_| ConfigError::Validation {
                field: "endpoint".into(),
                reason: format!("invalid URL: {endpoint}"),
            })?;
            Ok(url.to_string())
        }
        None => Ok(profile
            .environment
            .unwrap_or_default()
            .base_url()
            .to_owned()),
    }
}

/// Poll tuning for a profile; unset fields keep the engine defaults.
pub fn resolve_poll_policy(profile: &Profile) -> Result<PollPolicy, ConfigError> {
    let defaults = PollPolicy::default();
    let policy = PollPolicy {
        initial_delay: profile
            .poll_delay_secs
            .map_or(defaults.initial_delay, Duration::from_secs),
        interval: profile
            .poll_interval_secs
            .map_or(defaults.interval, Duration::from_secs),
        timeout: profile
            .operation_timeout_secs
            .map_or(defaults.timeout, Duration::from_secs),
    };
    if policy.interval.is_zero() {
        return Err(ConfigError::Validation {
            field: "poll_interval_secs".into(),
            reason: "must be greater than zero".into(),
        });
    }
    Ok(policy)
}

/// Build a `ProvisionerConfig` from a profile — no CLI flag overrides.
///
/// A profile without any credentials still yields a config; reference
/// lookups work unauthenticated and everything else fails at the API.
pub fn profile_to_provisioner_config(
    profile: &Profile,
    profile_name: &str,
) -> Result<ProvisionerConfig, ConfigError> {
    let endpoint = resolve_endpoint(profile)?;

    let credentials = match resolve_credentials(profile, profile_name) {
        Ok(credentials) => Some(credentials),
        Err(ConfigError::NoCredentials { .. }) => None,
        Err(e) => return Err(e),
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or_else(default_timeout));

    Ok(ProvisionerConfig {
        endpoint,
        credentials,
        transport: TransportConfig::default().with_timeout(timeout),
        poll: resolve_poll_policy(profile)?,
    })
}
