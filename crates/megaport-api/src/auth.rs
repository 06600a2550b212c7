// Session authentication
//
// Token login/logout against `/v2/login` and `/v2/logout`, plus the
// well-known API environments. A successful login stores the token on the
// client; every later request sends it as `X-Auth-Token`.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde::de::IgnoredAny;
use tracing::debug;

use crate::client::MegaportClient;
use crate::error::Error;
use crate::models::LoginData;

/// Production Megaport API.
pub const ENDPOINT_PRODUCTION: &str = "https://api.megaport.com";
/// Staging Megaport API (orders are never billed).
pub const ENDPOINT_STAGING: &str = "https://api-staging.megaport.com";

/// Which Megaport deployment to talk to.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    #[default]
    Production,
    Staging,
}

impl Environment {
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Production => ENDPOINT_PRODUCTION,
            Self::Staging => ENDPOINT_STAGING,
        }
    }
}

impl MegaportClient {
    /// Log in with username, password and optional one-time password.
    ///
    /// Credentials travel as query parameters, matching the provider's
    /// login contract. On success the returned token is stored on the
    /// client and also handed back so callers can persist it.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
        otp: Option<&str>,
    ) -> Result<SecretString, Error> {
        let mut params = vec![
            ("username", username.to_owned()),
            ("password", password.expose_secret().to_owned()),
        ];
        if let Some(otp) = otp.filter(|o| !o.is_empty()) {
            params.push(("oneTimePassword", otp.to_owned()));
        }

        debug!(username, "logging in");

        let data: LoginData = self
            .post_query("v2/login", &params)
            .await
            .map_err(|e| match e {
                Error::Remote { message, .. } | Error::UnsupportedErrorData { message, .. } => {
                    Error::Authentication { message }
                }
                other => other,
            })?;

        if data.token.is_empty() {
            return Err(Error::Authentication {
                message: "login response did not contain a token".into(),
            });
        }

        let token = SecretString::from(data.token);
        self.set_token(token.clone());
        debug!("login successful");
        Ok(token)
    }

    /// Revoke the current token.
    pub async fn logout(&self) -> Result<(), Error> {
        debug!("logging out");
        let _: IgnoredAny = self.get("v2/logout").await?;
        self.clear_token();
        debug!("logout complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!("Staging".parse::<Environment>().ok(), Some(Environment::Staging));
        assert_eq!(Environment::Production.to_string(), "production");
        assert_eq!(Environment::Staging.base_url(), ENDPOINT_STAGING);
    }
}
