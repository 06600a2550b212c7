//! Token command handler.
//!
//! Logs in with username/password/OTP and prints the token as an export
//! line, or revokes the current token with `--reset`.

use std::io;

use megaport_api::MegaportClient;
use megaport_core::Credentials;
use secrecy::{ExposeSecret, SecretString};

use crate::cli::{GlobalOpts, TokenArgs};
use crate::config;
use crate::error::CliError;

fn prompt_error(e: dialoguer::Error) -> CliError {
    CliError::Io(io::Error::other(e))
}

pub async fn handle(args: TokenArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::build_provisioner_config(global)?;
    let client = MegaportClient::new(&cfg.endpoint, &cfg.transport)?;

    if args.reset {
        let Some(Credentials::Token(token)) = cfg.credentials else {
            return Err(CliError::NoToken);
        };
        client.set_token(token);
        client.logout().await?;
        eprintln!("Current token has been reset. Please login again to fetch a new one.");
        return Ok(());
    }

    let (username, password, otp) = match (args.username, cfg.credentials) {
        (None, Some(Credentials::Login { username, password, otp })) => {
            (username, password, args.otp.or(otp))
        }
        (username, _) => {
            let username = match username {
                Some(u) => u,
                None => dialoguer::Input::<String>::new()
                    .with_prompt("username")
                    .interact_text()
                    .map_err(prompt_error)?,
            };
            let password = SecretString::from(rpassword::prompt_password("password: ")?);
            let otp = match args.otp {
                Some(otp) => otp,
                None => dialoguer::Input::<String>::new()
                    .with_prompt("otp (leave empty if disabled)")
                    .allow_empty(true)
                    .interact_text()
                    .map_err(prompt_error)?,
            };
            (username, password, Some(otp))
        }
    };

    let token = client.login(&username, &password, otp.as_deref()).await?;

    if args.save {
        let file = config::load_config()?;
        let profile = config::active_profile_name(global, &file);
        megaport_config::store_token(&profile, token.expose_secret())?;
        eprintln!("Token stored in the system keyring for profile '{profile}'.");
    }

    println!("MEGAPORT_TOKEN={}", token.expose_secret());
    Ok(())
}
