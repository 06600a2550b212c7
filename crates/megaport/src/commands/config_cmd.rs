//! Config command handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
        ConfigCommand::Show => {
            let mut cfg = config::load_config()?;
            for profile in cfg.profiles.values_mut() {
                if profile.token.is_some() {
                    profile.token = Some(REDACTED.into());
                }
                if profile.password.is_some() {
                    profile.password = Some(REDACTED.into());
                }
            }
            let rendered = toml::to_string_pretty(&cfg)
                .map_err(|e| CliError::Render(e.to_string()))?;
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
    }
}
