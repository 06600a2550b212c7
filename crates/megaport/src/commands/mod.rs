//! Command dispatch: bridges CLI args -> provisioner calls -> output formatting.

pub mod config_cmd;
pub mod delete;
pub mod locations;
pub mod partner_ports;
pub mod price;
pub mod product;
pub mod token;
pub mod util;
pub mod vlan;

use megaport_core::Provisioner;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a provisioner-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    provisioner: &Provisioner,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Locations(args) => locations::handle(provisioner, args, global).await,
        Command::PartnerPorts(args) => partner_ports::handle(provisioner, args, global).await,
        Command::Product(args) => product::handle(provisioner, args, global).await,
        Command::Vlan(args) => vlan::handle(provisioner, args, global).await,
        Command::Price(args) => price::handle(provisioner, args, global).await,
        Command::Delete(args) => delete::handle(provisioner, args, global).await,
        // Token, Config and Completions are handled before dispatch
        Command::Token(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
