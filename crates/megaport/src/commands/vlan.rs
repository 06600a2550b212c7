//! VLAN command handler.

use megaport_core::Provisioner;

use crate::cli::{GlobalOpts, VlanArgs, VlanCommand};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    provisioner: &Provisioner,
    args: VlanArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VlanCommand::Check { port_uid, vlan } => {
            if provisioner.is_vlan_available(&port_uid, vlan).await? {
                output::print_output(&format!("VLAN {vlan} is available on {port_uid}"), global.quiet);
                Ok(())
            } else {
                Err(CliError::VlanInUse { port_uid, vlan })
            }
        }
    }
}
