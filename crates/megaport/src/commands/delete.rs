//! Delete command handler.
//!
//! Cancels the product, then (unless `--no-wait`) blocks until the
//! provider reports it gone and its VLAN tags are free again.

use megaport_core::{DeleteOutcome, ProductUid, Provisioner};

use crate::cli::{DeleteArgs, GlobalOpts};
use crate::commands::util;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    provisioner: &Provisioner,
    args: DeleteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let uid = ProductUid::from(args.uid);
    util::confirm(&format!("Delete {uid}"), global.yes)?;

    if args.no_wait {
        return match provisioner.client().cancel_product(uid.as_str()).await {
            Ok(()) => {
                output::print_output(&format!("{uid} cancelled"), global.quiet);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                output::print_output(&format!("{uid} is already gone"), global.quiet);
                Ok(())
            }
            Err(e) => Err(e.into()),
        };
    }

    let spinner = util::spinner(format!("Deleting {uid}"), global.quiet);
    let result = provisioner.delete(&uid).await;
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let message = match result? {
        DeleteOutcome::Deleted => format!("{uid} deleted"),
        DeleteOutcome::AlreadyGone => format!("{uid} is already gone"),
    };
    output::print_output(&message, global.quiet);
    Ok(())
}
