//! Location command handler.

use megaport_api::models::Location;
use megaport_core::Provisioner;
use tabled::Tabled;

use crate::cli::{GlobalOpts, LocationsArgs};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct LocationRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Metro")]
    metro: String,
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "MCR")]
    mcr: &'static str,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Location> for LocationRow {
    fn from(l: &Location) -> Self {
        Self {
            id: l.id,
            name: l.name.clone(),
            metro: l.metro.clone(),
            country: l.country.clone(),
            mcr: if l.products.mcr || l.v_router_available {
                "yes"
            } else {
                "-"
            },
            status: l.status.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    provisioner: &Provisioner,
    args: LocationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let locations = match args.name {
        Some(name) => vec![provisioner.find_location(&name).await?],
        None => provisioner
            .cache()
            .locations(provisioner.client())
            .await?
            .to_vec(),
    };
    let out = output::render_list(
        &global.output,
        &locations,
        |l| LocationRow::from(l),
        |l| l.id.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
