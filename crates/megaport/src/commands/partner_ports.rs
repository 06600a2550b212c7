//! Partner port command handler.

use megaport_api::models::PartnerPort;
use megaport_core::{PartnerPortQuery, Provisioner};
use tabled::Tabled;

use crate::cli::{GlobalOpts, PartnerPortsArgs};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct PartnerPortRow {
    #[tabled(rename = "UID")]
    uid: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Type")]
    connect_type: String,
    #[tabled(rename = "Location")]
    location_id: u64,
    #[tabled(rename = "Speed")]
    speed: u64,
    #[tabled(rename = "VXC")]
    vxc_permitted: bool,
}

impl From<&PartnerPort> for PartnerPortRow {
    fn from(p: &PartnerPort) -> Self {
        Self {
            uid: p.product_uid.clone(),
            title: p.title.clone(),
            company: p.company_name.clone(),
            connect_type: p.connect_type.clone(),
            location_id: p.location_id,
            speed: p.speed,
            vxc_permitted: p.vxc_permitted,
        }
    }
}

pub async fn handle(
    provisioner: &Provisioner,
    args: PartnerPortsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let connect_type = args.connect_type.to_ascii_uppercase();
    let ports = match args.name {
        Some(name) => {
            let query = PartnerPortQuery {
                location_id: args.location_id,
                vxc_permitted: args.vxc_permitted,
                ..PartnerPortQuery::new(connect_type, name)
            };
            vec![provisioner.find_partner_port(&query).await?]
        }
        // Listing applies the same filters but tolerates any number of hits.
        None => provisioner
            .cache()
            .partner_ports(provisioner.client())
            .await?
            .iter()
            .filter(|p| p.connect_type == connect_type)
            .filter(|p| args.location_id.is_none_or(|id| p.location_id == id))
            .filter(|p| args.vxc_permitted.is_none_or(|v| p.vxc_permitted == v))
            .cloned()
            .collect(),
    };
    let out = output::render_list(
        &global.output,
        &ports,
        |p| PartnerPortRow::from(p),
        |p| p.product_uid.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
