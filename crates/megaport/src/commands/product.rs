//! Product command handlers.

use megaport_api::models::Product;
use megaport_core::{PartnerConnection, PortSnapshot, ProductUid, Provisioner, VxcSnapshot};
use tabled::Tabled;

use crate::cli::{GlobalOpts, ProductArgs, ProductCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "UID")]
    uid: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    product_type: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Location")]
    location_id: u64,
    #[tabled(rename = "Speed")]
    speed: u64,
}

impl From<&Product> for ProductRow {
    fn from(p: &Product) -> Self {
        Self {
            uid: p.product_uid.clone(),
            name: p.product_name.clone(),
            product_type: p.product_type.clone(),
            status: p.provisioning_status.clone(),
            location_id: p.location_id,
            speed: p.port_speed,
        }
    }
}

// ── Detail views ────────────────────────────────────────────────────

fn port_detail(p: &PortSnapshot, color: bool) -> String {
    let mut pairs = vec![
        ("UID", p.uid.to_string()),
        ("Name", p.name.clone()),
        ("Type", p.product_type.clone()),
        ("Status", output::status(&p.status, color)),
        ("Location", p.location_id.to_string()),
        ("Speed", format!("{} Mbps", p.speed)),
        ("Term", format!("{} months", p.term)),
        ("Invoice ref", p.invoice_reference.clone()),
        ("Marketplace", p.marketplace_visibility.to_string()),
    ];
    if let Some(asn) = p.asn {
        pairs.push(("ASN", asn.to_string()));
    }
    if let Some(created) = p.created {
        pairs.push(("Created", created.to_rfc3339()));
    }
    output::detail(&pairs)
}

fn vxc_detail(v: &VxcSnapshot, color: bool) -> String {
    let mut pairs = vec![
        ("UID", v.uid.to_string()),
        ("Name", v.name.clone()),
        ("Kind", v.kind().to_string()),
        ("Status", output::status(&v.status, color)),
        ("Rate limit", format!("{} Mbps", v.rate_limit)),
        ("Invoice ref", v.invoice_reference.clone()),
        ("A-End", format!("{} vlan {}", v.a_end.product_uid, v.a_end.vlan)),
        ("B-End", format!("{} vlan {}", v.b_end.product_uid, v.b_end.vlan)),
    ];
    for partner in &v.partners {
        match partner {
            PartnerConnection::Aws(aws) => {
                pairs.push(("AWS account", aws.owner_account.clone()));
                pairs.push(("AWS type", aws.connection_type.clone()));
                pairs.push(("AWS ASN", aws.asn.to_string()));
            }
            PartnerConnection::Gcp { pairing_key } => {
                pairs.push(("GCP pairing key", pairing_key.clone()));
            }
            PartnerConnection::Other => {}
        }
    }
    output::detail(&pairs)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    provisioner: &Provisioner,
    args: ProductArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let out = match args.command {
        ProductCommand::List { name } => {
            let products = match name {
                Some(name) => vec![provisioner.find_port(&name).await?],
                None => provisioner.cache().ports(provisioner.client()).await?.to_vec(),
            };
            output::render_list(&global.output, &products, |p| ProductRow::from(p), |p| {
                p.product_uid.clone()
            })?
        }

        ProductCommand::Get { uid } => {
            let uid = ProductUid::from(uid);
            let not_found = || CliError::NotFound {
                identifier: uid.to_string(),
            };
            let port = provisioner.read_port(&uid).await?.ok_or_else(not_found)?;

            if port.product_type.eq_ignore_ascii_case("VXC") {
                let vxc = provisioner.read_vxc(&uid).await?.ok_or_else(not_found)?;
                output::render_single(
                    &global.output,
                    &vxc,
                    |v| vxc_detail(v, color),
                    |v| v.uid.to_string(),
                )?
            } else {
                output::render_single(
                    &global.output,
                    &port,
                    |p| port_detail(p, color),
                    |p| p.uid.to_string(),
                )?
            }
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
