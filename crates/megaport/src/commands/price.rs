//! Price book command handler.

use megaport_api::models::Charges;
use megaport_core::Provisioner;

use crate::cli::{GlobalOpts, PriceArgs, PriceCommand};
use crate::error::CliError;
use crate::output;

fn charges_detail(c: &Charges) -> String {
    let mut pairs = vec![
        ("Price", format!("{:.2} {}", c.price, c.currency)),
        ("Monthly rate", format!("{:.2}", c.monthly_rate)),
        ("Setup", format!("{:.2}", c.monthly_setup)),
    ];
    if c.discount > 0.0 {
        pairs.push(("Discount", format!("{:.2}", c.discount)));
    }
    if !c.product_type.is_empty() {
        pairs.push(("Type", c.product_type.clone()));
    }
    output::detail(&pairs)
}

pub async fn handle(
    provisioner: &Provisioner,
    args: PriceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let client = provisioner.client();
    let charges = match args.command {
        PriceCommand::Port {
            location_id,
            speed,
            term,
            product_uid,
        } => {
            client
                .price_port(location_id, speed, term, product_uid.as_deref())
                .await?
        }
        PriceCommand::Mcr {
            location_id,
            speed,
            product_uid,
        } => {
            client
                .price_mcr(location_id, speed, product_uid.as_deref())
                .await?
        }
        PriceCommand::Vxc {
            a_location_id,
            b_location_id,
            speed,
        } => client.price_vxc(a_location_id, b_location_id, speed).await?,
    };

    let out = output::render_single(&global.output, &charges, charges_detail, |c| {
        format!("{:.2}", c.price)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
