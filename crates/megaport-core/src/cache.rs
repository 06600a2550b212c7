// ── Reference-data cache ──
//
// Locations, partner ports and the account's products change rarely and
// are expensive to list, so each list is fetched at most once per cache.
// Concurrent first callers wait on the same fetch. Lists can be seeded
// up front, which also keeps tests off the network.

use std::sync::Arc;

use megaport_api::MegaportClient;
use megaport_api::models::{Location, PartnerPort, Product};
use regex::Regex;
use tokio::sync::OnceCell;
use tracing::info;

use crate::error::CoreError;

/// Filters for [`ReferenceCache::find_partner_port`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerPortQuery {
    /// `AWS`, `GOOGLE`, or `DEFAULT` for marketplace ports.
    pub connect_type: String,
    /// Matched against the port title.
    pub name_regex: String,
    pub location_id: Option<u64>,
    pub vxc_permitted: Option<bool>,
}

impl PartnerPortQuery {
    pub fn new(connect_type: impl Into<String>, name_regex: impl Into<String>) -> Self {
        Self {
            connect_type: connect_type.into(),
            name_regex: name_regex.into(),
            location_id: None,
            vxc_permitted: None,
        }
    }
}

/// Lazily populated reference lists, one lock per list.
#[derive(Debug, Default)]
pub struct ReferenceCache {
    locations: OnceCell<Arc<Vec<Location>>>,
    partner_ports: OnceCell<Arc<Vec<PartnerPort>>>,
    ports: OnceCell<Arc<Vec<Product>>>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Seeding ──────────────────────────────────────────────────────

    /// Populate the location list without a fetch. Returns `false` if the
    /// list was already populated.
    pub fn seed_locations(&self, locations: Vec<Location>) -> bool {
        self.locations.set(Arc::new(locations)).is_ok()
    }

    pub fn seed_partner_ports(&self, ports: Vec<PartnerPort>) -> bool {
        self.partner_ports.set(Arc::new(ports)).is_ok()
    }

    pub fn seed_ports(&self, ports: Vec<Product>) -> bool {
        self.ports.set(Arc::new(ports)).is_ok()
    }

    // ── Lists ────────────────────────────────────────────────────────

    pub async fn locations(&self, client: &MegaportClient) -> Result<Arc<Vec<Location>>, CoreError> {
        self.locations
            .get_or_try_init(|| async {
                info!("updating location list");
                Ok::<_, CoreError>(Arc::new(client.list_locations().await?))
            })
            .await
            .cloned()
    }

    pub async fn partner_ports(
        &self,
        client: &MegaportClient,
    ) -> Result<Arc<Vec<PartnerPort>>, CoreError> {
        self.partner_ports
            .get_or_try_init(|| async {
                info!("updating partner port list");
                Ok::<_, CoreError>(Arc::new(client.list_partner_ports().await?))
            })
            .await
            .cloned()
    }

    pub async fn ports(&self, client: &MegaportClient) -> Result<Arc<Vec<Product>>, CoreError> {
        self.ports
            .get_or_try_init(|| async {
                info!("updating port list");
                Ok::<_, CoreError>(Arc::new(client.list_products().await?))
            })
            .await
            .cloned()
    }

    // ── Lookups ──────────────────────────────────────────────────────

    /// The single location whose name matches `name_regex`.
    pub async fn find_location(
        &self,
        client: &MegaportClient,
        name_regex: &str,
    ) -> Result<Location, CoreError> {
        let re = compile(name_regex)?;
        let locations = self.locations(client).await?;
        let matches: Vec<&Location> = locations.iter().filter(|l| re.is_match(&l.name)).collect();
        exactly_one(
            &matches,
            "No locations were found.",
            "Multiple locations were found. Please use a more specific query.",
        )
    }

    /// The single partner port matching every filter in `query`.
    pub async fn find_partner_port(
        &self,
        client: &MegaportClient,
        query: &PartnerPortQuery,
    ) -> Result<PartnerPort, CoreError> {
        let re = compile(&query.name_regex)?;
        let ports = self.partner_ports(client).await?;
        let matches: Vec<&PartnerPort> = ports
            .iter()
            .filter(|p| p.connect_type == query.connect_type)
            .filter(|p| re.is_match(&p.title))
            .filter(|p| query.location_id.is_none_or(|id| p.location_id == id))
            .filter(|p| query.vxc_permitted.is_none_or(|v| p.vxc_permitted == v))
            .collect();
        exactly_one(
            &matches,
            "No ports were found. You might want to use a less specific query.",
            "Multiple ports were found. Please use a more specific query.",
        )
    }

    /// The single product owned by the account whose name matches.
    pub async fn find_port(
        &self,
        client: &MegaportClient,
        name_regex: &str,
    ) -> Result<Product, CoreError> {
        let re = compile(name_regex)?;
        let ports = self.ports(client).await?;
        let matches: Vec<&Product> = ports
            .iter()
            .filter(|p| re.is_match(&p.product_name))
            .collect();
        exactly_one(
            &matches,
            "No ports were found.",
            "Multiple ports were found. Please use a more specific query.",
        )
    }
}

fn compile(name_regex: &str) -> Result<Regex, CoreError> {
    Regex::new(name_regex).map_err(|e| CoreError::Lookup {
        message: format!("invalid name_regex {name_regex:?}: {e}"),
    })
}

fn exactly_one<T: Clone>(matches: &[&T], none: &str, many: &str) -> Result<T, CoreError> {
    match matches {
        [one] => Ok((*one).clone()),
        [] => Err(CoreError::Lookup {
            message: none.to_owned(),
        }),
        _ => Err(CoreError::Lookup {
            message: many.to_owned(),
        }),
    }
}
