// Hand-crafted async HTTP client for the Megaport v2 API.
//
// Base path: /v2/
// Auth: X-Auth-Token header (token obtained via login or supplied directly)
// Bodies: every response is wrapped in a `{message, data}` envelope.

use std::sync::{PoisonError, RwLock};

use reqwest::header::{ACCEPT, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::debug;
use url::Url;

use crate::error::{Error, ErrorData};
use crate::models::{
    Charges, Envelope, Location, OrderResult, PartnerPort, Product, ProductKind, VxcProduct,
};
use crate::transport::TransportConfig;

const AUTH_HEADER: &str = "X-Auth-Token";

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Megaport provisioning API.
///
/// Stateless apart from the session token: no caching and no retries
/// happen at this layer.
pub struct MegaportClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl MegaportClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` from a transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            token: RwLock::new(None),
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        let base_url = Self::normalize_base_url(base_url.as_str()).unwrap_or(base_url);
        Self {
            http,
            base_url,
            token: RwLock::new(None),
        }
    }

    /// Attach an existing session token.
    pub fn with_token(self, token: SecretString) -> Self {
        self.set_token(token);
        self
    }

    /// Ensure the base URL ends with a single `/` so relative joins work.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The provider base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Token management ─────────────────────────────────────────────

    pub fn set_token(&self, token: SecretString) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub(crate) fn clear_token(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// The current session token, if any.
    pub fn token(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"v2/products"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    fn authorize(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, Error> {
        let builder = builder.header(ACCEPT, "application/json");
        let Some(token) = self.token() else {
            return Ok(builder);
        };
        let mut value =
            HeaderValue::from_str(token.expose_secret()).map_err(|e| Error::Authentication {
                message: format!("invalid token header value: {e}"),
            })?;
        value.set_sensitive(true);
        Ok(builder.header(AUTH_HEADER, value))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.authorize(self.http.get(url))?.send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self
            .authorize(self.http.get(url).query(params))?
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self
            .authorize(self.http.post(url).json(body))?
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    /// POST with query parameters and no body.
    pub(crate) async fn post_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        // Params may carry credentials; log the path only.
        debug!("POST {}", url.path());

        let resp = self
            .authorize(self.http.post(url).query(params))?
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self
            .authorize(self.http.put(url).json(body))?
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound {
                path: resp.url().path().to_owned(),
            });
        }
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        if body.trim().is_empty() {
            return serde_json::from_value(serde_json::Value::Null)
                .map_err(|e| deser_error(&e, &body));
        }
        let envelope: Envelope = serde_json::from_str(&body).map_err(|e| deser_error(&e, &body))?;
        serde_json::from_value(envelope.data).map_err(|e| deser_error(&e, &body))
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        if let Ok(envelope) = serde_json::from_str::<Envelope>(&raw) {
            Error::from_envelope(
                status.as_u16(),
                &envelope.message,
                ErrorData::from_value(envelope.data),
            )
        } else {
            let message = if raw.is_empty() {
                status.to_string()
            } else {
                raw
            };
            Error::Remote {
                status: status.as_u16(),
                message,
                data: ErrorData::Null,
            }
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Orders ───────────────────────────────────────────────────────

    /// Dry-run an order. Any non-success response is returned as an error.
    pub async fn validate_order<B: Serialize + Sync + ?Sized>(
        &self,
        payload: &B,
    ) -> Result<(), Error> {
        let _: IgnoredAny = self.post("v2/networkdesign/validate", payload).await?;
        Ok(())
    }

    /// Purchase an order. Returns one result per ordered element.
    pub async fn buy_order<B: Serialize + Sync + ?Sized>(
        &self,
        payload: &B,
    ) -> Result<Vec<OrderResult>, Error> {
        self.post("v2/networkdesign/buy", payload).await
    }

    // ── Products ─────────────────────────────────────────────────────

    /// Fetch a port or MCR.
    pub async fn get_product(&self, uid: &str) -> Result<Product, Error> {
        self.get(&format!("v2/product/{uid}")).await
    }

    /// Fetch a VXC. Same endpoint as [`get_product`](Self::get_product),
    /// decoded into the cross-connect shape.
    pub async fn get_vxc(&self, uid: &str) -> Result<VxcProduct, Error> {
        self.get(&format!("v2/product/{uid}")).await
    }

    /// Apply an in-place update to a product of the given kind.
    pub async fn update_product<B: Serialize + Sync + ?Sized>(
        &self,
        kind: ProductKind,
        uid: &str,
        payload: &B,
    ) -> Result<(), Error> {
        let _: IgnoredAny = self.put(&format!("v2/product/{kind}/{uid}"), payload).await?;
        Ok(())
    }

    /// Cancel a product immediately.
    pub async fn cancel_product(&self, uid: &str) -> Result<(), Error> {
        let _: IgnoredAny = self
            .post_query(&format!("v2/product/{uid}/action/CANCEL_NOW"), &[])
            .await?;
        Ok(())
    }

    /// List every product owned by the account.
    pub async fn list_products(&self) -> Result<Vec<Product>, Error> {
        self.get("v2/products").await
    }

    /// VLAN ids still assigned on `port_uid` that match the `vlan` query.
    ///
    /// An empty list means the tag is free on that port.
    pub async fn port_vlan_ids(&self, port_uid: &str, vlan: u16) -> Result<Vec<u16>, Error> {
        self.get_with_params(
            &format!("v2/product/port/{port_uid}/vlan"),
            &[("vlan", vlan.to_string())],
        )
        .await
    }

    // ── Reference data ───────────────────────────────────────────────

    pub async fn list_locations(&self) -> Result<Vec<Location>, Error> {
        self.get("v2/locations").await
    }

    pub async fn list_partner_ports(&self) -> Result<Vec<PartnerPort>, Error> {
        self.get("v2/dropdowns/partner/megaports").await
    }

    // ── Price book ───────────────────────────────────────────────────

    /// Monthly price of a port. `product_uid` prices a speed change on an
    /// existing port.
    pub async fn price_port(
        &self,
        location_id: u64,
        speed: u64,
        term: u64,
        product_uid: Option<&str>,
    ) -> Result<Charges, Error> {
        let mut params = vec![
            ("locationId", location_id.to_string()),
            ("speed", speed.to_string()),
            ("term", term.to_string()),
            ("buyoutPort", "false".to_owned()),
        ];
        params.extend(product_uid.map(|uid| ("productUid", uid.to_owned())));
        self.get_with_params("v2/pricebook/megaport", &params).await
    }

    /// Monthly price of an MCR2 at the given rate limit.
    pub async fn price_mcr(
        &self,
        location_id: u64,
        speed: u64,
        product_uid: Option<&str>,
    ) -> Result<Charges, Error> {
        let mut params = vec![
            ("locationId", location_id.to_string()),
            ("speed", speed.to_string()),
        ];
        params.extend(product_uid.map(|uid| ("productUid", uid.to_owned())));
        self.get_with_params("v2/pricebook/mcr2", &params).await
    }

    /// Monthly price of a VXC between two locations.
    pub async fn price_vxc(
        &self,
        a_location_id: u64,
        b_location_id: u64,
        speed: u64,
    ) -> Result<Charges, Error> {
        self.get_with_params(
            "v2/pricebook/vxc",
            &[
                ("aLocationId", a_location_id.to_string()),
                ("bLocationId", b_location_id.to_string()),
                ("speed", speed.to_string()),
            ],
        )
        .await
    }
}

fn deser_error(e: &serde_json::Error, body: &str) -> Error {
    let preview: String = body.chars().take(200).collect();
    Error::Deserialization {
        message: format!("{e} (body preview: {preview:?})"),
        body: body.to_owned(),
    }
}
