// ── Reconciliation engine ──
//
// Turns fire-and-forget provider mutations into operations that return
// once the provider reports the requested state. Create goes through
// validate-then-buy and waits for CONFIGURED/LIVE; update waits for the
// status *and* the per-kind convergence predicate; delete waits for a
// terminal status and for VLAN tags to be released on the owning ports.

use std::sync::Arc;

use megaport_api::{MegaportClient, ProductKind};
use tracing::{debug, info, warn};

use crate::cache::{PartnerPortQuery, ReferenceCache};
use crate::config::{Credentials, PollPolicy, ProvisionerConfig};
use crate::converge::{Converge, Convergence};
use crate::error::CoreError;
use crate::intent::{
    CreateCloudVxcIntent, CreateMcrIntent, CreatePortIntent, CreatePrivateVxcIntent, Endpoint,
    UpdateCloudVxcIntent, UpdateMcrIntent, UpdatePortIntent, UpdatePrivateVxcIntent,
};
use crate::model::{McrSnapshot, PortSnapshot, ProductUid, ProvisioningStatus, VxcSnapshot};
use crate::payload::{OrderIntent, UpdateIntent};
use crate::poll::{Poller, Step};
use crate::release::{self, VlanClaim};
use crate::validate::Validate;

use megaport_api::models::{Location, PartnerPort, Product};

// ── Phase ────────────────────────────────────────────────────────────

/// Where an operation is in its lifecycle. Logged on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Submitted,
    Validating,
    Purchasing,
    Polling,
    Converged,
    Failed,
    /// Delete of a product the provider no longer knows. Counts as success.
    NotFoundOnDelete,
}

/// How a delete finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DeleteOutcome {
    /// Cancelled, reached a terminal status and released its VLANs.
    Deleted,
    /// The provider had no such product.
    AlreadyGone,
}

fn enter(kind: ProductKind, uid: Option<&ProductUid>, phase: Phase) {
    let uid = uid.map_or("-", ProductUid::as_str);
    info!(%kind, uid, %phase, "provisioning phase");
}

fn failed(kind: ProductKind, uid: Option<&ProductUid>, err: &CoreError) {
    let uid = uid.map_or("-", ProductUid::as_str);
    warn!(%kind, uid, phase = %Phase::Failed, error = %err, "provisioning failed");
}

fn update_error(err: megaport_api::Error) -> CoreError {
    // Updates are validated inline by the provider.
    if err.status() == Some(400) {
        CoreError::rejection(err)
    } else {
        CoreError::from(err)
    }
}

// ── Provisioner ──────────────────────────────────────────────────────

/// The engine facade. Cheaply cloneable; clones share the client, poll
/// policy and reference cache.
#[derive(Clone)]
pub struct Provisioner {
    inner: Arc<ProvisionerInner>,
}

struct ProvisionerInner {
    client: MegaportClient,
    poll: PollPolicy,
    cache: ReferenceCache,
}

impl Provisioner {
    pub fn new(client: MegaportClient, poll: PollPolicy) -> Self {
        Self {
            inner: Arc::new(ProvisionerInner {
                client,
                poll,
                cache: ReferenceCache::new(),
            }),
        }
    }

    /// Build the client from config and authenticate.
    pub async fn connect(config: &ProvisionerConfig) -> Result<Self, CoreError> {
        let client = MegaportClient::new(&config.endpoint, &config.transport)?;
        match &config.credentials {
            Some(Credentials::Token(token)) => client.set_token(token.clone()),
            Some(Credentials::Login {
                username,
                password,
                otp,
            }) => {
                client.login(username, password, otp.as_deref()).await?;
                debug!(username, "logged in");
            }
            None => debug!("no credentials configured, continuing unauthenticated"),
        }
        Ok(Self::new(client, config.poll))
    }

    pub fn client(&self) -> &MegaportClient {
        &self.inner.client
    }

    pub fn cache(&self) -> &ReferenceCache {
        &self.inner.cache
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.inner.poll
    }

    // ── Ports ────────────────────────────────────────────────────────

    pub async fn create_port(
        &self,
        intent: &CreatePortIntent,
    ) -> Result<(ProductUid, PortSnapshot), CoreError> {
        intent.validate()?;
        let uid = self.submit(intent).await?;
        let snapshot = self
            .wait_product(ProductKind::Port, &uid, &|_| Convergence::Converged)
            .await
            .inspect_err(|e| failed(ProductKind::Port, Some(&uid), e))?;
        Ok((uid, snapshot))
    }

    pub async fn read_port(&self, uid: &ProductUid) -> Result<Option<PortSnapshot>, CoreError> {
        self.read_product(uid).await
    }

    pub async fn update_port(&self, intent: &UpdatePortIntent) -> Result<PortSnapshot, CoreError> {
        self.update_product(intent).await
    }

    // ── MCRs ─────────────────────────────────────────────────────────

    pub async fn create_mcr(
        &self,
        intent: &CreateMcrIntent,
    ) -> Result<(ProductUid, McrSnapshot), CoreError> {
        intent.validate()?;
        let uid = self.submit(intent).await?;
        let snapshot = self
            .wait_product(ProductKind::Mcr, &uid, &|_| Convergence::Converged)
            .await
            .inspect_err(|e| failed(ProductKind::Mcr, Some(&uid), e))?;
        Ok((uid, snapshot))
    }

    pub async fn read_mcr(&self, uid: &ProductUid) -> Result<Option<McrSnapshot>, CoreError> {
        self.read_product(uid).await
    }

    pub async fn update_mcr(&self, intent: &UpdateMcrIntent) -> Result<McrSnapshot, CoreError> {
        self.update_product(intent).await
    }

    // ── VXCs ─────────────────────────────────────────────────────────

    pub async fn create_private_vxc(
        &self,
        intent: &CreatePrivateVxcIntent,
    ) -> Result<(ProductUid, VxcSnapshot), CoreError> {
        intent.validate()?;
        self.check_endpoint(&intent.a_end).await?;
        self.check_endpoint(&intent.b_end).await?;
        self.create_vxc(intent).await
    }

    pub async fn create_cloud_vxc(
        &self,
        intent: &CreateCloudVxcIntent,
    ) -> Result<(ProductUid, VxcSnapshot), CoreError> {
        intent.validate()?;
        self.check_endpoint(&intent.a_end).await?;
        self.create_vxc(intent).await
    }

    pub async fn read_vxc(&self, uid: &ProductUid) -> Result<Option<VxcSnapshot>, CoreError> {
        match self.fetch_vxc(uid).await {
            Ok(snapshot) if snapshot.status.is_deleted() => Ok(None),
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn update_private_vxc(
        &self,
        intent: &UpdatePrivateVxcIntent,
    ) -> Result<VxcSnapshot, CoreError> {
        intent.validate()?;
        let current = self.fetch_vxc(&intent.product_uid).await?;
        self.check_changed_vlan(intent.vlan_a, &current.a_end.product_uid, current.a_end.vlan)
            .await?;
        self.check_changed_vlan(intent.vlan_b, &current.b_end.product_uid, current.b_end.vlan)
            .await?;
        self.update_vxc(intent).await
    }

    pub async fn update_cloud_vxc(
        &self,
        intent: &UpdateCloudVxcIntent,
    ) -> Result<VxcSnapshot, CoreError> {
        intent.validate()?;
        let current = self.fetch_vxc(&intent.product_uid).await?;
        self.check_changed_vlan(intent.vlan_a, &current.a_end.product_uid, current.a_end.vlan)
            .await?;
        self.update_vxc(intent).await
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Cancel any product and wait until it is gone. Idempotent: a product
    /// the provider does not know is reported as [`DeleteOutcome::AlreadyGone`].
    pub async fn delete(&self, uid: &ProductUid) -> Result<DeleteOutcome, CoreError> {
        self.delete_inner(uid).await.inspect_err(|e| {
            let uid = uid.as_str();
            warn!(uid, phase = %Phase::Failed, error = %e, "delete failed");
        })
    }

    async fn delete_inner(&self, uid: &ProductUid) -> Result<DeleteOutcome, CoreError> {
        let client = &self.inner.client;
        info!(uid = uid.as_str(), phase = %Phase::Submitted, "cancelling product");

        match client.cancel_product(uid.as_str()).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => return Ok(Self::already_gone(uid)),
            Err(e) => return Err(e.into()),
        }

        // Taken after the cancel so the VLANs are the ones being released.
        let snapshot = match self.fetch_vxc(uid).await {
            Ok(snapshot) => snapshot,
            Err(e) if e.is_not_found() => return Ok(Self::already_gone(uid)),
            Err(e) => return Err(e),
        };
        let claims = release::claims_of(&snapshot);

        info!(uid = uid.as_str(), phase = %Phase::Polling, claims = claims.len(), "waiting for deletion");
        let mut poller = Poller::start(uid.clone(), &self.inner.poll).await;
        poller.until("deleted", || self.probe_deleted(uid)).await?;
        for claim in &claims {
            poller
                .until("vlan-release", || self.probe_release(claim))
                .await?;
            debug!(uid = uid.as_str(), %claim, "released");
        }

        info!(uid = uid.as_str(), phase = %Phase::Converged, "product deleted");
        Ok(DeleteOutcome::Deleted)
    }

    fn already_gone(uid: &ProductUid) -> DeleteOutcome {
        info!(uid = uid.as_str(), phase = %Phase::NotFoundOnDelete, "product not found, treating as deleted");
        DeleteOutcome::AlreadyGone
    }

    // ── Reference data ───────────────────────────────────────────────

    pub async fn is_vlan_available(&self, port_uid: &str, vlan: u16) -> Result<bool, CoreError> {
        release::is_vlan_available(&self.inner.client, port_uid, vlan).await
    }

    pub async fn find_location(&self, name_regex: &str) -> Result<Location, CoreError> {
        self.inner
            .cache
            .find_location(&self.inner.client, name_regex)
            .await
    }

    pub async fn find_partner_port(
        &self,
        query: &PartnerPortQuery,
    ) -> Result<PartnerPort, CoreError> {
        self.inner
            .cache
            .find_partner_port(&self.inner.client, query)
            .await
    }

    pub async fn find_port(&self, name_regex: &str) -> Result<Product, CoreError> {
        self.inner.cache.find_port(&self.inner.client, name_regex).await
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Provider-side validation, then buy the same payload. Returns the new
    /// identity. Local validation has already happened.
    async fn submit<I>(&self, intent: &I) -> Result<ProductUid, CoreError>
    where
        I: OrderIntent + Sync,
    {
        let kind = I::KIND;
        let client = &self.inner.client;
        enter(kind, None, Phase::Submitted);

        let result = async {
            let payload = intent.order();

            enter(kind, None, Phase::Validating);
            client
                .validate_order(&payload)
                .await
                .map_err(CoreError::rejection)?;

            enter(kind, None, Phase::Purchasing);
            let results = client.buy_order(&payload).await?;
            results
                .iter()
                .find_map(|r| r.uid_for(kind))
                .map(ProductUid::from)
                .ok_or_else(|| CoreError::Remote {
                    status: None,
                    message: format!("order response carried no {kind} product uid"),
                })
        }
        .await;

        result.inspect_err(|e| failed(kind, None, e))
    }

    async fn create_vxc<I>(&self, intent: &I) -> Result<(ProductUid, VxcSnapshot), CoreError>
    where
        I: OrderIntent + Sync,
    {
        let uid = self.submit(intent).await?;
        let snapshot = self
            .wait_vxc(&uid, &|_| Convergence::Converged)
            .await
            .inspect_err(|e| failed(ProductKind::Vxc, Some(&uid), e))?;
        Ok((uid, snapshot))
    }

    async fn update_product<I>(&self, intent: &I) -> Result<PortSnapshot, CoreError>
    where
        I: UpdateIntent + Validate + Converge<PortSnapshot> + Sync,
    {
        let kind = I::KIND;
        let uid = intent.product_uid();
        let result = async {
            intent.validate()?;
            // Confirms the product exists before anything is sent.
            self.fetch_product(uid).await?;

            enter(kind, Some(uid), Phase::Submitted);
            self.inner
                .client
                .update_product(kind, uid.as_str(), &intent.update())
                .await
                .map_err(update_error)?;

            self.wait_product(kind, uid, &|s| intent.converge(s)).await
        }
        .await;
        result.inspect_err(|e| failed(kind, Some(uid), e))
    }

    async fn update_vxc<I>(&self, intent: &I) -> Result<VxcSnapshot, CoreError>
    where
        I: UpdateIntent + Converge<VxcSnapshot> + Sync,
    {
        let uid = intent.product_uid();
        let result = async {
            enter(ProductKind::Vxc, Some(uid), Phase::Submitted);
            self.inner
                .client
                .update_product(I::KIND, uid.as_str(), &intent.update())
                .await
                .map_err(update_error)?;

            self.wait_vxc(uid, &|s| intent.converge(s)).await
        }
        .await;
        result.inspect_err(|e| failed(ProductKind::Vxc, Some(uid), e))
    }

    // ── VLAN pre-flight ──────────────────────────────────────────────

    async fn check_endpoint(&self, end: &Endpoint) -> Result<(), CoreError> {
        match (end.product_uid.as_ref(), end.requested_vlan()) {
            (Some(port), Some(vlan)) => self.require_vlan(port.as_str(), vlan).await,
            _ => Ok(()),
        }
    }

    /// Only a tag the intent *changes* is checked; the current one is held
    /// by this very VXC and would never show as free.
    async fn check_changed_vlan(
        &self,
        wanted: Option<u16>,
        port_uid: &str,
        current: u16,
    ) -> Result<(), CoreError> {
        match wanted.filter(|v| *v > 0 && *v != current) {
            Some(vlan) => self.require_vlan(port_uid, vlan).await,
            None => Ok(()),
        }
    }

    async fn require_vlan(&self, port_uid: &str, vlan: u16) -> Result<(), CoreError> {
        if self.is_vlan_available(port_uid, vlan).await? {
            Ok(())
        } else {
            Err(CoreError::VlanUnavailable {
                vlan,
                product_uid: port_uid.to_owned(),
            })
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    async fn fetch_product(&self, uid: &ProductUid) -> Result<PortSnapshot, CoreError> {
        Ok(self.inner.client.get_product(uid.as_str()).await?.into())
    }

    async fn fetch_vxc(&self, uid: &ProductUid) -> Result<VxcSnapshot, CoreError> {
        Ok(self.inner.client.get_vxc(uid.as_str()).await?.into())
    }

    async fn read_product(&self, uid: &ProductUid) -> Result<Option<PortSnapshot>, CoreError> {
        match self.fetch_product(uid).await {
            Ok(snapshot) if snapshot.status.is_deleted() => Ok(None),
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    // ── Waits ────────────────────────────────────────────────────────

    async fn wait_product(
        &self,
        kind: ProductKind,
        uid: &ProductUid,
        check: &(dyn Fn(&PortSnapshot) -> Convergence + Sync),
    ) -> Result<PortSnapshot, CoreError> {
        enter(kind, Some(uid), Phase::Polling);
        let mut poller = Poller::start(uid.clone(), &self.inner.poll).await;
        let snapshot = poller
            .until("ready", || self.probe_product(uid, check))
            .await?;
        enter(kind, Some(uid), Phase::Converged);
        Ok(snapshot)
    }

    async fn wait_vxc(
        &self,
        uid: &ProductUid,
        check: &(dyn Fn(&VxcSnapshot) -> Convergence + Sync),
    ) -> Result<VxcSnapshot, CoreError> {
        enter(ProductKind::Vxc, Some(uid), Phase::Polling);
        let mut poller = Poller::start(uid.clone(), &self.inner.poll).await;
        let snapshot = poller.until("ready", || self.probe_vxc(uid, check)).await?;
        enter(ProductKind::Vxc, Some(uid), Phase::Converged);
        Ok(snapshot)
    }

    // ── Probes ───────────────────────────────────────────────────────

    async fn probe_product(
        &self,
        uid: &ProductUid,
        check: &(dyn Fn(&PortSnapshot) -> Convergence + Sync),
    ) -> Result<Step<PortSnapshot>, CoreError> {
        let snapshot = self.fetch_product(uid).await?;
        Ok(readiness(snapshot.status.clone(), check(&snapshot), snapshot))
    }

    async fn probe_vxc(
        &self,
        uid: &ProductUid,
        check: &(dyn Fn(&VxcSnapshot) -> Convergence + Sync),
    ) -> Result<Step<VxcSnapshot>, CoreError> {
        let snapshot = self.fetch_vxc(uid).await?;
        Ok(readiness(snapshot.status.clone(), check(&snapshot), snapshot))
    }

    async fn probe_deleted(&self, uid: &ProductUid) -> Result<Step<()>, CoreError> {
        match self.fetch_vxc(uid).await {
            Ok(snapshot) if snapshot.status.is_deleted() => Ok(Step::Ready(())),
            Ok(snapshot) => Ok(Step::Pending(Some(snapshot.status))),
            Err(e) if e.is_not_found() => Ok(Step::Ready(())),
            Err(e) => Err(e),
        }
    }

    async fn probe_release(&self, claim: &VlanClaim) -> Result<Step<()>, CoreError> {
        if self.is_vlan_available(&claim.port_uid, claim.vlan).await? {
            Ok(Step::Ready(()))
        } else {
            Ok(Step::Pending(None))
        }
    }
}

fn readiness<S>(status: ProvisioningStatus, convergence: Convergence, snapshot: S) -> Step<S> {
    if !status.is_ready() {
        return Step::Pending(Some(status));
    }
    match convergence {
        Convergence::Converged => Step::Ready(snapshot),
        Convergence::Pending { field } => {
            debug!(field, %status, "status ready, waiting for field to converge");
            Step::Pending(Some(status))
        }
    }
}
