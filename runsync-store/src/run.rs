//! A sync run.
//!
//! [`SyncRun`] owns everything a run needs: the backend, the refresher, the
//! output directory and the in-memory credential. It executes the phases in
//! order (log in if needed, location lists, then product catalogs) and
//! returns a [`SyncReport`].

use std::sync::Arc;

use runsync_core::{Credential, CredentialStore, LocationId, MemoryCredentialStore};
use runsync_fetch::{
    Authenticator, Backend, ClientInfo, Endpoints, GithubSecretStore, HttpClient,
    RetryOrchestrator, TokenRefresher, Transport,
};
use tracing::{info, instrument};

use crate::config::SyncConfig;
use crate::error::StoreError;
use crate::locations::LocationFetcher;
use crate::persistence::ensure_dir;
use crate::products::ProductFetcher;
use crate::report::SyncReport;
use crate::snapshots::SnapshotStore;

/// One sync run.
pub struct SyncRun {
    backend: Backend,
    refresher: Arc<dyn TokenRefresher>,
    snapshots: SnapshotStore,
    credentials: MemoryCredentialStore,
}

impl std::fmt::Debug for SyncRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncRun")
            .field("backend", &self.backend)
            .field("snapshots", &self.snapshots)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl SyncRun {
    /// Wires a run against the real backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration has an unusable URL or the HTTP
    /// client cannot be built.
    pub fn from_config(config: &SyncConfig) -> Result<Self, StoreError> {
        let http = HttpClient::with_timeout(config.timeout)?
            .with_allowed_domains(config.allowed_domains()?);
        let transport: Arc<dyn Transport> = Arc::new(http.clone());

        let endpoints = Endpoints::from_base(&config.api_base);
        let client = ClientInfo::new(config.client_version.clone());

        let mut authenticator = Authenticator::new(
            Arc::clone(&transport),
            &endpoints,
            client.clone(),
            config.account.clone(),
        );
        if let Some(secrets) = &config.secret_store {
            let store = GithubSecretStore::new(http, &secrets.repo, &secrets.access_token);
            authenticator = authenticator.with_secret_store(Arc::new(store), &secrets.secret_name);
        }

        Ok(Self::new(
            transport,
            Arc::new(authenticator),
            endpoints,
            client,
            SnapshotStore::new(&config.output_dir),
            config.auth_token.clone(),
        ))
    }

    /// Wires a run from its parts.
    pub fn new(
        transport: Arc<dyn Transport>,
        refresher: Arc<dyn TokenRefresher>,
        endpoints: Endpoints,
        client: ClientInfo,
        snapshots: SnapshotStore,
        initial: Option<Credential>,
    ) -> Self {
        let orchestrator = RetryOrchestrator::new(transport, Arc::clone(&refresher));
        Self {
            backend: Backend::new(orchestrator, endpoints, client),
            refresher,
            snapshots,
            credentials: MemoryCredentialStore::new(initial),
        }
    }

    /// The output directory.
    pub fn snapshots(&self) -> &SnapshotStore {
        &self.snapshots
    }

    /// The token currently held.
    pub fn credential(&self) -> Option<Credential> {
        self.credentials.get()
    }

    /// Runs every phase.
    ///
    /// # Errors
    ///
    /// Fails if the output directory cannot be created or a login fails.
    /// Per-item failures are in the report instead.
    #[instrument(skip_all, fields(dir = %self.snapshots.dir().display()))]
    pub async fn run(&mut self) -> Result<SyncReport, StoreError> {
        let mut report = SyncReport::default();
        self.prepare().await?;

        let ids = LocationFetcher::new(&self.backend, &self.snapshots)
            .fetch_all(&mut self.credentials, &mut report)
            .await?;

        ProductFetcher::new(&self.backend, &self.snapshots)
            .fetch_all(&mut self.credentials, &ids, &mut report)
            .await?;

        report.token_refreshes = self.credentials.replacements();
        info!(
            locations = ids.len(),
            written = report.written.len(),
            stale = report.stale.len(),
            failed = report.failures.len(),
            "Sync finished"
        );
        Ok(report)
    }

    /// Fetches and persists the two location lists only.
    ///
    /// # Errors
    ///
    /// Same as [`SyncRun::run`].
    pub async fn locations(&mut self) -> Result<SyncReport, StoreError> {
        let mut report = SyncReport::default();
        self.prepare().await?;

        LocationFetcher::new(&self.backend, &self.snapshots)
            .fetch_all(&mut self.credentials, &mut report)
            .await?;

        report.token_refreshes = self.credentials.replacements();
        Ok(report)
    }

    /// Fetches and conditionally persists the catalogs of `ids` only.
    ///
    /// # Errors
    ///
    /// Same as [`SyncRun::run`].
    pub async fn products(&mut self, ids: &[LocationId]) -> Result<SyncReport, StoreError> {
        let mut report = SyncReport {
            location_ids: ids.to_vec(),
            ..SyncReport::default()
        };
        self.prepare().await?;

        ProductFetcher::new(&self.backend, &self.snapshots)
            .fetch_all(&mut self.credentials, ids, &mut report)
            .await?;

        report.token_refreshes = self.credentials.replacements();
        Ok(report)
    }

    /// Logs in unconditionally and publishes the new token.
    ///
    /// # Errors
    ///
    /// Fails if the login fails.
    pub async fn login(&mut self) -> Result<(), StoreError> {
        let credential = self.refresher.refresh().await?;
        self.credentials.set(credential);
        Ok(())
    }

    async fn prepare(&mut self) -> Result<(), StoreError> {
        ensure_dir(self.snapshots.dir()).await?;

        if self.credentials.get().is_none() {
            info!("No auth token configured, logging in first");
            self.login().await?;
        }
        Ok(())
    }
}
