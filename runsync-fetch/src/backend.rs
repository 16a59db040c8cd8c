//! Typed access to the two data endpoints.
//!
//! [`Backend`] pairs each data endpoint with its payload builder and sends
//! everything through the same [`RetryOrchestrator`].

use runsync_core::{CredentialStore, LocationId, LocationSet};
use serde_json::Value;
use tracing::instrument;

use crate::api::{ApiPayload, ClientInfo, Endpoints};
use crate::error::FetchError;
use crate::retry::RetryOrchestrator;

/// The location and product endpoints behind a single retry policy.
#[derive(Debug)]
pub struct Backend {
    orchestrator: RetryOrchestrator,
    endpoints: Endpoints,
    client: ClientInfo,
}

impl Backend {
    /// Creates a backend.
    pub fn new(orchestrator: RetryOrchestrator, endpoints: Endpoints, client: ClientInfo) -> Self {
        Self {
            orchestrator,
            endpoints,
            client,
        }
    }

    /// The configured endpoints.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetches one location list.
    #[instrument(skip(self, credentials), fields(set = %set))]
    pub async fn list_locations(
        &self,
        credentials: &mut dyn CredentialStore,
        set: LocationSet,
    ) -> Result<Value, FetchError> {
        let payload = ApiPayload::list_locations(&self.client, set);
        self.orchestrator
            .execute(credentials, &self.endpoints.list_locations, payload)
            .await
    }

    /// Fetches the product catalog of one location.
    #[instrument(skip(self, credentials), fields(location_id = %location_id))]
    pub async fn list_products(
        &self,
        credentials: &mut dyn CredentialStore,
        location_id: &LocationId,
    ) -> Result<Value, FetchError> {
        let payload = ApiPayload::list_products(&self.client, location_id);
        self.orchestrator
            .execute(credentials, &self.endpoints.list_products, payload)
            .await
    }
}
