use std::sync::Arc;

use async_trait::async_trait;
use shared::domain::Resource;
use tracing::{info, warn};
use url::Url;

use crate::{
    controller::{FetchOutcome, ListController},
    endpoints::Endpoints,
    error::MutationError,
    transport::{HttpMethod, HttpTransport, TransportResponse},
};

/// Moves the UI back from the editor to the list.
#[async_trait]
pub trait ViewNavigator: Send + Sync {
    async fn return_to_list(&self);
}

/// Asks the user to confirm a destructive action.
#[async_trait]
pub trait DeleteConfirmation: Send + Sync {
    async fn confirm_delete(&self, resource: &Resource) -> bool;
}

/// Navigator for front ends that never leave the list view.
pub struct StayOnList;

#[async_trait]
impl ViewNavigator for StayOnList {
    async fn return_to_list(&self) {}
}

/// Confirmation that has already been given, e.g. by a `--yes` flag.
pub struct PreConfirmed;

#[async_trait]
impl DeleteConfirmation for PreConfirmed {
    async fn confirm_delete(&self, _resource: &Resource) -> bool {
        true
    }
}

#[derive(Debug)]
pub enum SaveOutcome {
    Created {
        /// The server's echo of the new record, when it sent one.
        created: Option<Resource>,
        refresh: FetchOutcome,
    },
    Updated {
        refresh: FetchOutcome,
    },
}

impl SaveOutcome {
    pub fn refresh(&self) -> &FetchOutcome {
        match self {
            Self::Created { refresh, .. } | Self::Updated { refresh } => refresh,
        }
    }
}

#[derive(Debug)]
pub enum DeleteOutcome {
    Declined,
    Deleted { refresh: FetchOutcome },
}

/// Creates, updates and deletes single resources, then re-syncs the list.
pub struct MutationOrchestrator {
    transport: Arc<dyn HttpTransport>,
    endpoints: Endpoints,
    list: Arc<ListController>,
    navigator: Arc<dyn ViewNavigator>,
    confirmer: Arc<dyn DeleteConfirmation>,
}

impl MutationOrchestrator {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        list: Arc<ListController>,
        navigator: Arc<dyn ViewNavigator>,
        confirmer: Arc<dyn DeleteConfirmation>,
    ) -> Self {
        Self {
            transport,
            endpoints: list.endpoints().clone(),
            list,
            navigator,
            confirmer,
        }
    }

    /// Updates when the resource carries an id, creates otherwise. On success
    /// the list is refetched at its current page, sort and size.
    pub async fn save(&self, resource: &Resource) -> Result<SaveOutcome, MutationError> {
        let body = serde_json::to_value(resource)?;

        match &resource.id {
            Some(id) => {
                self.send(HttpMethod::Put, self.endpoints.resource_url(id), Some(&body))
                    .await?;
                self.navigator.return_to_list().await;
                let refresh = self.list.fetch_page(None).await;
                Ok(SaveOutcome::Updated { refresh })
            }
            None => {
                let response = self
                    .send(HttpMethod::Post, self.endpoints.collection_url(), Some(&body))
                    .await?;
                let created = response.json::<Resource>().ok();
                self.navigator.return_to_list().await;
                let refresh = self.list.fetch_page(None).await;
                Ok(SaveOutcome::Created { created, refresh })
            }
        }
    }

    /// Deletes after confirmation and re-syncs the list. The refreshed page
    /// numbers come from the server, which may have shrunk the page count.
    pub async fn delete(&self, resource: &Resource) -> Result<DeleteOutcome, MutationError> {
        let id = resource.id.as_ref().ok_or(MutationError::MissingId)?;

        if !self.confirmer.confirm_delete(resource).await {
            info!(id = %id, "mutation: delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        self.send(HttpMethod::Delete, self.endpoints.resource_url(id), None)
            .await?;
        let refresh = self.list.fetch_page(None).await;
        Ok(DeleteOutcome::Deleted { refresh })
    }

    async fn send(
        &self,
        method: HttpMethod,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<TransportResponse, MutationError> {
        let response = self
            .transport
            .request(method, url.as_str(), body)
            .await
            .map_err(|err| {
                warn!(method = method.as_str(), %url, error = %err, "mutation: request failed");
                MutationError::from(err)
            })?;

        if !response.is_success() {
            warn!(
                method = method.as_str(),
                %url,
                status = response.status,
                "mutation: server rejected request"
            );
            return Err(MutationError::Status {
                method: method.as_str(),
                status: response.status,
                url: url.to_string(),
            });
        }

        info!(method = method.as_str(), %url, status = response.status, "mutation: applied");
        Ok(response)
    }
}

#[cfg(test)]
#[path = "tests/mutation_tests.rs"]
mod tests;
