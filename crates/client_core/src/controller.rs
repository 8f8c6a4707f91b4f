//! Paginated, sortable view over one REST collection.
//!
//! Every mutator swaps in a new [`ListState`] and allocates a request sequence
//! number inside the same critical section. The outgoing URL is built from
//! that new state, so a sort or page-size change always reaches the server
//! with the value it just set. A response is applied only if no later request
//! has been issued since; older responses are dropped on arrival.

use std::sync::Arc;

use shared::{
    domain::{Resource, ResourceId, SortDirection, SortFields},
    parse_link_header,
    protocol::{NavigationLink, LAST_PAGE_HEADER, LINKS_HEADER, LINK_HEADER_FALLBACK, PAGE_HEADER},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    endpoints::Endpoints,
    error::{FetchError, ListError},
    state::{ListConfig, ListState},
    transport::{HttpMethod, HttpTransport, TransportResponse},
};

#[derive(Debug, Clone)]
pub enum ListEvent {
    StateChanged(Arc<ListState>),
    FetchFailed(String),
}

/// What became of a single fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    Applied(Arc<ListState>),
    /// A newer request was issued before this one resolved.
    Superseded,
    Failed(FetchError),
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn applied(&self) -> Option<&Arc<ListState>> {
        match self {
            Self::Applied(state) => Some(state),
            _ => None,
        }
    }
}

pub struct ListController {
    transport: Arc<dyn HttpTransport>,
    endpoints: Endpoints,
    sort_fields: SortFields,
    inner: Mutex<ControllerInner>,
    events: broadcast::Sender<ListEvent>,
}

struct ControllerInner {
    state: Arc<ListState>,
    latest_request: u64,
}

struct PendingFetch {
    seq: u64,
    url: Url,
}

struct PageData {
    resources: Vec<Resource>,
    links: Vec<NavigationLink>,
    current_page: u32,
    last_page: Option<u32>,
}

impl ListController {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        endpoints: Endpoints,
        config: ListConfig,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            transport,
            endpoints,
            inner: Mutex::new(ControllerInner {
                state: Arc::new(ListState::initial(&config)),
                latest_request: 0,
            }),
            sort_fields: config.sort_fields,
            events,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn sort_fields(&self) -> &SortFields {
        &self.sort_fields
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ListEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> Arc<ListState> {
        Arc::clone(&self.inner.lock().await.state)
    }

    /// Looks a resource up on the currently loaded page.
    pub async fn find_resource(&self, id: &ResourceId) -> Option<Resource> {
        self.inner.lock().await.state.find(id).cloned()
    }

    /// First load with the configured defaults.
    pub async fn initialize(&self) -> FetchOutcome {
        self.fetch_page(None).await
    }

    /// Fetches `explicit_url` when given, otherwise the page described by the
    /// current page, sort and page size.
    pub async fn fetch_page(&self, explicit_url: Option<&str>) -> FetchOutcome {
        let target = match explicit_url.map(|link| self.endpoints.resolve(link)).transpose() {
            Ok(target) => target,
            Err(err) => return self.report_failure(FetchError::from(err)),
        };
        let pending = self.begin(|state| state.clone(), target).await;
        self.execute(pending).await
    }

    pub async fn navigate(&self, link: &NavigationLink) -> FetchOutcome {
        debug!(relation = %link.relation, url = %link.url, "list: following page link");
        self.fetch_page(Some(&link.url)).await
    }

    pub async fn set_sort_field(&self, name: &str) -> Result<FetchOutcome, ListError> {
        let sort_field = self.sort_fields.field(name)?;
        let pending = self
            .begin(
                |state| ListState {
                    sort_field,
                    ..state.clone()
                },
                None,
            )
            .await;
        Ok(self.execute(pending).await)
    }

    pub async fn set_sort_direction(&self, sort_direction: SortDirection) -> FetchOutcome {
        let pending = self
            .begin(
                |state| ListState {
                    sort_direction,
                    ..state.clone()
                },
                None,
            )
            .await;
        self.execute(pending).await
    }

    pub async fn set_page_size(&self, page_size: u32) -> Result<FetchOutcome, ListError> {
        if page_size == 0 {
            return Err(ListError::InvalidPageSize);
        }
        let pending = self
            .begin(
                |state| ListState {
                    page_size,
                    ..state.clone()
                },
                None,
            )
            .await;
        Ok(self.execute(pending).await)
    }

    /// Jumps straight to `page` with the current sort and page size.
    pub async fn go_to_page(&self, page: u32) -> Result<FetchOutcome, ListError> {
        if page == 0 {
            return Err(ListError::InvalidPage);
        }
        let pending = self
            .begin(
                |state| ListState {
                    current_page: page,
                    ..state.clone()
                },
                None,
            )
            .await;
        Ok(self.execute(pending).await)
    }

    /// Applies `update`, marks the list as loading and claims the next
    /// sequence number. The request URL is derived from the updated state.
    async fn begin<F>(&self, update: F, target: Option<Url>) -> PendingFetch
    where
        F: FnOnce(&ListState) -> ListState,
    {
        let (pending, state) = {
            let mut guard = self.inner.lock().await;
            let mut next = update(guard.state.as_ref());
            next.loading = true;
            let url = target.unwrap_or_else(|| self.endpoints.list_url(&next.query()));

            guard.latest_request += 1;
            guard.state = Arc::new(next);
            (
                PendingFetch {
                    seq: guard.latest_request,
                    url,
                },
                Arc::clone(&guard.state),
            )
        };

        let _ = self.events.send(ListEvent::StateChanged(state));
        pending
    }

    async fn execute(&self, pending: PendingFetch) -> FetchOutcome {
        let result = match self
            .transport
            .request(HttpMethod::Get, pending.url.as_str(), None)
            .await
        {
            Ok(response) => decode_page(&response, pending.url.as_str()),
            Err(err) => Err(FetchError::from(err)),
        };

        let applied = {
            let mut guard = self.inner.lock().await;
            if guard.latest_request != pending.seq {
                debug!(
                    seq = pending.seq,
                    latest = guard.latest_request,
                    url = %pending.url,
                    "list: dropping superseded response"
                );
                return FetchOutcome::Superseded;
            }

            let page = match result {
                Ok(page) => page,
                Err(err) => {
                    drop(guard);
                    return self.report_failure(err);
                }
            };

            let next = Arc::new(ListState {
                loading: false,
                resources: page.resources,
                links: page.links,
                current_page: page.current_page,
                last_page: page.last_page,
                ..ListState::clone(&guard.state)
            });
            guard.state = Arc::clone(&next);
            next
        };

        info!(
            page = applied.current_page,
            last_page = ?applied.last_page,
            resources = applied.resources.len(),
            links = applied.links.len(),
            "list: page loaded"
        );
        let _ = self
            .events
            .send(ListEvent::StateChanged(Arc::clone(&applied)));
        FetchOutcome::Applied(applied)
    }

    fn report_failure(&self, err: FetchError) -> FetchOutcome {
        warn!(error = %err, "list: fetch failed; keeping previous page");
        let _ = self.events.send(ListEvent::FetchFailed(err.to_string()));
        FetchOutcome::Failed(err)
    }
}

fn decode_page(response: &TransportResponse, url: &str) -> Result<PageData, FetchError> {
    if !response.is_success() {
        return Err(FetchError::Status {
            status: response.status,
            url: url.to_string(),
        });
    }

    let resources: Vec<Resource> = response.json()?;
    let raw_links = response
        .header(LINKS_HEADER)
        .or_else(|| response.header(LINK_HEADER_FALLBACK))
        .ok_or(FetchError::MissingHeader(LINKS_HEADER))?;
    let links = parse_link_header(raw_links)?;

    let current_page = response
        .header(PAGE_HEADER)
        .ok_or(FetchError::MissingHeader(PAGE_HEADER))
        .and_then(|raw| parse_page_number(PAGE_HEADER, raw))?;
    let last_page = response
        .header(LAST_PAGE_HEADER)
        .map(|raw| parse_page_number(LAST_PAGE_HEADER, raw))
        .transpose()?;

    Ok(PageData {
        resources,
        links,
        current_page,
        last_page,
    })
}

fn parse_page_number(name: &'static str, raw: &str) -> Result<u32, FetchError> {
    match raw.trim().parse::<u32>() {
        Ok(page) if page >= 1 => Ok(page),
        _ => Err(FetchError::InvalidHeader {
            name,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
