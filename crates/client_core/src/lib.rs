pub mod controller;
pub mod endpoints;
pub mod error;
pub mod mutation;
pub mod pagination;
pub mod state;
pub mod transport;

pub use controller::{FetchOutcome, ListController, ListEvent};
pub use endpoints::Endpoints;
pub use mutation::{
    DeleteConfirmation, DeleteOutcome, MutationOrchestrator, PreConfirmed, SaveOutcome,
    StayOnList, ViewNavigator,
};
pub use pagination::{is_link_enabled, pagination_controls, EditTarget};
pub use state::{ListConfig, ListState};
pub use transport::{HttpMethod, HttpTransport, ReqwestTransport, TransportResponse};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
