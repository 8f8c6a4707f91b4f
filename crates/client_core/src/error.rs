use shared::error::{DomainError, LinkHeaderError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} timed out")]
    Timeout { url: String },
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    Client(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("invalid api base url {url:?}: {reason}")]
    InvalidBase { url: String, reason: String },
    #[error("api base url {0:?} cannot carry a path")]
    CannotBeABase(String),
    #[error("collection name must not be empty")]
    EmptyCollection,
    #[error("cannot resolve link {link:?}: {reason}")]
    InvalidLink { link: String, reason: String },
}

/// Why a list fetch produced no new state.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("server answered {status} for {url}")]
    Status { status: u16, url: String },
    #[error("invalid list body: {0}")]
    Body(#[from] serde_json::Error),
    #[error("response is missing the {0} header")]
    MissingHeader(&'static str),
    #[error("response header {name} has invalid value {value:?}")]
    InvalidHeader { name: &'static str, value: String },
    #[error("invalid pagination links: {0}")]
    LinkHeader(#[from] LinkHeaderError),
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

/// Rejections raised by list mutators before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("page size must be positive")]
    InvalidPageSize,
    #[error("page numbers start at 1")]
    InvalidPage,
}

#[derive(Debug, Error)]
pub enum MutationError {
    #[error("resource has no id")]
    MissingId,
    #[error("failed to encode resource: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("server answered {status} for {method} {url}")]
    Status {
        method: &'static str,
        status: u16,
        url: String,
    },
}
