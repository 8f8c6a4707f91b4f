use shared::{domain::ResourceId, protocol::ListQuery};
use url::Url;

use crate::error::EndpointError;

/// URLs of one REST collection below an API base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
    collection: Vec<String>,
}

impl Endpoints {
    pub fn new(base_url: &str, collection: &str) -> Result<Self, EndpointError> {
        let base = Url::parse(base_url.trim()).map_err(|err| EndpointError::InvalidBase {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(EndpointError::CannotBeABase(base_url.to_string()));
        }

        let collection: Vec<String> = collection
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        if collection.is_empty() {
            return Err(EndpointError::EmptyCollection);
        }

        Ok(Self { base, collection })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `<base>/<collection>`, target of list reads and creates.
    pub fn collection_url(&self) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(&self.collection);
        }
        url
    }

    /// `<base>/<collection>/<id>`, target of updates and deletes.
    pub fn resource_url(&self, id: &ResourceId) -> Url {
        let mut url = self.collection_url();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(&id.to_string());
        }
        url
    }

    pub fn list_url(&self, query: &ListQuery) -> Url {
        let mut url = self.collection_url();
        url.query_pairs_mut().clear().extend_pairs(query.pairs());
        url
    }

    /// Resolves a link taken from a response header. Absolute links are used
    /// as-is, relative ones are joined onto the API base.
    pub fn resolve(&self, link: &str) -> Result<Url, EndpointError> {
        self.base
            .join(link.trim())
            .map_err(|err| EndpointError::InvalidLink {
                link: link.to_string(),
                reason: err.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "tests/endpoints_tests.rs"]
mod tests;
