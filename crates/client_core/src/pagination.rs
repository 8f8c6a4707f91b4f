//! View-side derivations over a [`ListState`]. Nothing here is stored; every
//! answer is recomputed from the snapshot being rendered.

use shared::{
    domain::{Resource, ResourceId},
    protocol::{LinkRelation, NavigationLink},
};

use crate::state::ListState;

/// Whether a pagination control for `link` should accept clicks.
///
/// Before the first page arrives every control is disabled. An applied page
/// always carries at least one link, so an empty link set marks that state.
/// Without a reported last page only the forward controls lose their bound.
pub fn is_link_enabled(state: &ListState, link: &NavigationLink) -> bool {
    if state.links.is_empty() {
        return false;
    }

    match link.kind() {
        LinkRelation::First | LinkRelation::Prev => state.current_page > 1,
        LinkRelation::Next | LinkRelation::Last => state
            .last_page
            .map_or(true, |last_page| state.current_page < last_page),
        LinkRelation::Page(page) => page != state.current_page,
        LinkRelation::Other(_) => true,
    }
}

/// The links of the current page paired with their enablement, in server order.
pub fn pagination_controls(state: &ListState) -> Vec<(NavigationLink, bool)> {
    state
        .links
        .iter()
        .map(|link| (link.clone(), is_link_enabled(state, link)))
        .collect()
}

/// Route segment used for the "create" editor.
pub const NEW_RESOURCE_ROUTE: &str = "new";

/// What the editor view should show for a route id.
#[derive(Debug, Clone, PartialEq)]
pub enum EditTarget {
    /// The list has not loaded yet; render nothing.
    Pending,
    New,
    Existing(Resource),
    /// Unknown id; the caller goes back to the list.
    Missing,
}

impl EditTarget {
    pub fn resolve(state: &ListState, route_id: &str) -> Self {
        if state.loading {
            return Self::Pending;
        }
        if route_id == NEW_RESOURCE_ROUTE {
            return Self::New;
        }
        match state.find(&ResourceId::from_route(route_id)) {
            Some(resource) => Self::Existing(resource.clone()),
            None => Self::Missing,
        }
    }
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
