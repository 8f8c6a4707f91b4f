use serde::{Deserialize, Serialize};

use crate::{
    domain::{SortDirection, SortField},
    link_header::relation_label,
};

/// Response header carrying the pagination links.
pub const LINKS_HEADER: &str = "links";
/// Standard RFC 5988 spelling, accepted when `links` is absent.
pub const LINK_HEADER_FALLBACK: &str = "link";
pub const PAGE_HEADER: &str = "x-page";
pub const LAST_PAGE_HEADER: &str = "x-last-page";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationLink {
    pub relation: String,
    pub url: String,
    pub label: String,
}

impl NavigationLink {
    pub fn kind(&self) -> LinkRelation {
        LinkRelation::from_relation(&self.relation)
    }
}

/// Closed classification of a relation token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkRelation {
    First,
    Prev,
    Next,
    Last,
    Page(u32),
    Other(String),
}

impl LinkRelation {
    pub fn from_relation(relation: &str) -> Self {
        let token = relation_label(relation);
        match token.to_ascii_lowercase().as_str() {
            "first" => Self::First,
            "prev" | "previous" => Self::Prev,
            "next" => Self::Next,
            "last" => Self::Last,
            other => match other.parse::<u32>() {
                Ok(page) if page >= 1 => Self::Page(page),
                _ => Self::Other(relation.to_string()),
            },
        }
    }
}

/// Query parameters of the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub sort_by: SortField,
    pub sort_dir: SortDirection,
}

impl ListQuery {
    pub fn pairs(&self) -> [(&'static str, String); 4] {
        [
            ("page", self.page.to_string()),
            ("perPage", self.per_page.to_string()),
            ("sortBy", self.sort_by.to_string()),
            ("sortDir", self.sort_dir.to_string()),
        ]
    }
}
