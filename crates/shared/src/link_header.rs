//! Parser for the pagination `links` header.
//!
//! The backend advertises navigation targets as a comma separated list of
//! `<URL>; rel="page-TOKEN"` segments, the same shape GitHub uses for its
//! `Link` header. Tokens are `first`, `prev`, `next`, `last` or a page number.

use crate::{error::LinkHeaderError, protocol::NavigationLink};

const RELATION_PREFIX: &str = "page-";

/// Parses a raw header value into links, keeping the server's order.
pub fn parse_link_header(header: &str) -> Result<Vec<NavigationLink>, LinkHeaderError> {
    if header.trim().is_empty() {
        return Err(LinkHeaderError::EmptyHeader);
    }

    header
        .split(',')
        .enumerate()
        .map(|(index, segment)| parse_segment(index, segment))
        .collect()
}

fn parse_segment(index: usize, segment: &str) -> Result<NavigationLink, LinkHeaderError> {
    let parts: Vec<&str> = segment.split(';').collect();
    let &[target, params] = parts.as_slice() else {
        return Err(LinkHeaderError::MalformedSegment {
            index,
            segment: segment.to_string(),
        });
    };

    let url = between(target, "<", ">").unwrap_or(target).trim().to_string();
    let relation = between(params, "rel=\"", "\"")
        .unwrap_or(params)
        .trim()
        .to_string();
    let label = relation_label(&relation).to_string();

    Ok(NavigationLink {
        relation,
        url,
        label,
    })
}

/// Human-facing label for a relation: the token after `page-`, or the whole
/// relation when the server uses some other naming.
pub fn relation_label(relation: &str) -> &str {
    relation.strip_prefix(RELATION_PREFIX).unwrap_or(relation)
}

fn between<'a>(haystack: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let start = haystack.find(open)? + open.len();
    let len = haystack[start..].find(close)?;
    Some(&haystack[start..start + len])
}

#[cfg(test)]
#[path = "tests/link_header_tests.rs"]
mod tests;
