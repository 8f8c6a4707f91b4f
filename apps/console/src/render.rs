//! Plain-text rendering of a list snapshot.

use std::fmt::Write as _;

use client_core::{pagination_controls, ListState};
use serde_json::Value;
use shared::domain::{Resource, PAGE_SIZE_OPTIONS};

pub fn render_page(state: &ListState, collection: &str, columns: &[&str]) -> String {
    let mut out = String::new();

    let last_page = state
        .last_page
        .map(|page| page.to_string())
        .unwrap_or_else(|| "?".to_string());
    let _ = writeln!(
        out,
        "{collection}: page {} of {last_page} | sort {} {} | {} per page",
        state.current_page, state.sort_field, state.sort_direction, state.page_size
    );

    if state.loading {
        if state.links.is_empty() {
            out.push_str("  (loading)\n");
        } else {
            // Sort and size above are the requested ones; the rows are not.
            out.push_str("  (loading; rows below are from the previous request)\n");
        }
    }
    if state.shows_empty_notice() {
        let _ = writeln!(out, "  No {collection} to display");
    }
    for resource in &state.resources {
        let _ = writeln!(out, "  {}", render_resource(resource, columns));
    }

    let controls = render_controls(state);
    if !controls.is_empty() {
        let _ = writeln!(out, "  {controls}");
    }
    out
}

/// `[label]` for enabled controls, `(label)` for disabled ones.
pub fn render_controls(state: &ListState) -> String {
    pagination_controls(state)
        .into_iter()
        .map(|(link, enabled)| {
            if enabled {
                format!("[{}]", link.label)
            } else {
                format!("({})", link.label)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Offered page sizes with the active one bracketed.
pub fn render_size_options(current: u32) -> String {
    PAGE_SIZE_OPTIONS
        .iter()
        .map(|&size| {
            if size == current {
                format!("[{size}]")
            } else {
                size.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_resource(resource: &Resource, columns: &[&str]) -> String {
    let id = resource
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    let values: Vec<String> = columns
        .iter()
        .map(|column| match resource.fields.get(*column) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        })
        .collect();
    format!("#{id} {}", values.join(" "))
        .trim_end()
        .to_string()
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
