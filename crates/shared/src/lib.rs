pub mod domain;
pub mod error;
pub mod link_header;
pub mod protocol;

pub use link_header::parse_link_header;
