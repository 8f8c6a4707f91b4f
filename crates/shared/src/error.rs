use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkHeaderError {
    #[error("link header must not be of zero length")]
    EmptyHeader,
    #[error("link header segment {index} could not be split on ';': {segment:?}")]
    MalformedSegment { index: usize, segment: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("unknown sort direction {0:?}; expected ASC or DESC")]
    UnknownSortDirection(String),
    #[error("field {0:?} is not sortable")]
    UnsupportedSortField(String),
    #[error("at least one sortable field is required")]
    NoSortableFields,
}
