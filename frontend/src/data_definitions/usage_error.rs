//! Errors for calls the search page refuses to act on.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchUsageError {
    /// The cursor is not one of the first/next/prev cursors of the last page.
    UnknownPageCursor(String),
    /// The property is neither declared nor suggested by the last search.
    UndeclaredFacet(String),
}

impl std::fmt::Display for SearchUsageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownPageCursor(cursor) => write!(f, "Page cursor was not offered by the last search: {}", cursor),
            Self::UndeclaredFacet(property) => write!(f, "Facet is not part of the active vocabulary: {}", property),
        }
    }
}

impl std::error::Error for SearchUsageError {}
