//! Cursor pagination bookkeeping for the search page.

use common::search_result::PageCursors;

use crate::data_definitions::usage_error::SearchUsageError;


/// What page was asked for, and which pages the last successful search offered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaginationCursor {
    current: Option<String>,
    offered: PageCursors,
}

impl PaginationCursor {
    /// `None` is the first page.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn offered(&self) -> &PageCursors {
        &self.offered
    }

    pub fn is_first_page(&self) -> bool {
        self.current.is_none()
    }

    pub fn reset_to_first(&mut self) {
        self.current = None;
    }

    /// An offered empty token is the index's link to the first page.
    pub fn select(&mut self, cursor: &str) -> Result<(), SearchUsageError> {
        if !self.offered.offers(cursor) {
            return Err(SearchUsageError::UnknownPageCursor(cursor.to_string()));
        }
        self.current = Some(cursor.to_string()).filter(|c| !c.is_empty());
        Ok(())
    }

    pub fn record_offered(&mut self, cursors: PageCursors) {
        self.offered = cursors;
    }
}
