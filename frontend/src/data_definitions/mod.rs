pub mod page_cursor;
pub mod search_callbacks;
pub mod usage_error;
