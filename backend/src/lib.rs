//! Transport to the trove linked-data search index.

pub mod api;
pub mod share_utils;
