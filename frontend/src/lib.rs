//! Faceted search page over a SHARE/trove index.
//!
//! [`pages::search_page::SearchPage`] holds the query state and runs
//! searches through an [`api::search_api::SearchTransport`].

pub mod api;
pub mod data_definitions;
pub mod pages;
