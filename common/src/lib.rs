//! Common library exports shared between the transport and the search page.

extern crate serde;


pub mod search_const;
pub mod search_filter;
pub mod search_query;
pub mod search_result;
pub mod linked_data;
pub mod resource_metadata;
