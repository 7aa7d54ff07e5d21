//! Search API calls and module exports.

mod index_card_search;
pub use index_card_search::{index_card_search, parse_index_card_search};

mod index_value_search;
pub use index_value_search::{index_value_search, parse_index_value_search};

pub mod search_params;
