//! Ports the search page reports through.

use common::search_query::{ResourceTypeFilter, SearchQuery, SortOption};
use serde::{Deserialize, Serialize};


/// Parameters a completed search actually ran with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnSearchParams {
    pub card_search_text: String,
    pub sort: SortOption,
    pub resource_type: Option<ResourceTypeFilter>,
}

impl From<&SearchQuery> for OnSearchParams {
    fn from(query: &SearchQuery) -> Self {
        Self {
            card_search_text: query.card_search_text.clone(),
            sort: query.sort,
            resource_type: query.resource_type,
        }
    }
}

pub type OnSearchCallback = Box<dyn Fn(&OnSearchParams)>;

/// Receives transport failures; the page itself keeps showing the last good results.
pub type OnErrorCallback = Box<dyn Fn(&anyhow::Error)>;
