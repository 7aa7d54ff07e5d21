//! Shared search query models and the request builder.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::search_const::{PAGE_SIZE, RESOURCE_TYPE_FILTER_KEY};
use crate::search_filter::{FacetVocabulary, FilterSet};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortOption {
    #[default]
    #[serde(rename = "-relevance")]
    Relevance,
    #[serde(rename = "-dateCreated")]
    DateCreatedDescending,
    #[serde(rename = "dateCreated")]
    DateCreatedAscending,
    #[serde(rename = "-dateModified")]
    DateModifiedDescending,
    #[serde(rename = "dateModified")]
    DateModifiedAscending,
}

impl SortOption {
    pub const ALL: [SortOption; 5] = [
        SortOption::Relevance,
        SortOption::DateCreatedDescending,
        SortOption::DateCreatedAscending,
        SortOption::DateModifiedDescending,
        SortOption::DateModifiedAscending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Relevance => "-relevance",
            SortOption::DateCreatedDescending => "-dateCreated",
            SortOption::DateCreatedAscending => "dateCreated",
            SortOption::DateModifiedDescending => "-dateModified",
            SortOption::DateModifiedAscending => "dateModified",
        }
    }
}

impl Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = UnknownOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOption::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or_else(|| UnknownOptionError(s.to_string()))
    }
}


/// Resource type groups; `None` in a query stands for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceTypeFilter {
    #[serde(rename = "Registration,RegistrationComponent")]
    Registrations,
    #[serde(rename = "Project,ProjectComponent")]
    Projects,
    #[serde(rename = "Preprint")]
    Preprints,
    #[serde(rename = "Agent")]
    Users,
    #[serde(rename = "File")]
    Files,
}

impl ResourceTypeFilter {
    pub const ALL: [ResourceTypeFilter; 5] = [
        ResourceTypeFilter::Registrations,
        ResourceTypeFilter::Projects,
        ResourceTypeFilter::Preprints,
        ResourceTypeFilter::Users,
        ResourceTypeFilter::Files,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceTypeFilter::Registrations => "Registration,RegistrationComponent",
            ResourceTypeFilter::Projects => "Project,ProjectComponent",
            ResourceTypeFilter::Preprints => "Preprint",
            ResourceTypeFilter::Users => "Agent",
            ResourceTypeFilter::Files => "File",
        }
    }
}

impl Display for ResourceTypeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceTypeFilter {
    type Err = UnknownOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceTypeFilter::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or_else(|| UnknownOptionError(s.to_string()))
    }
}

/// Type tokens sent for a selector; no selector means every group.
pub fn effective_resource_type(resource_type: Option<ResourceTypeFilter>) -> String {
    match resource_type {
        Some(resource_type) => resource_type.as_str().to_string(),
        None => ResourceTypeFilter::ALL
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(","),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOptionError(pub String);

impl Display for UnknownOptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown option: {}", self.0)
    }
}

impl std::error::Error for UnknownOptionError {}


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterQueryValue {
    /// `cardSearchFilter[property][value]=true`
    Presence(BTreeMap<String, bool>),
    /// `cardSearchFilter[property]=iri1,iri2`
    AnyOf(Vec<String>),
    /// resource type tokens and caller supplied defaults
    Text(String),
}

/// Card search filter keyed by property label. Built fresh for every search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct FilterQueryObject(pub BTreeMap<String, FilterQueryValue>);

impl FilterQueryObject {
    pub fn get(&self, key: &str) -> Option<&FilterQueryValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, String, FilterQueryValue> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}


/// Everything the user controls about a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchQuery {
    pub card_search_text: String,
    pub active_filters: FilterSet,
    pub resource_type: Option<ResourceTypeFilter>,
    pub sort: SortOption,
    /// `None` requests the first page.
    pub page_cursor: Option<String>,
}

impl SearchQuery {
    pub fn filter_query_object(
        &self,
        vocabulary: &FacetVocabulary,
        default_query_options: &BTreeMap<String, String>,
    ) -> FilterQueryObject {
        let mut acc: BTreeMap<String, FilterQueryValue> = BTreeMap::new();
        for filter in &self.active_filters {
            let key = filter.property_short_form_label.clone();
            if vocabulary.is_boolean(&key) {
                acc.insert(key, FilterQueryValue::Presence(BTreeMap::from([(filter.value.clone(), true)])));
                continue;
            }
            match acc.get_mut(&key) {
                Some(FilterQueryValue::AnyOf(values)) => values.push(filter.value.clone()),
                _ => {
                    acc.insert(key, FilterQueryValue::AnyOf(vec![filter.value.clone()]));
                }
            }
        }
        acc.insert(
            RESOURCE_TYPE_FILTER_KEY.to_string(),
            FilterQueryValue::Text(effective_resource_type(self.resource_type)),
        );
        for (key, value) in default_query_options {
            acc.insert(key.clone(), FilterQueryValue::Text(value.clone()));
        }
        FilterQueryObject(acc)
    }

    pub fn to_request(
        &self,
        vocabulary: &FacetVocabulary,
        default_query_options: &BTreeMap<String, String>,
    ) -> SearchRequest {
        SearchRequest {
            card_search_text: Some(self.card_search_text.clone()).filter(|text| !text.is_empty()),
            page_cursor: self.page_cursor.clone().filter(|cursor| !cursor.is_empty()),
            sort: self.sort,
            card_search_filter: self.filter_query_object(vocabulary, default_query_options),
            page_size: PAGE_SIZE,
        }
    }
}


/// Normalized parameters of one `index-card-search` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub card_search_text: Option<String>,
    #[serde(rename = "page[cursor]", skip_serializing_if = "Option::is_none", default)]
    pub page_cursor: Option<String>,
    pub sort: SortOption,
    pub card_search_filter: FilterQueryObject,
    #[serde(rename = "page[size]")]
    pub page_size: u64,
}
