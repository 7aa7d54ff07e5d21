//! Facet selections and the vocabulary of facets a search page accepts.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::search_const::BOOLEAN_FILTER_PROPERTIES;


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub property_visible_label: String,
    /// OSFMAP shorthand label of the filtered property.
    pub property_short_form_label: String,
    pub value: String,
    pub label: String,
}

impl Filter {
    /// Two filters select the same facet when property and value agree;
    /// the display labels are not part of the identity.
    pub fn same_identity(&self, other: &Filter) -> bool {
        self.property_short_form_label == other.property_short_form_label && self.value == other.value
    }
}

/// Active facet selections in the order the user picked them.
/// (De)serialized as a plain list; duplicates in the input are dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Filter>", into = "Vec<Filter>")]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self, filter: &Filter) -> Option<usize> {
        self.filters.iter().position(|f| f.same_identity(filter))
    }

    pub fn contains(&self, filter: &Filter) -> bool {
        self.position(filter).is_some()
    }

    /// Appends the filter unless one with the same identity is already present.
    pub fn add(&mut self, filter: Filter) -> bool {
        if self.contains(&filter) {
            return false;
        }
        self.filters.push(filter);
        true
    }

    pub fn remove(&mut self, filter: &Filter) -> Option<Filter> {
        self.position(filter).map(|index| self.filters.remove(index))
    }

    /// Removes the filter if present, appends it otherwise.
    /// Returns true when the filter is active afterwards.
    pub fn toggle(&mut self, filter: Filter) -> bool {
        if self.remove(&filter).is_some() {
            return false;
        }
        self.filters.push(filter);
        true
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Copy of the set without any selection on `property_short_form_label`.
    pub fn without_property(&self, property_short_form_label: &str) -> FilterSet {
        FilterSet {
            filters: self
                .filters
                .iter()
                .filter(|f| f.property_short_form_label != property_short_form_label)
                .cloned()
                .collect(),
        }
    }
}

// order carries no meaning outside of a single property's value list
impl PartialEq for FilterSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.filters.iter().all(|f| other.filters.contains(f))
    }
}

impl Eq for FilterSet {}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}

impl FromIterator<Filter> for FilterSet {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        let mut set = FilterSet::new();
        for filter in iter {
            set.add(filter);
        }
        set
    }
}

impl From<Vec<Filter>> for FilterSet {
    fn from(filters: Vec<Filter>) -> Self {
        filters.into_iter().collect()
    }
}

impl From<FilterSet> for Vec<Filter> {
    fn from(set: FilterSet) -> Self {
        set.filters
    }
}


/// Which property labels may be filtered on, and which of them are boolean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetVocabulary {
    pub boolean_properties: BTreeSet<String>,
    pub declared_properties: BTreeSet<String>,
}

impl Default for FacetVocabulary {
    fn default() -> Self {
        let boolean_properties: BTreeSet<String> = BOOLEAN_FILTER_PROPERTIES.iter().map(|p| p.to_string()).collect();
        Self {
            declared_properties: boolean_properties.clone(),
            boolean_properties,
        }
    }
}

impl FacetVocabulary {
    pub fn empty() -> Self {
        Self {
            boolean_properties: BTreeSet::new(),
            declared_properties: BTreeSet::new(),
        }
    }

    pub fn with_property(mut self, property_short_form_label: impl Into<String>) -> Self {
        self.declared_properties.insert(property_short_form_label.into());
        self
    }

    pub fn with_boolean_property(mut self, property_short_form_label: impl Into<String>) -> Self {
        let label = property_short_form_label.into();
        self.declared_properties.insert(label.clone());
        self.boolean_properties.insert(label);
        self
    }

    pub fn is_boolean(&self, property_short_form_label: &str) -> bool {
        self.boolean_properties.contains(property_short_form_label)
    }

    pub fn is_declared(&self, property_short_form_label: &str) -> bool {
        self.declared_properties.contains(property_short_form_label)
    }
}
