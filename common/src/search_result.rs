use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::linked_data::PropertyBag;
use crate::resource_metadata::ResourceMetadata;
use crate::search_const::MORE_THAN_TEN_THOUSAND_DISPLAY;
use crate::search_filter::Filter;


/// One completed page of an index card search. Replaced as a whole, never merged.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResultSet {
    pub results: Vec<SearchResult>,
    pub total_result_count: TotalResultCount,
    pub related_properties: Vec<RelatedPropertyPath>,
    pub cursors: PageCursors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalResultCount {
    Exact(u64),
    /// The index stopped counting.
    MoreThanTenThousand,
}

impl Display for TotalResultCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TotalResultCount::Exact(count) => write!(f, "{}", count),
            TotalResultCount::MoreThanTenThousand => f.write_str(MORE_THAN_TEN_THOUSAND_DISPLAY),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageCursors {
    pub first: Option<String>,
    pub next: Option<String>,
    pub prev: Option<String>,
}

impl PageCursors {
    pub fn offers(&self, cursor: &str) -> bool {
        [&self.first, &self.next, &self.prev]
            .into_iter()
            .any(|offered| offered.as_deref() == Some(cursor))
    }
}


#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub index_card: IndexCard,
    pub match_evidence: Vec<MatchEvidence>,
    pub card_search_result_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndexCard {
    pub id: String,
    pub resource_identifier: Vec<String>,
    pub resource_metadata: PropertyBag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvidence {
    IriMatch {
        property_path: Vec<String>,
        matching_iri: String,
    },
    TextMatch {
        property_path: Vec<String>,
        matching_highlight: String,
    },
}

impl MatchEvidence {
    pub fn property_path(&self) -> &[String] {
        match self {
            MatchEvidence::IriMatch { property_path, .. } => property_path,
            MatchEvidence::TextMatch { property_path, .. } => property_path,
        }
    }

    pub fn matched(&self) -> &str {
        match self {
            MatchEvidence::IriMatch { matching_iri, .. } => matching_iri,
            MatchEvidence::TextMatch { matching_highlight, .. } => matching_highlight,
        }
    }
}

impl SearchResult {
    /// Display fields are computed from the card on every read.
    pub fn metadata(&self) -> ResourceMetadata<'_> {
        ResourceMetadata::new(&self.index_card)
    }

    /// Why the card matched, as `path: match; ` pairs.
    pub fn context(&self) -> Option<String> {
        if self.match_evidence.is_empty() {
            return None;
        }
        let context = self
            .match_evidence
            .iter()
            .map(|evidence| {
                let path = evidence.property_path().first().map(String::as_str).unwrap_or("");
                format!("{}: {}; ", path, evidence.matched())
            })
            .collect::<String>();
        Some(context)
    }
}


/// A property the index suggests filtering on, with how many cards carry it.
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedPropertyPath {
    pub property_path_key: String,
    pub property_path: Vec<PropertyBag>,
    pub card_search_result_count: u64,
}

impl RelatedPropertyPath {
    fn last_step(&self) -> Option<&PropertyBag> {
        self.property_path.last()
    }

    pub fn short_form_label(&self) -> &str {
        self.last_step()
            .and_then(|step| step.first_literal("shortFormLabel"))
            .unwrap_or(&self.property_path_key)
    }

    pub fn display_label(&self) -> &str {
        self.last_step()
            .and_then(|step| step.first_literal("displayLabel"))
            .unwrap_or_else(|| self.short_form_label())
    }

    pub fn iri(&self) -> Option<&str> {
        self.last_step().and_then(|step| step.id.as_deref())
    }

    pub fn to_filter(&self, item: &SearchResultFacetItem) -> Filter {
        Filter {
            property_visible_label: self.display_label().to_string(),
            property_short_form_label: self.short_form_label().to_string(),
            value: item.value.clone(),
            label: item.display_string.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResultFacets {
    pub property_path_key: String,
    pub facet_values: Vec<SearchResultFacetItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultFacetItem {
    pub display_string: String,
    /// IRI or literal the filter will match on.
    pub value: String,
    pub count: u64,
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn overflow_count_renders_as_fixed_string() {
        assert_eq!(TotalResultCount::MoreThanTenThousand.to_string(), "10,000+");
        assert_eq!(TotalResultCount::Exact(9_999).to_string(), "9999");
        assert_eq!(TotalResultCount::Exact(0).to_string(), "0");
    }

    #[test]
    fn cursors_only_offer_what_the_index_returned() {
        let cursors = PageCursors {
            first: Some("first".to_string()),
            next: Some("next".to_string()),
            prev: None,
        };
        assert!(cursors.offers("first"));
        assert!(cursors.offers("next"));
        assert!(!cursors.offers("prev"));
        assert!(!PageCursors::default().offers(""));
    }

    #[test]
    fn context_joins_text_and_iri_evidence() {
        let result = SearchResult {
            index_card: IndexCard::default(),
            match_evidence: vec![
                MatchEvidence::TextMatch {
                    property_path: vec!["title".to_string()],
                    matching_highlight: "<em>soil</em> survey".to_string(),
                },
                MatchEvidence::IriMatch {
                    property_path: vec!["funder".to_string(), "identifier".to_string()],
                    matching_iri: "https://ror.org/01".to_string(),
                },
            ],
            card_search_result_count: None,
        };
        assert_eq!(
            result.context().as_deref(),
            Some("title: <em>soil</em> survey; funder: https://ror.org/01; ")
        );

        let empty = SearchResult { match_evidence: vec![], ..result };
        assert_eq!(empty.context(), None);
    }

    #[test]
    fn related_property_labels_fall_back_to_the_path_key() {
        let funder = RelatedPropertyPath {
            property_path_key: "funder".to_string(),
            property_path: vec![PropertyBag::from_json(&json!({
                "@id": "http://osf.io/vocab/2022/funder",
                "displayLabel": [{"@value": "Funder", "@language": "en"}],
                "shortFormLabel": [{"@value": "funder"}],
            }))],
            card_search_result_count: 12,
        };
        assert_eq!(funder.short_form_label(), "funder");
        assert_eq!(funder.display_label(), "Funder");
        assert_eq!(funder.iri(), Some("http://osf.io/vocab/2022/funder"));

        let bare = RelatedPropertyPath {
            property_path_key: "subject".to_string(),
            property_path: vec![],
            card_search_result_count: 0,
        };
        assert_eq!(bare.short_form_label(), "subject");
        assert_eq!(bare.display_label(), "subject");

        let filter = funder.to_filter(&SearchResultFacetItem {
            display_string: "National Science Foundation".to_string(),
            value: "https://ror.org/021nxhr62".to_string(),
            count: 3,
        });
        assert_eq!(filter.property_short_form_label, "funder");
        assert_eq!(filter.property_visible_label, "Funder");
        assert_eq!(filter.value, "https://ror.org/021nxhr62");
        assert_eq!(filter.label, "National Science Foundation");
    }
}
