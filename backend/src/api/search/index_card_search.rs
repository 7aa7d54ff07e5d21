//! Index card search endpoint and response shaping.

use common::linked_data::PropertyBag;
use common::search_const::{SHARE_MORE_THAN_TEN_THOUSAND, TEXT_MATCH_EVIDENCE_TYPE};
use common::search_query::SearchRequest;
use common::search_result::{
    IndexCard, MatchEvidence, PageCursors, RelatedPropertyPath, SearchResult, SearchResultSet, TotalResultCount,
};
use serde_json::Value;
use tracing::debug;

use crate::api::search::search_params::build_card_search_params;
use crate::share_utils::trove_utils::{IncludedResources, RawJsonApiDocument, RawResource, cursor_from_href, trove_get};


pub async fn index_card_search(request: &SearchRequest) -> anyhow::Result<SearchResultSet> {
    let params = build_card_search_params(request)?;
    let document = trove_get("index-card-search", &params).await?;
    let result = parse_index_card_search(&document)?;
    debug!(
        "index-card-search: {} results of {}",
        result.results.len(),
        result.total_result_count
    );
    Ok(result)
}

pub fn parse_index_card_search(document: &RawJsonApiDocument) -> anyhow::Result<SearchResultSet> {
    let search = &document.data;
    if search.resource_type != "index-card-search" {
        anyhow::bail!("Expected an index-card-search document, got {}", search.resource_type);
    }
    let included = IncludedResources::new(document);

    let total_result_count = match search.attribute("totalResultCount") {
        Some(value) => parse_total_result_count(value)?,
        None => anyhow::bail!("index-card-search {} has no totalResultCount", search.id),
    };

    let results = included
        .related(search, "searchResultPage")
        .into_iter()
        .filter_map(|result| parse_search_result(&included, result))
        .collect();

    let mut cursors = PageCursors::default();
    if let Some(page) = search.relationship("searchResultPage") {
        let cursor = |name: &str| page.link(name).and_then(|link| cursor_from_href(link.href()));
        cursors = PageCursors {
            first: cursor("first"),
            next: cursor("next"),
            prev: cursor("prev"),
        };
    }

    let related_properties = included
        .related(search, "relatedProperties")
        .into_iter()
        .map(parse_related_property_path)
        .collect();

    Ok(SearchResultSet {
        results,
        total_result_count,
        related_properties,
        cursors,
    })
}

pub fn parse_total_result_count(value: &Value) -> anyhow::Result<TotalResultCount> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(count) => Ok(TotalResultCount::Exact(count)),
            None => anyhow::bail!("Invalid totalResultCount: {}", n),
        },
        Value::String(s) if s == SHARE_MORE_THAN_TEN_THOUSAND => Ok(TotalResultCount::MoreThanTenThousand),
        Value::Object(map) if map.get("@id").and_then(Value::as_str) == Some(SHARE_MORE_THAN_TEN_THOUSAND) => {
            Ok(TotalResultCount::MoreThanTenThousand)
        }
        _ => anyhow::bail!("Invalid totalResultCount: {:#?}", value),
    }
}

/// Results whose index card is not included are dropped.
fn parse_search_result(included: &IncludedResources<'_>, result: &RawResource) -> Option<SearchResult> {
    let card = included.related(result, "indexCard").into_iter().next()?;
    let match_evidence = result
        .attribute("matchEvidence")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_match_evidence).collect())
        .unwrap_or_default();

    Some(SearchResult {
        index_card: parse_index_card(card),
        match_evidence,
        card_search_result_count: result.attribute("cardSearchResultCount").and_then(Value::as_u64),
    })
}

pub(crate) fn parse_index_card(card: &RawResource) -> IndexCard {
    IndexCard {
        id: card.id.clone(),
        resource_identifier: card
            .attribute("resourceIdentifier")
            .and_then(Value::as_array)
            .map(|ids| ids.iter().filter_map(first_string).collect())
            .unwrap_or_default(),
        resource_metadata: card
            .attribute("resourceMetadata")
            .map(PropertyBag::from_json)
            .unwrap_or_default(),
    }
}

fn parse_match_evidence(value: &Value) -> Option<MatchEvidence> {
    let property_path = value
        .get("osfmapPropertyPath")
        .or_else(|| value.get("propertyPath"))
        .and_then(Value::as_array)
        .map(|path| path.iter().filter_map(first_string).collect())
        .unwrap_or_default();
    let is_text_match = value.get("matchingHighlight").is_some()
        || value
            .get("@type")
            .and_then(first_string)
            .is_some_and(|t| t == TEXT_MATCH_EVIDENCE_TYPE || t.ends_with("TextMatchEvidence"));

    if is_text_match {
        return Some(MatchEvidence::TextMatch {
            property_path,
            matching_highlight: value.get("matchingHighlight").and_then(first_string)?,
        });
    }
    Some(MatchEvidence::IriMatch {
        property_path,
        matching_iri: value.get("matchingIri").and_then(first_string)?,
    })
}

fn parse_related_property_path(resource: &RawResource) -> RelatedPropertyPath {
    RelatedPropertyPath {
        property_path_key: resource
            .attribute("propertyPathKey")
            .and_then(first_string)
            .unwrap_or_else(|| resource.id.clone()),
        property_path: resource
            .attribute("propertyPath")
            .and_then(Value::as_array)
            .map(|steps| steps.iter().map(PropertyBag::from_json).collect())
            .unwrap_or_default(),
        card_search_result_count: resource
            .attribute("cardSearchResultCount")
            .and_then(Value::as_u64)
            .unwrap_or(0),
    }
}

/// `"x"`, `["x", ...]`, `{"@value": "x"}` and `{"@id": "x"}` all read as `x`.
pub(crate) fn first_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.first().and_then(first_string),
        Value::Object(map) => map.get("@value").or_else(|| map.get("@id")).and_then(first_string),
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn document(value: Value) -> RawJsonApiDocument {
        serde_json::from_value(value).unwrap()
    }

    fn sample_search_document(total: Value) -> RawJsonApiDocument {
        document(json!({
            "data": {
                "type": "index-card-search",
                "id": "search-1",
                "attributes": {"cardSearchText": "climate", "totalResultCount": total},
                "relationships": {
                    "searchResultPage": {
                        "data": [
                            {"type": "search-result", "id": "r1"},
                            {"type": "search-result", "id": "r2"},
                        ],
                        "links": {
                            "first": {"href": "https://share.osf.io/trove/index-card-search?page%5Bcursor%5D=f1"},
                            "next": {"href": "https://share.osf.io/trove/index-card-search?page%5Bcursor%5D=n1"},
                        },
                    },
                    "relatedProperties": {
                        "data": [{"type": "related-property-path", "id": "funder"}],
                    },
                },
            },
            "included": [
                {
                    "type": "search-result",
                    "id": "r1",
                    "attributes": {
                        "matchEvidence": [
                            {
                                "@type": ["https://share.osf.io/vocab/2023/trove/TextMatchEvidence"],
                                "matchingHighlight": ["<em>climate</em> change"],
                                "osfmapPropertyPath": ["title"],
                            },
                            {
                                "@type": ["https://share.osf.io/vocab/2023/trove/IriMatchEvidence"],
                                "matchingIri": "https://ror.org/01",
                                "osfmapPropertyPath": ["funder"],
                            },
                        ],
                        "cardSearchResultCount": 1,
                    },
                    "relationships": {"indexCard": {"data": {"type": "index-card", "id": "card-1"}}},
                },
                {
                    "type": "search-result",
                    "id": "r2",
                    "relationships": {"indexCard": {"data": {"type": "index-card", "id": "card-gone"}}},
                },
                {
                    "type": "index-card",
                    "id": "card-1",
                    "attributes": {
                        "resourceIdentifier": ["https://osf.io/abcde", "https://doi.org/10.1/abcde"],
                        "resourceMetadata": {
                            "@id": "https://osf.io/abcde",
                            "resourceType": [{"@id": "Project"}],
                            "title": [{"@value": "Climate project"}],
                        },
                    },
                },
                {
                    "type": "related-property-path",
                    "id": "funder",
                    "attributes": {
                        "propertyPathKey": "funder",
                        "propertyPath": [{
                            "@id": "http://osf.io/vocab/2022/funder",
                            "displayLabel": [{"@value": "Funder"}],
                            "shortFormLabel": [{"@value": "funder"}],
                        }],
                        "cardSearchResultCount": 42,
                    },
                },
            ],
        }))
    }

    #[test]
    fn parses_results_cursors_and_related_properties() {
        let result = parse_index_card_search(&sample_search_document(json!(2))).unwrap();

        assert_eq!(result.total_result_count, TotalResultCount::Exact(2));
        assert_eq!(result.results.len(), 1);

        let first = &result.results[0];
        assert_eq!(first.index_card.id, "card-1");
        assert_eq!(first.metadata().display_title(), Some("Climate project"));
        assert_eq!(first.metadata().doi(), vec!["https://doi.org/10.1/abcde"]);
        assert_eq!(
            first.match_evidence,
            vec![
                MatchEvidence::TextMatch {
                    property_path: vec!["title".to_string()],
                    matching_highlight: "<em>climate</em> change".to_string(),
                },
                MatchEvidence::IriMatch {
                    property_path: vec!["funder".to_string()],
                    matching_iri: "https://ror.org/01".to_string(),
                },
            ]
        );

        assert_eq!(
            result.cursors,
            PageCursors {
                first: Some("f1".to_string()),
                next: Some("n1".to_string()),
                prev: None,
            }
        );

        assert_eq!(result.related_properties.len(), 1);
        assert_eq!(result.related_properties[0].short_form_label(), "funder");
        assert_eq!(result.related_properties[0].card_search_result_count, 42);
    }

    #[test]
    fn overflow_sentinel_is_recognised_in_both_shapes() {
        for total in [json!("trove:ten-thousands-and-more"), json!({"@id": "trove:ten-thousands-and-more"})] {
            let result = parse_index_card_search(&sample_search_document(total)).unwrap();
            assert_eq!(result.total_result_count, TotalResultCount::MoreThanTenThousand);
            assert_eq!(result.total_result_count.to_string(), "10,000+");
        }
    }

    #[test]
    fn malformed_counts_and_documents_are_errors() {
        assert!(parse_total_result_count(&json!(-3)).is_err());
        assert!(parse_total_result_count(&json!("lots")).is_err());

        let wrong = document(json!({"data": {"type": "index-value-search", "id": "x"}}));
        assert!(parse_index_card_search(&wrong).is_err());

        let no_count = document(json!({"data": {"type": "index-card-search", "id": "x"}}));
        assert!(parse_index_card_search(&no_count).is_err());
    }

    #[test]
    fn empty_page_has_no_results_or_cursors() {
        let result = parse_index_card_search(&document(json!({
            "data": {
                "type": "index-card-search",
                "id": "x",
                "attributes": {"totalResultCount": 0},
            },
        })))
        .unwrap();
        assert!(result.results.is_empty());
        assert!(result.related_properties.is_empty());
        assert_eq!(result.cursors, PageCursors::default());
    }
}
