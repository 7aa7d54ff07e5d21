//! Facet value listing for one related property.

use std::collections::HashSet;

use common::search_query::SearchRequest;
use common::search_result::{RelatedPropertyPath, SearchResultFacetItem, SearchResultFacets};
use serde_json::Value;

use crate::api::search::index_card_search::parse_index_card;
use crate::api::search::search_params::build_value_search_params;
use crate::share_utils::trove_utils::{IncludedResources, RawJsonApiDocument, trove_get};


pub async fn index_value_search(
    mut request: SearchRequest,
    property: &RelatedPropertyPath,
    value_search_text: &str,
) -> anyhow::Result<SearchResultFacets> {
    // remove all filters on current property, as we don't want to filter out unselected values from the facet
    request.card_search_filter.0.remove(property.short_form_label());

    let params = build_value_search_params(&request, &property.property_path_key, value_search_text)?;
    let document = trove_get("index-value-search", &params).await?;
    parse_index_value_search(&document, &property.property_path_key)
}

pub fn parse_index_value_search(
    document: &RawJsonApiDocument,
    property_path_key: &str,
) -> anyhow::Result<SearchResultFacets> {
    let search = &document.data;
    if search.resource_type != "index-value-search" {
        anyhow::bail!("Expected an index-value-search document, got {}", search.resource_type);
    }
    let included = IncludedResources::new(document);

    let mut result = SearchResultFacets {
        property_path_key: property_path_key.to_string(),
        facet_values: Vec::new(),
    };
    let mut present_values = HashSet::new();
    for search_result in included.related(search, "searchResultPage") {
        let Some(card) = included.related(search_result, "indexCard").into_iter().next() else {
            continue;
        };
        let card = parse_index_card(card);
        let metadata = &card.resource_metadata;
        let Some(value) = metadata.id.clone().or_else(|| card.resource_identifier.first().cloned()) else {
            continue;
        };
        if !present_values.insert(value.clone()) {
            continue;
        }
        let display_string = ["displayLabel", "name", "title"]
            .iter()
            .find_map(|property| metadata.first_literal(property))
            .map(str::to_string)
            .unwrap_or_else(|| value.clone());
        result.facet_values.push(SearchResultFacetItem {
            display_string,
            value,
            count: search_result
                .attribute("cardSearchResultCount")
                .and_then(Value::as_u64)
                .unwrap_or(0),
        });
    }
    drop(present_values);

    result.facet_values.sort_by_key(|item| (u64::MAX - item.count, item.display_string.clone()));
    Ok(result)
}
