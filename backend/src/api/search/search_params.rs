//! Query string builders for trove search requests.

use common::search_const::FACET_VALUE_PAGE_SIZE;
use common::search_query::{FilterQueryObject, FilterQueryValue, SearchRequest};


pub fn build_card_search_params(request: &SearchRequest) -> anyhow::Result<Vec<(String, String)>> {
    let mut params = Vec::new();
    if let Some(text) = &request.card_search_text {
        params.push(("cardSearchText".to_string(), text.clone()));
    }
    if let Some(cursor) = &request.page_cursor {
        params.push(("page[cursor]".to_string(), cursor.clone()));
    }
    params.push(("sort".to_string(), request.sort.as_str().to_string()));
    params.extend(build_card_search_filter_params(&request.card_search_filter)?);
    params.push(("page[size]".to_string(), request.page_size.to_string()));
    Ok(params)
}

/// One parameter per property; multi-valued facets are comma joined (any-of),
/// presence facets become `cardSearchFilter[property][value]=true`.
/// A facet value containing a comma cannot be told apart from two values and is rejected.
pub fn build_card_search_filter_params(filters: &FilterQueryObject) -> anyhow::Result<Vec<(String, String)>> {
    let mut params = Vec::new();
    for (property, value) in filters.iter() {
        match value {
            FilterQueryValue::Presence(values) => {
                for (operator, flag) in values {
                    params.push((format!("cardSearchFilter[{property}][{operator}]"), flag.to_string()));
                }
            }
            FilterQueryValue::AnyOf(values) => {
                if let Some(value) = values.iter().find(|v| v.contains(',')) {
                    anyhow::bail!("Filter value for {} contains a comma: {}", property, value);
                }
                params.push((format!("cardSearchFilter[{property}]"), values.join(",")));
            }
            FilterQueryValue::Text(text) => {
                params.push((format!("cardSearchFilter[{property}]"), text.clone()));
            }
        }
    }
    Ok(params)
}

pub fn build_value_search_params(
    request: &SearchRequest,
    property_path_key: &str,
    value_search_text: &str,
) -> anyhow::Result<Vec<(String, String)>> {
    let mut params = vec![("valueSearchPropertyPath".to_string(), property_path_key.to_string())];
    if !value_search_text.is_empty() {
        params.push(("valueSearchText".to_string(), value_search_text.to_string()));
    }
    if let Some(text) = &request.card_search_text {
        params.push(("cardSearchText".to_string(), text.clone()));
    }
    params.extend(build_card_search_filter_params(&request.card_search_filter)?);
    params.push(("page[size]".to_string(), FACET_VALUE_PAGE_SIZE.to_string()));
    Ok(params)
}


#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use common::search_filter::{FacetVocabulary, Filter};
    use common::search_query::{ResourceTypeFilter, SearchQuery, SortOption};

    use super::*;

    fn filter(property: &str, value: &str) -> Filter {
        Filter {
            property_visible_label: property.to_string(),
            property_short_form_label: property.to_string(),
            value: value.to_string(),
            label: value.to_string(),
        }
    }

    fn pairs(params: &[(String, String)]) -> Vec<(&str, &str)> {
        params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn card_search_params_flatten_every_filter_shape() {
        let query = SearchQuery {
            card_search_text: "climate".to_string(),
            active_filters: [
                filter("funder", "https://ror.org/a"),
                filter("hasDataResource", "is-present"),
                filter("funder", "https://ror.org/b"),
            ]
            .into_iter()
            .collect(),
            resource_type: Some(ResourceTypeFilter::Projects),
            sort: SortOption::DateModifiedDescending,
            page_cursor: Some("c2".to_string()),
        };
        let request = query.to_request(&FacetVocabulary::default(), &BTreeMap::new());

        assert_eq!(
            pairs(&build_card_search_params(&request).unwrap()),
            vec![
                ("cardSearchText", "climate"),
                ("page[cursor]", "c2"),
                ("sort", "-dateModified"),
                ("cardSearchFilter[funder]", "https://ror.org/a,https://ror.org/b"),
                ("cardSearchFilter[hasDataResource][is-present]", "true"),
                ("cardSearchFilter[resourceType]", "Project,ProjectComponent"),
                ("page[size]", "10"),
            ]
        );
    }

    #[test]
    fn first_page_without_text_omits_optional_params() {
        let request = SearchQuery::default().to_request(&FacetVocabulary::default(), &BTreeMap::new());
        let params = build_card_search_params(&request).unwrap();
        assert!(params.iter().all(|(k, _)| k != "cardSearchText" && k != "page[cursor]"));
        assert_eq!(params.first().map(|(k, v)| (k.as_str(), v.as_str())), Some(("sort", "-relevance")));
    }

    #[test]
    fn value_search_params_name_the_property_path() {
        let query = SearchQuery {
            card_search_text: "soil".to_string(),
            resource_type: Some(ResourceTypeFilter::Preprints),
            ..Default::default()
        };
        let request = query.to_request(&FacetVocabulary::default(), &BTreeMap::new());
        assert_eq!(
            pairs(&build_value_search_params(&request, "funder", "").unwrap()),
            vec![
                ("valueSearchPropertyPath", "funder"),
                ("cardSearchText", "soil"),
                ("cardSearchFilter[resourceType]", "Preprint"),
                ("page[size]", "20"),
            ]
        );
        assert!(
            build_value_search_params(&request, "funder", "nati")
                .unwrap()
                .contains(&("valueSearchText".to_string(), "nati".to_string()))
        );
    }

    #[test]
    fn comma_in_any_of_value_is_rejected() {
        let query = SearchQuery {
            active_filters: [filter("funder", "https://ror.org/a"), filter("funder", "https://example.org/x,y")]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let request = query.to_request(&FacetVocabulary::default(), &BTreeMap::new());

        let err = build_card_search_params(&request).unwrap_err();
        assert!(err.to_string().contains("https://example.org/x,y"));
        assert!(build_value_search_params(&request, "subject", "").is_err());

        // the joined resource type list is not a facet value
        let plain = SearchQuery::default().to_request(&FacetVocabulary::default(), &BTreeMap::new());
        assert!(build_card_search_params(&plain).is_ok());
    }
}
