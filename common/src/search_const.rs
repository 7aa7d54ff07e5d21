//! Constants shared by the query builder, the transport and the projector.

/// Number of index cards requested per result page.
pub const PAGE_SIZE: u64 = 10;

/// Delay between the last keystroke and the debounced search.
pub const SEARCH_DEBOUNCE_MS: u64 = 100;

/// Value the index reports instead of a precise count once it stops counting.
pub const SHARE_MORE_THAN_TEN_THOUSAND: &str = "trove:ten-thousands-and-more";
pub const MORE_THAN_TEN_THOUSAND_DISPLAY: &str = "10,000+";

/// Reserved key of the card search filter holding the resource type tokens.
pub const RESOURCE_TYPE_FILTER_KEY: &str = "resourceType";

pub const ORCID_HOST: &str = "orcid.org/";
pub const DOI_HOST: &str = "https://doi.org";

pub const WITHDRAWAL_PROPERTY: &str = "https://osf.io/vocab/2022/withdrawal";
pub const TEXT_MATCH_EVIDENCE_TYPE: &str = "https://share.osf.io/vocab/2023/trove/TextMatchEvidence";

/// Facets that filter on presence rather than on a list of values.
pub const BOOLEAN_FILTER_PROPERTIES: [&str; 5] = [
    "hasDataResource",
    "hasAnalyticCodeResource",
    "hasMaterialsResource",
    "hasPapersResource",
    "hasSupplementalResource",
];

/// Number of candidate values listed for one facet.
pub const FACET_VALUE_PAGE_SIZE: u64 = 20;
