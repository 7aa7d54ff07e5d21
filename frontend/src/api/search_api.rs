//! Transport seam between the search page and the search index.

use std::rc::Rc;

use common::search_query::SearchRequest;
use common::search_result::{RelatedPropertyPath, SearchResultFacets, SearchResultSet};
use futures_util::future::LocalBoxFuture;


/// Anything that can answer index card and facet value searches.
///
/// Futures are not required to be `Send`: the search page drives them on
/// the task that owns it.
pub trait SearchTransport {
    fn index_card_search(&self, request: SearchRequest) -> LocalBoxFuture<'_, anyhow::Result<SearchResultSet>>;

    fn index_value_search(
        &self,
        request: SearchRequest,
        property: RelatedPropertyPath,
        value_search_text: String,
    ) -> LocalBoxFuture<'_, anyhow::Result<SearchResultFacets>>;
}

impl<T: SearchTransport + ?Sized> SearchTransport for Rc<T> {
    fn index_card_search(&self, request: SearchRequest) -> LocalBoxFuture<'_, anyhow::Result<SearchResultSet>> {
        (**self).index_card_search(request)
    }

    fn index_value_search(
        &self,
        request: SearchRequest,
        property: RelatedPropertyPath,
        value_search_text: String,
    ) -> LocalBoxFuture<'_, anyhow::Result<SearchResultFacets>> {
        (**self).index_value_search(request, property, value_search_text)
    }
}


/// Talks to the trove index configured through `SHARE_URL`.
#[cfg(feature = "server")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ShareSearchTransport;

#[cfg(feature = "server")]
impl SearchTransport for ShareSearchTransport {
    fn index_card_search(&self, request: SearchRequest) -> LocalBoxFuture<'_, anyhow::Result<SearchResultSet>> {
        use futures_util::FutureExt;
        async move { backend::api::search::index_card_search(&request).await }.boxed_local()
    }

    fn index_value_search(
        &self,
        request: SearchRequest,
        property: RelatedPropertyPath,
        value_search_text: String,
    ) -> LocalBoxFuture<'_, anyhow::Result<SearchResultFacets>> {
        use futures_util::FutureExt;
        async move { backend::api::search::index_value_search(request, &property, &value_search_text).await }
            .boxed_local()
    }
}
