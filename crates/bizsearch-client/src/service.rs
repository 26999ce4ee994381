//! The seam between the search view and whatever answers its queries.

use async_trait::async_trait;
use bizsearch_core::BusinessRecord;

use crate::error::SearchError;

/// Anything that can turn a trimmed query into ranked business records.
///
/// [`crate::SearchClient`] is the HTTP implementation; tests substitute stubs.
#[async_trait]
pub trait SearchService: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<BusinessRecord>, SearchError>;
}

#[async_trait]
impl<T: SearchService + ?Sized> SearchService for std::sync::Arc<T> {
    async fn search(&self, query: &str) -> Result<Vec<BusinessRecord>, SearchError> {
        (**self).search(query).await
    }
}
