//! The seam between a collection cycle and whatever transport delivers the
//! status document.

use crate::core::domain::error::CollectorResult;
use async_trait::async_trait;

/// Retrieves the raw status document of one cluster.
///
/// Implementations surface transport failures and non-2xx responses as
/// `CollectorError::Fetch`; a successful call always yields the complete body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusFetcher: Send + Sync {
    /// Fetches the response body of the status endpoint.
    async fn fetch_status(&self) -> CollectorResult<Vec<u8>>;

    /// A human-readable name of the target, used in logs.
    fn target(&self) -> String;
}
