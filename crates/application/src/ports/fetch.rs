//! Fetch collaborator port

use std::future::Future;

use thiserror::Error;

use quiver_domain::{Request, ResponseDescriptor};

/// Errors from the fetch collaborator.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The exchange failed below the HTTP layer.
    #[error("network error: {0}")]
    Network(String),

    /// The exchange did not complete in time.
    #[error("request timed out")]
    Timeout,
}

/// Port for the external fetch-and-measure collaborator.
///
/// The core hands a request descriptor over and stores whatever
/// descriptor comes back; it never looks at wire-level framing.
pub trait Fetcher: Send + Sync {
    /// Executes the request and measures the exchange.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is invalid or the exchange fails;
    /// non-2xx statuses are NOT errors, they come back as a descriptor
    /// with `ok == false`.
    fn fetch(
        &self,
        request: &Request,
    ) -> impl Future<Output = Result<ResponseDescriptor, FetchError>> + Send;
}
