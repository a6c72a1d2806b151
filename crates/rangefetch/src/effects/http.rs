use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

use crate::data::ContentMetadata;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Response body of a ranged GET.
pub type BodyStream<E> = BoxStream<'static, std::result::Result<Bytes, E>>;

/// Status and headers of a metadata (HEAD) request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeadResponse {
    pub status:         u16,
    /// Value of the `Content-Length` header, if present and numeric.
    pub content_length: Option<u64>,
    pub accept_ranges:  Option<String>,
    pub etag:           Option<String>,
}

impl HeadResponse {
    pub fn metadata(&self) -> ContentMetadata {
        ContentMetadata {
            length:         self.content_length,
            accepts_ranges: crate::core::accepts_byte_ranges(self.accept_ranges.as_deref()),
            change_token:   crate::core::normalize_change_token(self.etag.as_deref()),
        }
    }
}

/// Status and streaming body of a ranged GET.
pub struct GetResponse<E> {
    pub status: u16,
    pub body:   BodyStream<E>,
}

/// Asynchronous HTTP client abstraction.
///
/// This is the minimal surface the fetcher needs: a metadata request and a
/// `Range`-qualified GET. Implementations handle redirects, timeouts and
/// connection reuse themselves; a non-2xx status must be returned, not
/// turned into an error, so the fetcher can report it.
///
/// # Implementations
///
/// - [`ReqwestClient`]: production implementation using `reqwest`
/// - in-memory mocks for testing
pub trait HttpClient: Send + Sync + 'static {
    /// Transport error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Issue a HEAD request for `url`.
    fn head(
        &self,
        url: &str,
    ) -> impl Future<Output = std::result::Result<HeadResponse, Self::Error>> + Send;

    /// Issue a GET for `url` with the given `Range` header value
    /// (`bytes=<start>-<end>` or `bytes=<start>-`).
    fn get(
        &self,
        url: &str,
        range: &str,
    ) -> impl Future<Output = std::result::Result<GetResponse<Self::Error>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::time::Duration;

    use reqwest::header::{self, HeaderMap, HeaderName};

    use super::*;
    use crate::error::{FetchError, Result};

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        pub fn new() -> Result<Self> { Self::with_timeout(None) }

        /// `timeout` bounds each request from connect to the end of the body.
        pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
            let mut builder = reqwest::Client::builder();
            if let Some(timeout) = timeout {
                builder = builder.timeout(timeout);
            }
            let client = builder.build().map_err(|e| {
                FetchError::InvalidConfiguration(format!("failed to create HTTP client: {e}"))
            })?;
            Ok(Self { client })
        }

        /// Wrap an already configured client.
        pub fn from_client(client: reqwest::Client) -> Self { Self { client } }
    }

    fn header_str(headers: &HeaderMap, name: HeaderName) -> Option<String> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn head(&self, url: &str) -> std::result::Result<HeadResponse, Self::Error> {
            let response = self.client.head(url).send().await?;
            let headers = response.headers();

            // The body size hint of a HEAD response is always zero, so the
            // header has to be read directly.
            Ok(HeadResponse {
                status:         response.status().as_u16(),
                content_length: header_str(headers, header::CONTENT_LENGTH)
                    .and_then(|v| v.trim().parse().ok()),
                accept_ranges:  header_str(headers, header::ACCEPT_RANGES),
                etag:           header_str(headers, header::ETAG),
            })
        }

        async fn get(
            &self,
            url: &str,
            range: &str,
        ) -> std::result::Result<GetResponse<Self::Error>, Self::Error> {
            let response = self
                .client
                .get(url)
                .header(header::RANGE, range)
                .send()
                .await?;

            Ok(GetResponse {
                status: response.status().as_u16(),
                body:   Box::pin(response.bytes_stream()),
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
