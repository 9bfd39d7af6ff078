//! Fetch-and-measure collaborator over reqwest.

use std::time::Instant;

use reqwest::Client;

use quiver_application::ports::{FetchError, Fetcher};
use quiver_domain::{Method, Request, ResponseDescriptor};

/// `Fetcher` implementation wrapping a [`reqwest::Client`].
///
/// Builds the outgoing call from the request descriptor (active params
/// as query pairs, active headers, body with its declared content
/// type), measures the wall-clock time of the whole exchange, and
/// captures the response as bytes, text and, for JSON responses, a
/// parsed value.
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Creates a fetcher with default client settings.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying client cannot be built.
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("Quiver/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| FetchError::Network(error.to_string()))?;
        Ok(Self { client })
    }

    /// Creates a fetcher around an existing client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, request: &Request) -> Result<ResponseDescriptor, FetchError> {
        let url = request
            .parse_url()
            .map_err(|error| FetchError::InvalidUrl(format!("{error}: {}", request.url)))?;

        let mut builder = self.client.request(to_http_method(request.method)?, url);

        let params: Vec<(&str, &str)> = request
            .active_params()
            .map(|param| (param.key.as_str(), param.value.as_str()))
            .collect();
        if !params.is_empty() {
            builder = builder.query(&params);
        }

        for header in request.active_headers() {
            builder = builder.header(header.key.as_str(), header.value.as_str());
        }

        if let Some(content) = &request.body.body {
            if let Some(content_type) = request.body.content_type {
                if !has_content_type_override(request) {
                    builder = builder.header("Content-Type", content_type.as_str());
                }
            }
            builder = builder.body(content.clone());
        }

        let started = Instant::now();
        let response = builder.send().await.map_err(map_error)?;
        let status = response.status();

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let bytes = response.bytes().await.map_err(map_error)?;
        let time_ms = started.elapsed().as_secs_f64() * 1000.0;

        let raw = String::from_utf8_lossy(&bytes).into_owned();
        let json = sniff_json(&headers, &bytes);

        Ok(ResponseDescriptor {
            ok: status.is_success(),
            status: status.as_u16(),
            headers,
            body: bytes.to_vec(),
            raw,
            json,
            time_ms,
        })
    }
}

/// Converts the domain method to a reqwest method.
fn to_http_method(method: Method) -> Result<reqwest::Method, FetchError> {
    match method {
        Method::Get => Ok(reqwest::Method::GET),
        Method::Post => Ok(reqwest::Method::POST),
        Method::Put => Ok(reqwest::Method::PUT),
        Method::Patch => Ok(reqwest::Method::PATCH),
        Method::Delete => Ok(reqwest::Method::DELETE),
        Method::Head => Ok(reqwest::Method::HEAD),
        Method::Options => Ok(reqwest::Method::OPTIONS),
        Method::Connect => Ok(reqwest::Method::CONNECT),
        Method::Trace => Ok(reqwest::Method::TRACE),
        Method::Custom => reqwest::Method::from_bytes(Method::Custom.as_str().as_bytes())
            .map_err(|error| FetchError::Network(error.to_string())),
    }
}

/// Whether an active header claims `Content-Type` for itself.
fn has_content_type_override(request: &Request) -> bool {
    request
        .active_headers()
        .any(|header| header.overwrite && header.key.eq_ignore_ascii_case("content-type"))
}

/// Parses the body as JSON when the response declares a JSON type.
fn sniff_json(headers: &[(String, String)], bytes: &[u8]) -> Option<serde_json::Value> {
    let declares_json = headers.iter().any(|(name, value)| {
        name.eq_ignore_ascii_case("content-type") && value.contains("application/json")
    });
    if declares_json {
        serde_json::from_slice(bytes).ok()
    } else {
        None
    }
}

fn map_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(error.to_string())
    }
}
