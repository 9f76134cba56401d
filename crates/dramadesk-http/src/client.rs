//! HTTP client shared by the REST and PostgREST bindings.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use dramadesk_core::Result;
use dramadesk_core::error::{Error, InvalidInputError, TransportError};
use dramadesk_core::types::BackendUrl;

use crate::endpoints::ErrorBody;

/// Map a reqwest failure into the transport taxonomy.
pub(crate) fn transport(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Transport(TransportError::Timeout)
    } else if err.is_connect() {
        Error::Transport(TransportError::Connection {
            message: err.to_string(),
        })
    } else {
        Error::Transport(TransportError::Http {
            message: err.to_string(),
        })
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| {
        InvalidInputError::Other {
            message: format!("{} contains characters not allowed in a header", name),
        }
        .into()
    })
}

/// HTTP client bound to one backend base URL.
///
/// Credentials are installed as default headers at construction, so every
/// request carries them.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base: BackendUrl,
}

impl ApiClient {
    /// Client for a REST service, with an optional bearer token.
    pub fn new(base: BackendUrl, token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                header_value("token", &format!("Bearer {}", token))?,
            );
        }
        Self::build(base, headers)
    }

    /// Client for a PostgREST endpoint authenticated by a project key.
    ///
    /// The key is sent both as `apikey` and as the bearer token.
    pub fn postgrest(base: BackendUrl, key: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = key {
            headers.insert(HeaderName::from_static("apikey"), header_value("key", key)?);
            headers.insert(
                AUTHORIZATION,
                header_value("key", &format!("Bearer {}", key))?,
            );
        }
        Self::build(base, headers)
    }

    fn build(base: BackendUrl, headers: HeaderMap) -> Result<Self> {
        if !base.is_network() {
            return Err(InvalidInputError::BackendUrl {
                value: base.to_string(),
                reason: "an HTTP backend requires an http(s):// URL".to_string(),
            }
            .into());
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("dramadesk/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(transport)?;

        Ok(Self { client, base })
    }

    /// Returns the base URL this client is configured for.
    pub fn base(&self) -> &BackendUrl {
        &self.base
    }

    /// Absolute URL for a path under the base.
    pub fn url(&self, path: &str) -> String {
        self.base.join(path)
    }

    pub(crate) fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Send a request and decode its JSON body.
    ///
    /// An empty success body decodes to `null`. Any non-success status is a
    /// [`BackendError`] carrying the status and the decoded error body.
    #[instrument(skip(self, request), fields(base = %self.base))]
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        trace!(status = %status, "HTTP response");

        let bytes = response.bytes().await.map_err(transport)?;
        if !status.is_success() {
            let error = ErrorBody::into_backend_error(status.as_u16(), &bytes);
            debug!(%error, "Backend returned an error");
            return Err(error.into());
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}
