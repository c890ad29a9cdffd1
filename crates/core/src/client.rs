//! Shared HTTP plumbing for the registration backend.
//!
//! One `reqwest::Client` is built per process and shared by the duplicate checker and the
//! submitter. No request timeout is set; an in-flight request runs until the transport
//! gives up.

use crate::config::ClientConfig;
use crate::error::{RegistrationError, RegistrationResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Raw response from the backend: status plus undecoded body.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// HTTP client bound to one backend configuration.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl ApiClient {
    /// Build a client that sends and expects JSON.
    pub fn new(config: ClientConfig) -> RegistrationResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self::with_http_client(http, config))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_http_client(http: reqwest::Client, config: ClientConfig) -> Self {
        Self {
            http,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// POST a JSON body and collect the full response.
    ///
    /// Only transport failures are errors here; any HTTP status is returned to the caller.
    pub(crate) async fn post_json<B>(&self, url: &Url, body: &B) -> RegistrationResult<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        let response = self.http.post(url.clone()).json(body).send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(%url, status = status.as_u16(), bytes = body.len(), "backend responded");
        Ok(RawResponse { status, body })
    }
}

/// Decode a JSON body, reporting the path of the first field that does not match.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &[u8]) -> RegistrationResult<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(body);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let path = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        RegistrationError::MalformedResponse {
            path,
            reason: err.into_inner().to_string(),
        }
    })
}

/// Identifiers arrive as strings or numbers depending on the backend version.
pub(crate) fn id_from_value(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
