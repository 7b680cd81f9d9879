
use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

use base64::Engine;
use futures::future::BoxFuture;
use log::{debug, warn};
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use url::Url;

use crate::models::error::ApiError;
use crate::types::{Error, Result};

/// Base address of the JSON api
pub const API_BASE_URL: &str = "https://codequiry.com/api/v1/";
/// Address files are uploaded to
pub const API_UPLOAD_URL: &str = "https://codequiry.com/api/v1/check/upload";
/// Base address of the job status channel
pub const SOCKETS_BASE_URL: &str = "https://api.codequiry.com/";

const APIKEY_HEADER: &str = "apikey";
const JSON_CONTENT_TYPE: &str = "application/json";
/// Engine.IO protocol revision spoken on the status channel
const ENGINE_IO_VERSION: &str = "3";

/// Matches the whole of an error body, whatever request produced it
static ERROR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\{"error"\s*:\s*"(?P<msg>.*)"\}$"#).expect("Error body regex could not compile")
});

/// Settings used to build a connection
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base address relative api paths are resolved against
    pub api_base: String,
    /// Full address of the upload endpoint
    pub upload_url: String,
    /// Base address of the job status channel
    pub socket_base: String,
    /// Per request timeout in seconds, transport default when unset
    pub timeout: Option<f64>,
    /// Verify server certificates
    pub verify: bool,
    /// Extra root certificate, PEM text or base64 encoded DER
    pub ca_cert: Option<String>,
    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: API_BASE_URL.to_owned(),
            upload_url: API_UPLOAD_URL.to_owned(),
            socket_base: SOCKETS_BASE_URL.to_owned(),
            timeout: None,
            verify: true,
            ca_cert: None,
            headers: Default::default(),
        }
    }
}

/// A connection abstraction to handle queries
pub struct Connection {
    client: reqwest::Client,
    api_base: String,
    upload_url: String,
    socket_base: Url,
    default_timeout: Option<Duration>,
}

impl Connection {
    /// Prepare a connection authenticated with the given api key
    pub fn new(api_key: &str, config: ClientConfig) -> Result<Self> {
        let mut builder = if config.verify {
            reqwest::Client::builder()
        } else {
            reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
        };

        // insert certificate
        if let Some(cert) = &config.ca_cert {
            let cert = cert.trim();
            let cert = if cert.contains("-----BEGIN ") {
                reqwest::Certificate::from_pem(cert.as_bytes())
            } else {
                match base64::prelude::BASE64_STANDARD.decode(cert) {
                    Ok(cert) => reqwest::Certificate::from_der(&cert),
                    Err(_) => return Err(Error::Configuration(format!("Couldn't understand the ca cert value: {cert}"))),
                }
            };
            let cert = cert.map_err(|err| Error::Configuration(format!("Couldn't load the ca cert: {err}")))?;
            builder = builder.add_root_certificate(cert);
        }

        // build headers
        let mut headers = HeaderMap::new();
        for (name, value) in config.headers.into_iter() {
            let name: HeaderName = name.parse()?;
            headers.insert(name, value.parse()?);
        }
        let mut key = HeaderValue::from_str(api_key)?;
        key.set_sensitive(true);
        headers.insert(HeaderName::from_static(APIKEY_HEADER), key);

        // finalize client
        let client = builder
            .default_headers(headers)
            .build()
            .map_err(|err| Error::Configuration(err.to_string()))?;

        let default_timeout = config.timeout.map(timeout_duration).transpose()?;

        Url::parse(&config.api_base)?;
        Url::parse(&config.upload_url)?;

        Ok(Connection {
            client,
            api_base: with_trailing_slash(config.api_base),
            upload_url: config.upload_url,
            socket_base: Url::parse(&with_trailing_slash(config.socket_base))?,
            default_timeout,
        })
    }

    /// Configured per request timeout
    pub fn timeout(&self) -> Option<Duration> {
        self.default_timeout
    }

    /// Full address of the upload endpoint
    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    /// Full urls are used as given, anything else is relative to the api base
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_owned()
        } else {
            format!("{}{}", self.api_base, path.trim_start_matches('/'))
        }
    }

    /// Websocket address of the job status channel
    pub fn socket_url(&self) -> Result<Url> {
        let mut url = self.socket_base.join("socket.io/")?;
        let scheme = match url.scheme() {
            "https" | "wss" => "wss",
            _ => "ws",
        };
        if url.set_scheme(scheme).is_err() {
            return Err(Error::Configuration(format!("Can't open a websocket to {}", self.socket_base)))
        }
        url.query_pairs_mut()
            .clear()
            .append_pair("EIO", ENGINE_IO_VERSION)
            .append_pair("transport", "websocket");
        Ok(url)
    }

    pub (crate) async fn post<Req, Resp, F>(&self, path: &str, body: Body<Req>, con: F) -> Result<Resp>
        where Req: serde::Serialize,
              F: Fn(reqwest::Response) -> BoxFuture<'static, Result<Resp>>
    {
        return con(self.request(reqwest::Method::POST, path, body, None).await?).await
    }

    /// Detailed method to make an http request
    pub (crate) async fn request<Req>(&self,
        method: reqwest::Method,
        path: &str,
        body: Body<Req>,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Response>
        where Req: serde::Serialize
    {
        // Apply default timeout parameter if not passed elsewhere
        let timeout = match timeout {
            Some(time) => Some(time),
            None => self.default_timeout,
        };

        let url = self.resolve_url(path);
        debug!("{method} {url}");
        let mut request = self.client.request(method, url);

        request = match body {
            Body::None => request.header(CONTENT_TYPE, JSON_CONTENT_TYPE),
            Body::Json(json) => request.json(&json),
            Body::Multipart(form) => request.multipart(form),
        };

        // set timeout
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        // a request that never reached the service is an error, not an empty result
        Ok(request.send().await?)
    }
}

/// Seconds from the configuration, rejecting values no timer can hold
fn timeout_duration(seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| Error::Configuration(format!("Invalid timeout: {seconds}")))
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Body of an outgoing request
pub (crate) enum Body<T: serde::Serialize> {
    /// Empty body, still advertised as json
    None,
    /// Serialized as a json document
    Json(T),
    /// Sent as multipart form data with its own content type
    Multipart(reqwest::multipart::Form),
}

/// A response body sorted into one of the two shapes the service uses
#[derive(Debug, PartialEq)]
pub enum ApiResponse<T> {
    /// The body held the expected document
    Success(T),
    /// The body was an error report
    Failure(ApiError),
}

impl<T> ApiResponse<T> {
    /// Turn an error report into an error
    pub fn into_result(self) -> Result<T> {
        match self {
            ApiResponse::Success(value) => Ok(value),
            ApiResponse::Failure(error) => Err(Error::Server(error)),
        }
    }
}

/// Sort a response body into a typed value or a service error.
///
/// The service answers errors with the same status as successes, so the error shape is
/// checked first on every body. Anything else must decode as `T`.
pub fn decode_response<T: DeserializeOwned>(body: &str) -> Result<ApiResponse<T>> {
    if let Some(captures) = ERROR_PATTERN.captures(body) {
        let message = captures.name("msg").map(|found| found.as_str()).unwrap_or_default();
        return Ok(ApiResponse::Failure(ApiError::new(message)))
    }

    match serde_json::from_str(body) {
        Ok(value) => Ok(ApiResponse::Success(value)),
        Err(err) => {
            warn!("Could not decode response body: {err}");
            Err(Error::Decode(err.to_string()))
        }
    }
}

pub fn convert_api_output_obj<T: DeserializeOwned + Send + 'static>(resp: reqwest::Response) -> BoxFuture<'static, Result<T>> {
    Box::pin(async move {
        let status = resp.status();
        let body = resp.text().await?;
        let decoded = decode_response::<T>(&body);

        if !status.is_success() {
            return match decoded {
                Ok(ApiResponse::Failure(error)) => Err(Error::Server(error)),
                _ => Err(Error::Status { status: status.as_u16(), body }),
            }
        }

        decoded?.into_result()
    })
}
