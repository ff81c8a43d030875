// Request transport for the SmartOLT API.
//
// The dispatch core only needs "send this request, hand me the status and
// the raw body". `Transport` is that capability; `HttpTransport` provides it
// over reqwest and `TokenTransport` wraps any transport to stamp the shared
// secret header on every request.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::trace;
use url::Url;

use crate::error::Error;

/// Header carrying the account token on every request.
pub const TOKEN_HEADER: &str = "X-Token";

// ── Request / response ──────────────────────────────────────────────

/// Named string fields sent as the body of mutation calls.
///
/// Field order is preserved on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBody {
    fields: Vec<(String, String)>,
}

impl FormBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Append a field only when a value is present.
    pub fn optional_field(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.field(name, value),
            None => self,
        }
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Look up the first value sent under `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn into_multipart(self) -> reqwest::multipart::Form {
        self.fields
            .into_iter()
            .fold(reqwest::multipart::Form::new(), |form, (name, value)| {
                form.text(name, value)
            })
    }
}

/// A fully prepared request: verb, absolute URL, extra headers, optional form.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub form: Option<FormBody>,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            form: None,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    /// Attach a form body.
    pub fn with_form(mut self, form: FormBody) -> Self {
        self.form = Some(form);
        self
    }
}

/// Status code and undecoded payload of a completed round trip.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

// ── Capability ──────────────────────────────────────────────────────

/// Something that can perform one request/response round trip.
///
/// Implementations must map every failure to reach the service (or to read
/// its reply) to [`Error::Transport`]. Non-2xx answers are *not* failures at
/// this layer; they are returned as a [`RawResponse`] for the dispatcher to
/// classify.
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<RawResponse, Error>> + Send;
}

// ── reqwest transport ───────────────────────────────────────────────

/// TLS verification mode.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate.
    DangerAcceptInvalid,
}

/// Settings for building the underlying HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::System,
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("smartolt-rs/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

/// [`Transport`] over a `reqwest::Client`.
///
/// Form bodies go out as `multipart/form-data`, which is what the
/// service's mutation endpoints accept.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client()?,
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, Error> {
        let ApiRequest {
            method,
            url,
            headers,
            form,
        } = request;

        let mut builder = self.http.request(method, url).headers(headers);
        if let Some(form) = form {
            builder = builder.multipart(form.into_multipart());
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        trace!(%status, bytes = body.len(), "response received");

        Ok(RawResponse { status, body })
    }
}

// ── Token decorator ─────────────────────────────────────────────────

/// Wraps a [`Transport`] and adds the `X-Token` header to every request.
///
/// Any token already present on the request is replaced.
#[derive(Debug, Clone)]
pub struct TokenTransport<T> {
    inner: T,
    token: HeaderValue,
}

impl<T: Transport> TokenTransport<T> {
    pub fn new(inner: T, token: &SecretString) -> Result<Self, Error> {
        let mut token = HeaderValue::from_str(token.expose_secret())
            .map_err(|e| Error::InvalidToken(format!("invalid token header value: {e}")))?;
        token.set_sensitive(true);
        Ok(Self { inner, token })
    }

    /// The wrapped transport.
    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> Transport for TokenTransport<T> {
    async fn send(&self, mut request: ApiRequest) -> Result<RawResponse, Error> {
        request.headers.insert(TOKEN_HEADER, self.token.clone());
        self.inner.send(request).await
    }
}
