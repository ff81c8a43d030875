use thiserror::Error;

/// Boxed source error carried by [`Error::Transport`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error type for the `smartolt-api` crate.
///
/// Every remote call resolves to a decoded payload or exactly one of these.
/// The four dispatch kinds are kept apart so callers can tell a network
/// failure from a rejected request from a payload that changed shape:
///
/// - [`Transport`](Self::Transport): the request never produced a response
/// - [`Api`](Self::Api): non-2xx with a structured `{"error": "..."}` body
/// - [`Status`](Self::Status): non-2xx with a body we could not decode
/// - [`Deserialization`](Self::Deserialization): 2xx with an unexpected body
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// Connection refused, DNS failure, timeout, or an unreadable body.
    #[error("HTTP transport error: {0}")]
    Transport(#[source] BoxError),

    /// URL parsing error (bad base URL or path join).
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured token cannot be sent as a header value.
    #[error("Invalid API token: {0}")]
    InvalidToken(String),

    /// TLS setup or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Remote ──────────────────────────────────────────────────────
    /// Structured error reported by the service. Displays the message verbatim.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Non-2xx response whose body is not a structured error.
    #[error("request failed with HTTP status {status}")]
    Status { status: u16 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization of a 2xx body failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

impl Error {
    /// The HTTP status the service answered with, for remote errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Status { status } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the request never got a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if the transport gave up waiting for the service.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(source) => source
                .downcast_ref::<reqwest::Error>()
                .is_some_and(reqwest::Error::is_timeout),
            _ => false,
        }
    }

    /// Returns `true` if the service answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the service rejected the token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}
