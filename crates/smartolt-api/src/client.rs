// SmartOLT API client
//
// One generic dispatch path serves every endpoint: send the prepared request
// through the transport, classify the response by status, then decode either
// the expected payload or the service's error body. Endpoint methods live in
// `onu.rs` and `system.rs` as inherent impls on the same type.

use secrecy::SecretString;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::ErrorBody;
use crate::transport::{
    ApiRequest, HttpTransport, RawResponse, TokenTransport, Transport, TransportConfig,
};

/// Everything needed to talk to one SmartOLT account.
///
/// Built once by the caller and handed to [`SmartOltClient::new`]; the
/// client keeps no other state.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `https://acme.smartolt.com/api`.
    pub base_url: Url,
    /// Account token, sent as `X-Token`.
    pub token: SecretString,
    pub transport: TransportConfig,
}

impl ClientConfig {
    pub fn new(base_url: Url, token: SecretString) -> Self {
        Self {
            base_url,
            token,
            transport: TransportConfig::default(),
        }
    }
}

/// Async client for the SmartOLT API.
///
/// Generic over the [`Transport`] so the HTTP layer can be swapped; the
/// default is reqwest wrapped in the token decorator. Safe to share across
/// tasks when the transport is.
#[derive(Debug, Clone)]
pub struct SmartOltClient<T = TokenTransport<HttpTransport>> {
    transport: T,
    base_url: Url,
}

impl SmartOltClient {
    /// Build the standard reqwest-backed client with token injection.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let http = HttpTransport::new(&config.transport)?;
        let transport = TokenTransport::new(http, &config.token)?;
        Ok(Self::with_transport(config.base_url.clone(), transport))
    }
}

impl<T: Transport> SmartOltClient<T> {
    /// Use a caller-supplied transport. The caller is responsible for
    /// authentication (wrap it in [`TokenTransport`] if needed).
    pub fn with_transport(base_url: Url, transport: T) -> Self {
        Self {
            transport,
            base_url,
        }
    }

    /// The API root all paths are appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build `{base}{path}/{segment}...`.
    ///
    /// Segments are percent-encoded, so an id containing `/` or `?` stays a
    /// single path segment.
    pub(crate) fn endpoint(&self, path: &str, segments: &[&str]) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{path}"))?;
        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
                .pop_if_empty()
                .extend(segments);
        }
        Ok(url)
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Send a request and decode a 2xx body into `R`.
    pub async fn execute<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, Error> {
        let resp = self.dispatch(request).await?;
        decode_body(&resp)
    }

    /// Send a request whose success carries no payload. The body of a
    /// 2xx response is not inspected.
    pub async fn execute_action(&self, request: ApiRequest) -> Result<(), Error> {
        self.dispatch(request).await.map(|_| ())
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<RawResponse, Error> {
        debug!("{} {}", request.method, request.url);

        let resp = self.transport.send(request).await?;
        if resp.status.is_success() {
            Ok(resp)
        } else {
            debug!(status = resp.status.as_u16(), "request rejected");
            Err(remote_error(&resp))
        }
    }
}

// ── Response classification ──────────────────────────────────────────

/// Turn a non-2xx response into an error, preferring the service's own
/// message and falling back to the bare status code.
fn remote_error(resp: &RawResponse) -> Error {
    let status = resp.status.as_u16();
    match serde_json::from_slice::<ErrorBody>(&resp.body) {
        Ok(body) => Error::Api {
            status,
            message: body.error,
        },
        Err(_) => Error::Status { status },
    }
}

fn decode_body<R: DeserializeOwned>(resp: &RawResponse) -> Result<R, Error> {
    serde_json::from_slice(&resp.body).map_err(|e| {
        let body = String::from_utf8_lossy(&resp.body).into_owned();
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::Mutex;

    use bytes::Bytes;
    use reqwest::StatusCode;
    use serde::Deserialize;

    use super::*;

    /// Replies with a canned response and remembers what it was sent.
    struct Canned {
        reply: Mutex<Option<Result<RawResponse, Error>>>,
        seen: Mutex<Vec<ApiRequest>>,
    }

    impl Canned {
        fn respond(status: u16, body: &'static str) -> Self {
            Self::with(Ok(RawResponse {
                status: StatusCode::from_u16(status).unwrap(),
                body: Bytes::from_static(body.as_bytes()),
            }))
        }

        fn with(reply: Result<RawResponse, Error>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for Canned {
        async fn send(&self, request: ApiRequest) -> Result<RawResponse, Error> {
            self.seen.lock().unwrap().push(request);
            self.reply.lock().unwrap().take().unwrap()
        }
    }

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    fn client(transport: Canned) -> SmartOltClient<Canned> {
        let base = Url::parse("https://acme.smartolt.com/api").unwrap();
        SmartOltClient::with_transport(base, transport)
    }

    fn request(c: &SmartOltClient<Canned>) -> ApiRequest {
        ApiRequest::get(c.endpoint("/system/get_odbs", &[]).unwrap())
    }

    #[tokio::test]
    async fn success_decodes_payload() {
        let c = client(Canned::respond(200, r#"{"name":"odb-1"}"#));

        let payload: Payload = c.execute(request(&c)).await.unwrap();

        assert_eq!(payload.name, "odb-1");
        let seen = c.transport().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0].url.as_str(),
            "https://acme.smartolt.com/api/system/get_odbs"
        );
    }

    #[tokio::test]
    async fn action_ignores_success_body() {
        let c = client(Canned::respond(204, "not json at all"));

        c.execute_action(request(&c)).await.unwrap();
    }

    #[tokio::test]
    async fn structured_error_surfaces_message() {
        let c = client(Canned::respond(
            422,
            r#"{"status":"error","error":"Invalid parameters: No such Download speed profile exists"}"#,
        ));

        let err = c.execute_action(request(&c)).await.unwrap_err();

        assert!(matches!(err, Error::Api { status: 422, .. }));
        assert_eq!(
            err.to_string(),
            "Invalid parameters: No such Download speed profile exists"
        );
    }

    #[tokio::test]
    async fn opaque_error_falls_back_to_status() {
        let c = client(Canned::respond(500, "<html>Internal Server Error</html>"));

        let err = c.execute::<Payload>(request(&c)).await.unwrap_err();

        assert!(matches!(err, Error::Status { status: 500 }));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn error_body_without_message_falls_back_to_status() {
        let c = client(Canned::respond(400, r#"{"status":false}"#));

        let err = c.execute_action(request(&c)).await.unwrap_err();

        assert!(matches!(err, Error::Status { status: 400 }));
    }

    #[tokio::test]
    async fn mismatched_success_body_is_decode_error() {
        let c = client(Canned::respond(200, r#"{"unexpected":true}"#));

        let err = c.execute::<Payload>(request(&c)).await.unwrap_err();

        match err {
            Error::Deserialization { body, .. } => assert_eq!(body, r#"{"unexpected":true}"#),
            other => panic!("expected Deserialization, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_is_propagated() {
        let c = client(Canned::with(Err(Error::Transport(
            "connection refused".into(),
        ))));

        let err = c.execute::<Payload>(request(&c)).await.unwrap_err();

        assert!(err.is_transport());
    }

    #[test]
    fn endpoint_joins_base_path_and_encodes_segments() {
        let c = client(Canned::respond(200, "{}"));

        let plain = c.endpoint("/onu/reboot", &["HWTCAD08F2AA"]).unwrap();
        let odd = c.endpoint("/onu/reboot", &["a/b?c"]).unwrap();

        assert_eq!(
            plain.as_str(),
            "https://acme.smartolt.com/api/onu/reboot/HWTCAD08F2AA"
        );
        assert_eq!(
            odd.as_str(),
            "https://acme.smartolt.com/api/onu/reboot/a%2Fb%3Fc"
        );
    }

    #[test]
    fn endpoint_tolerates_trailing_slash_on_base() {
        let base = Url::parse("https://acme.smartolt.com/api/").unwrap();
        let c = SmartOltClient::with_transport(base, Canned::respond(200, "{}"));

        let url = c.endpoint("/system/get_speed_profiles", &[]).unwrap();

        assert_eq!(c.base_url().path(), "/api/");
        assert_eq!(
            url.as_str(),
            "https://acme.smartolt.com/api/system/get_speed_profiles"
        );
    }
}
