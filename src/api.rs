// API client module: a small blocking HTTP client for the gopher-notes
// service. Every remote operation is one request/response round trip that
// goes through `ApiClient::execute`, which owns the bearer header, the
// per-call timeout and the classification of non-success responses.
//
// The typed operations live in the submodules:
// - `auth`: login, me, logout
// - `notes`: list, create, get, delete

use reqwest::blocking::Client;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

mod auth;
mod notes;

pub use auth::{LoginRequest, LoginResponse, MeResponse};
pub use notes::{check_note_id, CreateNoteRequest, CreateNoteResponse, Note, NotesListResponse};

/// Base URL used when neither `--base-url` nor `GNOTES_BASE_URL` is set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Upper bound for a single request at the transport level.
pub const TRANSPORT_TIMEOUT: Duration = Duration::from_secs(10);

/// Deadline the dispatcher gives each command's API call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

pub type Result<T> = std::result::Result<T, ClientError>;

/// Everything that can go wrong while talking to the server.
#[derive(Error, Debug)]
pub enum ClientError {
    /// No response was received (connection refused, DNS, timeout...).
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The call context ran out of time before the request was sent.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The server answered with a status the operation does not accept.
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    /// A success response whose body is not the expected JSON.
    #[error("response decode failure")]
    Decode(#[source] serde_json::Error),

    /// A success response that parsed but failed its sanity check.
    #[error("{0}")]
    UnexpectedResponse(&'static str),

    /// Rejected before any request was made.
    #[error("invalid id")]
    InvalidId(i64),
}

impl ClientError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::DeadlineExceeded)
    }

    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::UnexpectedResponse(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidId(_))
    }

    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Error body the server sends with failure statuses. The field may be
/// missing entirely, which is kept distinct from an empty string.
#[derive(Deserialize, Debug, Default)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    /// Best-effort parse: a body that is not valid JSON yields no message.
    pub fn parse(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// The server message if present and non-empty, otherwise one built
    /// from the status line.
    pub fn into_message(self, status: StatusCode) -> String {
        match self.error {
            Some(msg) if !msg.is_empty() => msg,
            _ => format!("unexpected status: {}", status),
        }
    }
}

/// Deadline bound to a single API call.
#[derive(Debug, Clone, Copy)]
pub struct CallContext {
    deadline: Instant,
}

impl CallContext {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
        }
    }

    /// Time left before the deadline, `None` once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .checked_duration_since(Instant::now())
            .filter(|d| !d.is_zero())
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_CALL_TIMEOUT)
    }
}

/// Stateless request factory bound to a base URL. Holds only the reqwest
/// blocking client, so one instance is built per command invocation.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url`; trailing slashes are dropped.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(TRANSPORT_TIMEOUT).build()?;
        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one request and return the fully read body when the status is
    /// one of `accepted`. Any other status becomes `ClientError::Api`.
    ///
    /// The body is always read to the end before returning, on success and
    /// failure alike, so the connection can go back to the pool.
    fn execute<B: Serialize + ?Sized>(
        &self,
        ctx: &CallContext,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
        accepted: &[StatusCode],
    ) -> Result<Vec<u8>> {
        let timeout = ctx
            .remaining()
            .ok_or(ClientError::DeadlineExceeded)?
            .min(TRANSPORT_TIMEOUT);

        let url = self.url(path);
        debug!(%method, %url, "sending request");

        let mut req = self.client.request(method, &url).timeout(timeout);
        if let Some(t) = token {
            req = req.bearer_auth(t);
        }
        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send()?;
        let status = res.status();
        let bytes = res.bytes()?;
        debug!(%status, len = bytes.len(), "received response");

        if accepted.contains(&status) {
            return Ok(bytes.to_vec());
        }

        let message = ApiErrorBody::parse(&bytes).into_message(status);
        debug!(%status, %message, "request rejected");
        Err(ClientError::Api { status, message })
    }

    /// `execute` followed by decoding the success body as `T`.
    fn execute_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
        accepted: &[StatusCode],
    ) -> Result<T> {
        let bytes = self.execute(ctx, method, path, token, body, accepted)?;
        serde_json::from_slice(&bytes).map_err(ClientError::Decode)
    }
}

/// Placeholder body type for requests that send none.
pub(crate) type NoBody = ();

/// Field deserializer that reads JSON `null` as the type's default, the way
/// the server's zero values come across (e.g. `{"notes":null}`).
pub(crate) fn null_as_default<'de, D, T>(d: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped() {
        let api = ApiClient::new("http://example.test//").unwrap();
        assert_eq!(api.base_url(), "http://example.test");
        assert_eq!(api.url("/notes"), "http://example.test/notes");
    }

    #[test]
    fn error_body_message_wins_when_present() {
        let body = ApiErrorBody::parse(br#"{"error":"not found"}"#);
        assert_eq!(body.into_message(StatusCode::NOT_FOUND), "not found");
    }

    #[test]
    fn missing_or_empty_error_field_falls_back_to_status() {
        for raw in [&b""[..], b"{}", br#"{"error":""}"#, b"<html>oops</html>"] {
            let msg = ApiErrorBody::parse(raw).into_message(StatusCode::UNAUTHORIZED);
            assert_eq!(msg, "unexpected status: 401 Unauthorized");
        }
    }

    #[test]
    fn absent_and_empty_messages_are_distinguished() {
        assert_eq!(ApiErrorBody::parse(b"{}").error, None);
        assert_eq!(
            ApiErrorBody::parse(br#"{"error":""}"#).error,
            Some(String::new())
        );
    }

    #[test]
    fn expired_context_has_no_remaining_time() {
        let ctx = CallContext::with_timeout(Duration::ZERO);
        assert!(ctx.remaining().is_none());
        assert!(CallContext::default().remaining().is_some());
    }

    #[test]
    fn expired_context_fails_without_network() {
        // Nothing listens on port 9; the deadline check must fire first.
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        let ctx = CallContext::with_timeout(Duration::ZERO);
        let err = api
            .execute::<NoBody>(&ctx, Method::GET, "/me", None, None, &[StatusCode::OK])
            .unwrap_err();
        assert!(matches!(err, ClientError::DeadlineExceeded));
        assert!(err.is_transport());
    }
}
