// Session endpoints: exchange credentials for a token, inspect the current
// user and revoke the token.

use super::{null_as_default, ApiClient, CallContext, ClientError, NoBody, Result};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

/// Login request payload. Credentials are never stored.
#[derive(Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login. `expires_at` is passed through as the server formats it.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub token: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expires_at: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MeResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

impl ApiClient {
    /// POST /login. A 200 without a token is treated as a broken response.
    pub fn login(&self, ctx: &CallContext, req: &LoginRequest) -> Result<LoginResponse> {
        let out: LoginResponse = self.execute_json(
            ctx,
            Method::POST,
            "/login",
            None,
            Some(req),
            &[StatusCode::OK],
        )?;
        if out.token.is_empty() {
            return Err(ClientError::UnexpectedResponse("empty token in response"));
        }
        Ok(out)
    }

    /// GET /me. Both `id` and `email` must be filled in.
    pub fn me(&self, ctx: &CallContext, token: &str) -> Result<MeResponse> {
        let out: MeResponse = self.execute_json(
            ctx,
            Method::GET,
            "/me",
            Some(token),
            None::<&NoBody>,
            &[StatusCode::OK],
        )?;
        if out.id == 0 || out.email.is_empty() {
            return Err(ClientError::UnexpectedResponse("unexpected me response"));
        }
        Ok(out)
    }

    /// POST /logout, expecting 204 No Content.
    pub fn logout(&self, ctx: &CallContext, token: &str) -> Result<()> {
        self.execute(
            ctx,
            Method::POST,
            "/logout",
            Some(token),
            None::<&NoBody>,
            &[StatusCode::NO_CONTENT],
        )?;
        Ok(())
    }
}
