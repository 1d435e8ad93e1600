//! Auth API: login, one-time codes, identity lookup, logout
//!
//! A token returned by login or verification is held pending until the
//! identity lookup confirms the privileged role. Only then is it written to
//! the session, so a rejected token is never visible to other requests.

use crate::error::ClientResult;
use crate::extract::extract_payload;
use crate::http::{Body, HttpClient, RequestDescriptor, RequestOptions};
use http::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::client::{AuthResponse, Identity, LoginRequest, ResendOtpRequest, VerifyOtpRequest};
use shared::error::{ApiError, ErrorCode};

const LOGIN_PATH: &str = "/auth/login";
const VERIFY_OTP_PATH: &str = "/auth/verify-otp";
const RESEND_OTP_PATH: &str = "/auth/resend-otp";
const ME_PATH: &str = "/auth/me";
const LOGOUT_PATH: &str = "/auth/logout";

/// Fields that mark the auth payload inside an envelope
const AUTH_FIELDS: &[&str] = &["token", "otpRequired"];

/// Fields that mark the identity inside an envelope
const IDENTITY_FIELDS: &[&str] = &["role"];

/// Result of a login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// A one-time code was sent; finish with [`HttpClient::verify_otp`]
    OtpRequired { message: Option<String> },
    /// Credential confirmed and stored
    SignedIn(Identity),
}

impl HttpClient {
    /// Login with email and password
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginOutcome> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let (status, resp): (u16, AuthResponse) = self.auth_call(LOGIN_PATH, &request).await?;

        match resp.token {
            Some(token) => {
                let identity = self.commit_token(token).await?;
                Ok(LoginOutcome::SignedIn(identity))
            }
            None if resp.otp_required => {
                tracing::info!("Login requires a one-time code");
                Ok(LoginOutcome::OtpRequired {
                    message: resp.message,
                })
            }
            None => Err(ApiError::invalid_response(status, "Missing token in login response")),
        }
    }

    /// Verify a one-time code and sign in
    pub async fn verify_otp(&self, email: &str, code: &str) -> ClientResult<Identity> {
        let request = VerifyOtpRequest {
            email: email.to_string(),
            code: code.trim().to_string(),
        };
        let (status, resp): (u16, AuthResponse) = self.auth_call(VERIFY_OTP_PATH, &request).await?;
        let token = resp
            .token
            .ok_or_else(|| ApiError::invalid_response(status, "Missing token in verification response"))?;
        self.commit_token(token).await
    }

    /// Ask the backend to send a fresh one-time code
    pub async fn resend_otp(&self, email: &str) -> ClientResult<()> {
        let request = ResendOtpRequest {
            email: email.to_string(),
        };
        let _: serde_json::Value = self.post_json(RESEND_OTP_PATH, &request).await?;
        Ok(())
    }

    /// Get the identity behind the stored credential
    pub async fn me(&self) -> ClientResult<Identity> {
        self.identity_lookup(RequestOptions::new()).await
    }

    /// Identity lookup with an explicit token instead of the stored one
    async fn me_with_token(&self, token: &str) -> ClientResult<Identity> {
        let options = RequestOptions::new().with_header("authorization", &format!("Bearer {token}"));
        self.identity_lookup(options).await
    }

    async fn identity_lookup(&self, options: RequestOptions) -> ClientResult<Identity> {
        let request = RequestDescriptor::new(Method::GET, ME_PATH).options(options);
        let (status, body) = self.execute(request).await?;
        decode_payload(ME_PATH, status.as_u16(), &body, IDENTITY_FIELDS)
    }

    /// POST an auth request and unwrap its payload, keeping the status
    async fn auth_call<B: Serialize + ?Sized>(
        &self,
        path: &str,
        request: &B,
    ) -> ClientResult<(u16, AuthResponse)> {
        let descriptor = RequestDescriptor::new(Method::POST, path).body(Body::json(request)?);
        let (status, body) = self.execute(descriptor).await?;
        let status = status.as_u16();
        Ok((status, decode_payload(path, status, &body, AUTH_FIELDS)?))
    }

    /// Confirm a pending token's role, then store it
    async fn commit_token(&self, token: String) -> ClientResult<Identity> {
        let identity = self.me_with_token(&token).await?;
        if !identity.is_privileged() {
            tracing::warn!(user_id = %identity.id, role = %identity.role, "Login rejected: role is not privileged");
            return Err(ApiError::from_code(ErrorCode::AdminRequired, 403));
        }

        self.session().set_credential(&token)?;
        tracing::info!(user_id = %identity.id, "Signed in");
        Ok(identity)
    }

    /// Logout
    ///
    /// The server call is best-effort; the stored credential is cleared
    /// regardless of its outcome.
    pub async fn logout(&self) {
        if self.session().has_credential()
            && let Err(e) = self.post(LOGOUT_PATH, None, RequestOptions::new()).await
        {
            tracing::warn!(code = %e.code, status = e.status, "Logout request failed; clearing credential anyway");
        }

        if let Err(e) = self.session().clear_credential() {
            tracing::warn!(error = %e, "Failed to clear stored credential");
        }
        tracing::info!("Signed out");
    }
}

/// Deserialize the payload inside an envelope into `T`
fn decode_payload<T: DeserializeOwned>(
    path: &str,
    status: u16,
    body: &serde_json::Value,
    fields: &[&str],
) -> ClientResult<T> {
    T::deserialize(extract_payload(body, fields)).map_err(|e| {
        tracing::warn!(path = %path, error = %e, "Unexpected response shape");
        ApiError::invalid_response(status, format!("Unexpected response from {path}: {e}"))
    })
}
