//! Login, logout, and password-reset endpoints.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use hadi_books_core::Email;

use super::{Ack, ApiError, BackendClient};
use crate::models::{AdminProfile, BearerToken};

const LOGIN_PATH: &str = "/api/user/admin";
const LOGOUT_PATH: &str = "/api/adminCtrl/logout";
const FORGOT_PASSWORD_PATH: &str = "/api/user/forgot-password";
const VERIFY_OTP_PATH: &str = "/api/user/verify-otp";
const RESET_PASSWORD_PATH: &str = "/api/user/reset-password";

/// Successful login payload.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: BearerToken,
    pub admin: AdminProfile,
}

impl BackendClient {
    /// Exchange admin credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` or `ApiError::Rejected` for bad
    /// credentials, `ApiError::Http` on network failures.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        let body = serde_json::json!({
            "email": email.as_str(),
            "password": password.expose_secret(),
        });
        let response: LoginResponse = self
            .send(self.request(Method::POST, LOGIN_PATH)?.json(&body))
            .await?;
        tracing::info!(admin_id = %response.admin.id, "Admin logged in");
        Ok(response)
    }

    /// Invalidate the token server-side.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend refuses or is unreachable.
    #[instrument(skip_all)]
    pub async fn logout(&self, token: &BearerToken) -> Result<Ack, ApiError> {
        self.send(
            self.authed(Method::POST, LOGOUT_PATH, token)?
                .json(&serde_json::json!({})),
        )
        .await
    }

    /// Ask the backend to mail an OTP to the recovery address.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the addresses are not recognized or the
    /// backend is unreachable.
    #[instrument(skip(self))]
    pub async fn forgot_password(
        &self,
        admin_email: &str,
        shared_email: &str,
    ) -> Result<Ack, ApiError> {
        let body = serde_json::json!({
            "adminEmail": admin_email,
            "sharedEmail": shared_email,
        });
        self.send(self.request(Method::POST, FORGOT_PASSWORD_PATH)?.json(&body))
            .await
    }

    /// Check an OTP against the one the backend mailed.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` for a wrong or expired OTP.
    #[instrument(skip(self, otp))]
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<Ack, ApiError> {
        let body = serde_json::json!({ "email": email, "otp": otp });
        self.send(self.request(Method::POST, VERIFY_OTP_PATH)?.json(&body))
            .await
    }

    /// Set a new password using a verified OTP.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` when the OTP is no longer valid.
    #[instrument(skip(self, otp, new_password))]
    pub async fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &SecretString,
    ) -> Result<Ack, ApiError> {
        let body = serde_json::json!({
            "email": email,
            "otp": otp,
            "newPassword": new_password.expose_secret(),
        });
        self.send(self.request(Method::POST, RESET_PASSWORD_PATH)?.json(&body))
            .await
    }
}
