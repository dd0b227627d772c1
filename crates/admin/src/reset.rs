//! Forgotten-password recovery.
//!
//! A linear three-step flow: the admin gives their admin address and the
//! recovery address, enters the six-digit OTP mailed to the recovery
//! address, then picks a new password. A step only advances once the
//! backend acknowledges it, after the success notice has been shown for
//! the notice delay. The only ways back are [`ResetFlow::resend`] and
//! [`ResetFlow::back`], which clear everything downstream.

use std::future::Future;
use std::time::Duration;

use secrecy::SecretString;
use tracing::instrument;

use hadi_books_core::Email;

use crate::api::{Ack, ApiError, BackendClient};
use crate::error::ConsoleError;
use crate::validation::{ValidationError, confirm_password};

/// Number of digits in an OTP.
pub const OTP_LENGTH: usize = 6;

/// The recovery endpoints.
pub trait ResetApi: Send + Sync {
    fn send_otp(
        &self,
        admin_email: &str,
        shared_email: &str,
    ) -> impl Future<Output = Result<Ack, ApiError>> + Send;

    fn verify_otp(&self, email: &str, otp: &str)
    -> impl Future<Output = Result<Ack, ApiError>> + Send;

    fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &SecretString,
    ) -> impl Future<Output = Result<Ack, ApiError>> + Send;
}

impl ResetApi for BackendClient {
    fn send_otp(
        &self,
        admin_email: &str,
        shared_email: &str,
    ) -> impl Future<Output = Result<Ack, ApiError>> + Send {
        self.forgot_password(admin_email, shared_email)
    }

    fn verify_otp(
        &self,
        email: &str,
        otp: &str,
    ) -> impl Future<Output = Result<Ack, ApiError>> + Send {
        Self::verify_otp(self, email, otp)
    }

    fn reset_password(
        &self,
        email: &str,
        otp: &str,
        new_password: &SecretString,
    ) -> impl Future<Output = Result<Ack, ApiError>> + Send {
        Self::reset_password(self, email, otp, new_password)
    }
}

/// Where the flow is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStage {
    Email,
    Otp,
    Password,
    /// The password was changed; the flow is over.
    Done,
}

impl ResetStage {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Email => "Forgot Password",
            Self::Otp => "Verify OTP",
            Self::Password | Self::Done => "Reset Password",
        }
    }

    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Email => "Enter your admin and recovery email",
            Self::Otp => "Enter the 6-digit OTP",
            Self::Password | Self::Done => "Enter your new password",
        }
    }
}

/// Six single-digit cells with a focus cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpBuffer {
    cells: [Option<char>; OTP_LENGTH],
    focus: usize,
}

impl OtpBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the focused cell.
    #[must_use]
    pub const fn focus(&self) -> usize {
        self.focus
    }

    #[must_use]
    pub fn cell(&self, index: usize) -> Option<char> {
        self.cells.get(index).copied().flatten()
    }

    /// Set cell `index` to `value`, which must be empty or one ASCII
    /// digit. A digit moves focus to the next cell. Returns whether the
    /// value was accepted.
    pub fn input(&mut self, index: usize, value: &str) -> bool {
        let mut chars = value.chars();
        let digit = match (chars.next(), chars.next()) {
            (None, _) => None,
            (Some(c), None) if c.is_ascii_digit() => Some(c),
            _ => return false,
        };
        let Some(cell) = self.cells.get_mut(index) else {
            return false;
        };
        *cell = digit;
        if digit.is_some() && index < OTP_LENGTH - 1 {
            self.focus = index + 1;
        }
        true
    }

    /// Backspace in cell `index`. On an empty cell focus moves back one;
    /// otherwise the cell is cleared.
    pub fn backspace(&mut self, index: usize) {
        let Some(cell) = self.cells.get_mut(index) else {
            return;
        };
        if cell.is_some() {
            *cell = None;
        } else if index > 0 {
            self.focus = index - 1;
        }
    }

    /// Spread pasted text across the cells from the first one.
    ///
    /// Non-digits are dropped. If more than six digits remain the paste is
    /// ignored. Cells past the pasted digits keep their values. Focus
    /// lands on the first cell after the paste, or the last cell when all
    /// six were filled. Returns whether the paste was applied.
    pub fn paste(&mut self, text: &str) -> bool {
        let digits: Vec<char> = text.chars().filter(char::is_ascii_digit).collect();
        if digits.len() > OTP_LENGTH {
            return false;
        }
        for (cell, digit) in self.cells.iter_mut().zip(&digits) {
            *cell = Some(*digit);
        }
        self.focus = if digits.len() < OTP_LENGTH {
            digits.len()
        } else {
            OTP_LENGTH - 1
        };
        true
    }

    /// The six-digit code, or `None` while any cell is empty.
    #[must_use]
    pub fn code(&self) -> Option<String> {
        self.cells.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl std::fmt::Display for OtpBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for cell in &self.cells {
            write!(f, "{}", cell.unwrap_or('_'))?;
        }
        Ok(())
    }
}

const OTP_SENT: &str = "OTP have been sent";
const OTP_VERIFIED: &str = "OTP verified successfully";
const PASSWORD_RESET: &str = "Password reset successfully";

/// The password-reset flow.
pub struct ResetFlow<A = BackendClient> {
    api: A,
    notice_delay: Duration,
    stage: ResetStage,
    admin_email: String,
    shared_email: String,
    otp: OtpBuffer,
    new_password: SecretString,
    confirm_password: SecretString,
    error: Option<String>,
    notice: Option<&'static str>,
}

impl<A> std::fmt::Debug for ResetFlow<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetFlow")
            .field("stage", &self.stage)
            .field("admin_email", &self.admin_email)
            .field("shared_email", &self.shared_email)
            .field("otp", &self.otp.to_string())
            .field("error", &self.error)
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

impl<A: ResetApi> ResetFlow<A> {
    #[must_use]
    pub fn new(api: A, notice_delay: Duration) -> Self {
        Self {
            api,
            notice_delay,
            stage: ResetStage::Email,
            admin_email: String::new(),
            shared_email: String::new(),
            otp: OtpBuffer::new(),
            new_password: SecretString::from(String::new()),
            confirm_password: SecretString::from(String::new()),
            error: None,
            notice: None,
        }
    }

    #[must_use]
    pub const fn stage(&self) -> ResetStage {
        self.stage
    }

    /// The last failure message.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The last success notice.
    #[must_use]
    pub const fn notice(&self) -> Option<&'static str> {
        self.notice
    }

    #[must_use]
    pub fn admin_email(&self) -> &str {
        &self.admin_email
    }

    #[must_use]
    pub const fn otp(&self) -> &OtpBuffer {
        &self.otp
    }

    pub const fn otp_mut(&mut self) -> &mut OtpBuffer {
        &mut self.otp
    }

    pub fn set_emails(&mut self, admin_email: impl Into<String>, shared_email: impl Into<String>) {
        self.admin_email = admin_email.into();
        self.shared_email = shared_email.into();
    }

    pub fn set_passwords(&mut self, new_password: SecretString, confirm_password: SecretString) {
        self.new_password = new_password;
        self.confirm_password = confirm_password;
    }

    /// Request an OTP for the entered addresses. Ignored outside the
    /// email stage.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Validation` for a malformed address (no
    /// request is made) or `ConsoleError::Api` if the backend refuses.
    #[instrument(skip(self), fields(admin_email = %self.admin_email))]
    pub async fn submit_email(&mut self) -> Result<ResetStage, ConsoleError> {
        if self.stage != ResetStage::Email {
            return Ok(self.stage);
        }
        self.begin();

        let checked = Email::parse(&self.admin_email)
            .and_then(|admin| Ok((admin, Email::parse(&self.shared_email)?)));
        let (admin, shared) = match checked {
            Ok(emails) => emails,
            Err(e) => return Err(self.reject(ValidationError::from(e))),
        };

        let result = self.api.send_otp(admin.as_str(), shared.as_str()).await;
        match result {
            Ok(_) => {
                self.admin_email = admin.as_str().to_string();
                self.shared_email = shared.as_str().to_string();
                self.advance(OTP_SENT, ResetStage::Otp).await;
                Ok(self.stage)
            }
            Err(e) => Err(self.fail(e, "Failed to send OTP")),
        }
    }

    /// Check the entered OTP. Ignored outside the OTP stage.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Validation` when fewer than six digits are
    /// entered (no request is made) or `ConsoleError::Api` if the backend
    /// refuses the code.
    #[instrument(skip(self))]
    pub async fn submit_otp(&mut self) -> Result<ResetStage, ConsoleError> {
        if self.stage != ResetStage::Otp {
            return Ok(self.stage);
        }
        self.begin();

        let Some(code) = self.otp.code() else {
            return Err(self.reject(ValidationError::IncompleteOtp));
        };

        let result = self.api.verify_otp(&self.admin_email, &code).await;
        match result {
            Ok(_) => {
                self.advance(OTP_VERIFIED, ResetStage::Password).await;
                Ok(self.stage)
            }
            Err(e) => Err(self.fail(e, "Failed to verify OTP")),
        }
    }

    /// Set the new password. Ignored outside the password stage.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Validation` when the confirmation does not
    /// match (no request is made) or `ConsoleError::Api` if the backend
    /// refuses.
    #[instrument(skip(self))]
    pub async fn submit_password(&mut self) -> Result<ResetStage, ConsoleError> {
        if self.stage != ResetStage::Password {
            return Ok(self.stage);
        }
        self.begin();

        if let Err(e) = confirm_password(&self.new_password, &self.confirm_password) {
            return Err(self.reject(e));
        }
        let Some(code) = self.otp.code() else {
            return Err(self.reject(ValidationError::IncompleteOtp));
        };

        let result = self
            .api
            .reset_password(&self.admin_email, &code, &self.new_password)
            .await;
        match result {
            Ok(_) => {
                tracing::info!("Admin password reset");
                self.advance(PASSWORD_RESET, ResetStage::Done).await;
                Ok(self.stage)
            }
            Err(e) => Err(self.fail(e, "Failed to reset password")),
        }
    }

    /// From the OTP stage, discard the entered code and return to the
    /// email stage so a new OTP can be requested. No request is made.
    pub fn resend(&mut self) {
        if self.stage == ResetStage::Otp {
            self.otp.clear();
            self.stage = ResetStage::Email;
            self.begin();
        }
    }

    /// Step back one stage, clearing the fields of the stage being left.
    pub fn back(&mut self) {
        match self.stage {
            ResetStage::Password => {
                self.new_password = SecretString::from(String::new());
                self.confirm_password = SecretString::from(String::new());
                self.stage = ResetStage::Otp;
                self.begin();
            }
            ResetStage::Otp => self.resend(),
            ResetStage::Email | ResetStage::Done => {}
        }
    }

    fn begin(&mut self) {
        self.error = None;
        self.notice = None;
    }

    fn reject(&mut self, error: ValidationError) -> ConsoleError {
        self.error = Some(error.to_string());
        ConsoleError::Validation(error)
    }

    fn fail(&mut self, error: ApiError, fallback: &str) -> ConsoleError {
        let err = ConsoleError::api(error, fallback);
        self.error = Some(err.user_message());
        err
    }

    async fn advance(&mut self, notice: &'static str, next: ResetStage) {
        self.notice = Some(notice);
        tokio::time::sleep(self.notice_delay).await;
        if next == ResetStage::Otp {
            self.otp.focus = 0;
        }
        self.stage = next;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use secrecy::ExposeSecret;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        SendOtp(String, String),
        VerifyOtp(String, String),
        Reset(String, String, String),
    }

    /// Records calls and fails the ones it is told to.
    #[derive(Clone, Default)]
    struct FakeReset {
        calls: Arc<Mutex<Vec<Call>>>,
        reject_with: Arc<Mutex<Option<ApiError>>>,
    }

    impl FakeReset {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn reject_next(&self, error: ApiError) {
            *self.reject_with.lock().unwrap() = Some(error);
        }

        fn answer(&self, call: Call) -> Result<Ack, ApiError> {
            self.calls.lock().unwrap().push(call);
            match self.reject_with.lock().unwrap().take() {
                Some(err) => Err(err),
                None => Ok(Ack::default()),
            }
        }
    }

    impl ResetApi for FakeReset {
        async fn send_otp(&self, admin_email: &str, shared_email: &str) -> Result<Ack, ApiError> {
            self.answer(Call::SendOtp(admin_email.into(), shared_email.into()))
        }

        async fn verify_otp(&self, email: &str, otp: &str) -> Result<Ack, ApiError> {
            self.answer(Call::VerifyOtp(email.into(), otp.into()))
        }

        async fn reset_password(
            &self,
            email: &str,
            otp: &str,
            new_password: &SecretString,
        ) -> Result<Ack, ApiError> {
            self.answer(Call::Reset(
                email.into(),
                otp.into(),
                new_password.expose_secret().to_string(),
            ))
        }
    }

    const DELAY: Duration = Duration::from_secs(2);

    fn flow(api: &FakeReset) -> ResetFlow<FakeReset> {
        let mut flow = ResetFlow::new(api.clone(), DELAY);
        flow.set_emails("admin@hadibooks.pk", "owner@gmail.com");
        flow
    }

    async fn at_otp_stage(api: &FakeReset) -> ResetFlow<FakeReset> {
        let mut flow = flow(api);
        flow.submit_email().await.unwrap();
        flow
    }

    fn secret(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_input_accepts_single_digit_and_advances() {
        let mut otp = OtpBuffer::new();
        assert!(otp.input(0, "4"));
        assert_eq!(otp.focus(), 1);
        assert!(!otp.input(1, "x"));
        assert!(!otp.input(1, "12"));
        assert_eq!(otp.cell(1), None);

        assert!(otp.input(5, "9"));
        assert_eq!(otp.focus(), 1);
        assert!(otp.input(0, ""));
        assert_eq!(otp.cell(0), None);
    }

    #[test]
    fn test_backspace_on_empty_cell_moves_back() {
        let mut otp = OtpBuffer::new();
        otp.input(0, "1");
        otp.backspace(1);
        assert_eq!(otp.focus(), 0);
        assert_eq!(otp.cell(0), Some('1'));

        otp.backspace(0);
        assert_eq!(otp.cell(0), None);
        otp.backspace(0);
        assert_eq!(otp.focus(), 0);
    }

    #[test]
    fn test_paste_strips_non_digits() {
        let mut otp = OtpBuffer::new();
        assert!(otp.paste("12-34 56"));
        assert_eq!(otp.code().as_deref(), Some("123456"));
        assert_eq!(otp.focus(), 5);
    }

    #[test]
    fn test_short_paste_keeps_later_cells() {
        let mut otp = OtpBuffer::new();
        otp.paste("123456");
        assert!(otp.paste("98"));
        assert_eq!(otp.code().as_deref(), Some("983456"));
        assert_eq!(otp.focus(), 2);
    }

    #[test]
    fn test_long_paste_is_ignored() {
        let mut otp = OtpBuffer::new();
        assert!(!otp.paste("1234567"));
        assert_eq!(otp, OtpBuffer::new());
    }

    #[test]
    fn test_code_requires_every_cell() {
        let mut otp = OtpBuffer::new();
        otp.paste("12345");
        assert!(otp.code().is_none());
        assert_eq!(otp.to_string(), "12345_");
    }

    #[test]
    fn test_stage_copy() {
        assert_eq!(ResetStage::Email.title(), "Forgot Password");
        assert_eq!(ResetStage::Otp.prompt(), "Enter the 6-digit OTP");
        assert_eq!(ResetStage::Password.title(), "Reset Password");
    }

    #[tokio::test(start_paused = true)]
    async fn test_email_stage_waits_for_notice_then_advances() {
        let api = FakeReset::default();
        let mut flow = flow(&api);

        let started = tokio::time::Instant::now();
        assert_eq!(flow.submit_email().await.unwrap(), ResetStage::Otp);
        assert!(started.elapsed() >= DELAY);
        assert_eq!(flow.notice(), Some("OTP have been sent"));
        assert_eq!(
            api.calls(),
            vec![Call::SendOtp(
                "admin@hadibooks.pk".into(),
                "owner@gmail.com".into()
            )]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_email_failure_stays() {
        let api = FakeReset::default();
        api.reject_next(ApiError::Rejected {
            message: Some("Email not registered".to_string()),
        });
        let mut flow = flow(&api);

        let err = flow.submit_email().await.unwrap_err();
        assert_eq!(err.user_message(), "Email not registered");
        assert_eq!(flow.stage(), ResetStage::Email);
        assert_eq!(flow.error(), Some("Email not registered"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_email_makes_no_request() {
        let api = FakeReset::default();
        let mut flow = ResetFlow::new(api.clone(), DELAY);
        flow.set_emails("admin@hadibooks.pk", "not an email");

        assert!(matches!(
            flow.submit_email().await,
            Err(ConsoleError::Validation(ValidationError::InvalidEmail(_)))
        ));
        assert!(api.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_otp_makes_no_request() {
        let api = FakeReset::default();
        let mut flow = at_otp_stage(&api).await;
        flow.otp_mut().paste("12345");

        let err = flow.submit_otp().await.unwrap_err();
        assert_eq!(err.user_message(), "Please enter a 6-digit OTP");
        assert_eq!(api.calls().len(), 1);
        assert_eq!(flow.stage(), ResetStage::Otp);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resend_clears_buffer_without_request() {
        let api = FakeReset::default();
        let mut flow = at_otp_stage(&api).await;
        flow.otp_mut().paste("123");

        flow.resend();
        assert_eq!(flow.stage(), ResetStage::Email);
        assert_eq!(flow.otp(), &OtpBuffer::new());
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_password_mismatch_makes_no_request() {
        let api = FakeReset::default();
        let mut flow = at_otp_stage(&api).await;
        flow.otp_mut().paste("123456");
        flow.submit_otp().await.unwrap();

        flow.set_passwords(secret("hunter22"), secret("hunter23"));
        let err = flow.submit_password().await.unwrap_err();
        assert_eq!(err.user_message(), "Passwords do not match");
        assert_eq!(api.calls().len(), 2);
        assert_eq!(flow.stage(), ResetStage::Password);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_flow_uses_admin_email() {
        let api = FakeReset::default();
        let mut flow = at_otp_stage(&api).await;
        flow.otp_mut().paste("654321");
        assert_eq!(flow.submit_otp().await.unwrap(), ResetStage::Password);
        assert_eq!(flow.notice(), Some("OTP verified successfully"));

        flow.set_passwords(secret("n3w-pass"), secret("n3w-pass"));
        assert_eq!(flow.submit_password().await.unwrap(), ResetStage::Done);
        assert_eq!(flow.notice(), Some("Password reset successfully"));

        let calls = api.calls();
        assert_eq!(
            calls[1],
            Call::VerifyOtp("admin@hadibooks.pk".into(), "654321".into())
        );
        assert_eq!(
            calls[2],
            Call::Reset(
                "admin@hadibooks.pk".into(),
                "654321".into(),
                "n3w-pass".into()
            )
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_from_password_clears_passwords() {
        let api = FakeReset::default();
        let mut flow = at_otp_stage(&api).await;
        flow.otp_mut().paste("654321");
        flow.submit_otp().await.unwrap();
        flow.set_passwords(secret("abc"), secret("abd"));

        flow.back();
        assert_eq!(flow.stage(), ResetStage::Otp);
        assert_eq!(flow.new_password.expose_secret(), "");
        assert_eq!(flow.confirm_password.expose_secret(), "");
        assert_eq!(flow.otp().code().as_deref(), Some("654321"));

        flow.back();
        assert_eq!(flow.stage(), ResetStage::Email);
        assert!(flow.otp().code().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_outside_stage_is_ignored() {
        let api = FakeReset::default();
        let mut flow = flow(&api);
        assert_eq!(flow.submit_otp().await.unwrap(), ResetStage::Email);
        assert_eq!(flow.submit_password().await.unwrap(), ResetStage::Email);
        assert!(api.calls().is_empty());
    }
}
