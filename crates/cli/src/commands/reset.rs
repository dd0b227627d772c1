//! Interactive password reset.
//!
//! Prompts for the admin and recovery emails, then the OTP, then the new
//! password. A blank OTP goes back to request a new code. Errors are
//! printed and the current step is asked again.

use hadi_books_admin::reset::{ResetFlow, ResetStage};
use hadi_books_admin::{Console, ConsoleError};
use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use super::CliError;
use crate::output;

pub async fn run(console: &Console) -> Result<(), CliError> {
    let mut flow = console.reset_flow();
    let mut input = Prompt::stdin();
    let mut shown = None;

    loop {
        let stage = flow.stage();
        if shown != Some(stage) {
            output::heading(stage.title());
            output::line(stage.prompt());
            shown = Some(stage);
        }

        let result = match stage {
            ResetStage::Email => {
                let admin_email = input.ask("Admin email").await?;
                let shared_email = input.ask("Recovery email").await?;
                flow.set_emails(admin_email, shared_email);
                flow.submit_email().await
            }
            ResetStage::Otp => {
                let code = input.ask("OTP (blank to request a new one)").await?;
                if code.is_empty() {
                    flow.resend();
                    continue;
                }
                flow.otp_mut().clear();
                flow.otp_mut().paste(&code);
                flow.submit_otp().await
            }
            ResetStage::Password => {
                let new_password = input.ask("New password").await?;
                let confirm_password = input.ask("Confirm password").await?;
                flow.set_passwords(
                    SecretString::from(new_password),
                    SecretString::from(confirm_password),
                );
                flow.submit_password().await
            }
            ResetStage::Done => {
                output::line("Password reset. You can now log in.");
                return Ok(());
            }
        };
        report(&flow, result);
    }
}

fn report(flow: &ResetFlow, result: Result<ResetStage, ConsoleError>) {
    match result {
        Ok(_) => {
            if let Some(notice) = flow.notice() {
                output::line(notice);
            }
        }
        Err(e) => output::line(&format!("Error: {}", e.user_message())),
    }
}

/// Line-at-a-time reader over stdin.
struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Ask for one line. End of input ends the command.
    async fn ask(&mut self, label: &str) -> Result<String, CliError> {
        output::prompt(label)?;
        match self.lines.next_line().await? {
            Some(line) => Ok(line.trim().to_string()),
            None => Err(CliError::Input(std::io::ErrorKind::UnexpectedEof.into())),
        }
    }
}
