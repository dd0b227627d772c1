//! Session commands.

use hadi_books_admin::Console;
use secrecy::SecretString;

use super::CliError;
use crate::output;

/// Sign in and save the session.
pub async fn login(console: &Console, email: &str, password: SecretString) -> Result<(), CliError> {
    let session = console.login(email, &password).await?;
    output::line(&format!("Logged in as {}", session.email));
    output::session(&session);
    Ok(())
}

/// Sign out. The saved session is removed even if the backend fails.
pub async fn logout(console: &Console) -> Result<(), CliError> {
    if console.session().rehydrate().is_none() {
        output::line("Not logged in");
        return Ok(());
    }
    console.logout().await?;
    output::line("Logged out");
    Ok(())
}

/// Print the signed-in admin.
pub fn whoami(console: &Console) -> Result<(), CliError> {
    let session = console.session().current();
    if !session.is_authenticated() {
        return Err(CliError::NotLoggedIn);
    }
    output::session(&session);
    Ok(())
}
