//! Profile commands.

use std::path::PathBuf;

use hadi_books_admin::Console;
use hadi_books_admin::api::ProfileUpdate;
use hadi_books_admin::validation::{ImageUpload, ValidationError};
use hadi_books_core::Email;
use secrecy::SecretString;

use super::CliError;
use crate::output;

/// Send whichever fields were given.
pub async fn update(
    console: &Console,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    picture: Option<PathBuf>,
) -> Result<(), CliError> {
    let email = email
        .as_deref()
        .map(Email::parse)
        .transpose()
        .map_err(ValidationError::from)?;
    let profile_picture = match picture {
        Some(path) => Some(ImageUpload::read(path).await?),
        None => None,
    };
    let update = ProfileUpdate {
        name,
        email,
        password: password.map(SecretString::from),
        profile_picture,
    };

    if update.is_empty() {
        output::line("Nothing to update");
        return Ok(());
    }
    let session = console.profile_editor().update(update).await?;
    output::line("Profile updated successfully");
    output::session(&session);
    Ok(())
}

pub async fn remove_picture(console: &Console) -> Result<(), CliError> {
    let session = console.profile_editor().remove_picture().await?;
    output::line("Profile picture removed");
    output::session(&session);
    Ok(())
}
