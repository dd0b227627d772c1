use hadi_books_admin::Console;

use super::CliError;
use crate::output;

pub async fn show(console: &Console) -> Result<(), CliError> {
    let stats = console.dashboard().await?;
    output::dashboard(&stats);
    Ok(())
}
