//! Show command implementation.

use super::parse_id;
use crate::cli::ShowArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use vault_sdk::VaultClient;

/// Execute the show command.
pub async fn execute_show(args: ShowArgs, client: &VaultClient, formatter: &Formatter) -> Result<()> {
    let id = parse_id(&args.id)?;
    let tagged = client
        .get_evidence(id)
        .await?
        .ok_or_else(|| CliError::NotFound(args.id.clone()))?;

    println!("{}", formatter.format_evidence(&tagged)?);

    if args.history {
        let versions = client.history(tagged.evidence.version_group_id).await?;
        println!();
        println!("{}", formatter.format_versions(&versions)?);
    }

    Ok(())
}
