//! Audit command implementation.

use crate::cli::AuditArgs;
use crate::error::Result;
use crate::output::Formatter;
use vault_sdk::VaultClient;

/// Execute the audit command.
pub async fn execute_audit(args: AuditArgs, client: &VaultClient, formatter: &Formatter) -> Result<()> {
    let mut entries = client.list_audit().await?;
    if let Some(limit) = args.limit {
        entries.truncate(limit);
    }

    println!("{}", formatter.format_audit(&entries)?);
    Ok(())
}
