//! Delete and undo command implementations.

use super::parse_id;
use crate::cli::DeleteArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::io::{self, Write};
use vault_sdk::VaultClient;

/// Execute the delete command.
pub async fn execute_delete(
    args: DeleteArgs,
    client: &VaultClient,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let id = parse_id(&args.id)?;
    let tagged = client
        .get_evidence(id)
        .await?
        .ok_or_else(|| CliError::NotFound(args.id.clone()))?;

    // Confirm deletion unless --yes is specified
    if !args.yes {
        println!(
            "About to delete version {} of '{}' ({})",
            tagged.evidence.version_number, tagged.evidence.title, id
        );
        print!("Continue? [y/N] ");
        io::stdout().flush()?;

        let mut response = String::new();
        io::stdin().read_line(&mut response)?;

        if !response.trim().eq_ignore_ascii_case("y") {
            println!("{}", formatter.info("Operation cancelled"));
            return Ok(());
        }
    }

    if !client.delete_evidence(id).await? {
        return Err(CliError::NotFound(args.id));
    }

    if !formatter.is_quiet() {
        println!("{}", formatter.success(&format!("Deleted {}", id)));
        println!(
            "{}",
            formatter.info(&format!(
                "Run 'undo' within {} to restore it",
                undo_hint(config.store.undo_window_ms)
            ))
        );
    }

    Ok(())
}

/// Execute the undo command.
pub async fn execute_undo(client: &VaultClient, formatter: &Formatter) -> Result<()> {
    match client.undo_delete().await? {
        Some(restored) if formatter.is_quiet() => println!("{}", restored.id),
        Some(restored) => println!(
            "{}",
            formatter.success(&format!(
                "Restored version {} of '{}'",
                restored.version_number, restored.title
            ))
        ),
        None => println!("{}", formatter.warning("Nothing to undo")),
    }

    Ok(())
}

fn undo_hint(window_ms: u64) -> String {
    if window_ms % 1_000 == 0 {
        let secs = window_ms / 1_000;
        format!("{} second{}", secs, if secs == 1 { "" } else { "s" })
    } else {
        format!("{} ms", window_ms)
    }
}
