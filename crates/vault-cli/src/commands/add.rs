//! Add command implementation.

use crate::cli::AddArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use vault_domain::NewEvidence;
use vault_sdk::{PresetPath, VaultClient};

/// Execute the add command.
pub async fn execute_add(args: AddArgs, client: &VaultClient, formatter: &Formatter) -> Result<()> {
    if !args.file.is_file() {
        return Err(CliError::InvalidInput(format!(
            "Not a file: {}",
            args.file.display()
        )));
    }

    let managed = client
        .pick_source_file(&PresetPath::new(&args.file))
        .await?
        .ok_or_else(|| CliError::InvalidInput("No file selected".to_string()))?;

    let created = client
        .create_evidence(NewEvidence {
            title: args.title,
            description: args.description,
            category: args.category,
            status: args.status,
            file_path: managed.to_string_lossy().into_owned(),
            tags: args.tags,
        })
        .await?;

    if formatter.is_quiet() {
        println!("{}", created.id);
    } else {
        println!(
            "{}",
            formatter.success(&format!("Added '{}' as {}", created.title, created.id))
        );
    }

    Ok(())
}
