//! Edit command implementation.
//!
//! Editing never changes a version in place: it creates the next version of
//! the same group.

use super::parse_id;
use crate::cli::EditArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use vault_domain::{EvidenceUpdate, TaggedEvidence};
use vault_sdk::{PresetPath, VaultClient};

/// Execute the edit command.
pub async fn execute_edit(args: EditArgs, client: &VaultClient, formatter: &Formatter) -> Result<()> {
    let id = parse_id(&args.id)?;
    let current = client
        .get_evidence(id)
        .await?
        .ok_or_else(|| CliError::NotFound(args.id.clone()))?;

    let new_file = match &args.file {
        Some(path) => {
            let managed = client
                .pick_source_file(&PresetPath::new(path))
                .await?
                .ok_or_else(|| CliError::InvalidInput("No file selected".to_string()))?;
            Some(managed.to_string_lossy().into_owned())
        }
        None => None,
    };

    let update = merge_update(&current, &args, new_file);
    let created = client
        .update_evidence(id, update)
        .await?
        .ok_or_else(|| CliError::NotFound(args.id.clone()))?;

    if formatter.is_quiet() {
        println!("{}", created.id);
    } else {
        println!(
            "{}",
            formatter.success(&format!(
                "Saved version {} of '{}' as {}",
                created.version_number, created.title, created.id
            ))
        );
    }

    Ok(())
}

/// Build the update payload: given arguments win, the rest carries over.
pub fn merge_update(current: &TaggedEvidence, args: &EditArgs, new_file: Option<String>) -> EvidenceUpdate {
    let evidence = &current.evidence;

    let tags = if args.clear_tags {
        Vec::new()
    } else if !args.tags.is_empty() {
        args.tags.clone()
    } else {
        current.tags.clone()
    };

    EvidenceUpdate {
        title: args.title.clone().unwrap_or_else(|| evidence.title.clone()),
        description: match &args.description {
            Some(description) => Some(description.clone()),
            None => evidence.description.clone(),
        },
        category: args
            .category
            .clone()
            .unwrap_or_else(|| evidence.category.clone()),
        status: args.status.unwrap_or(evidence.status),
        file_path: new_file,
        tags,
    }
}
