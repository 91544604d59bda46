//! Export command implementation.

use crate::cli::ExportArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use vault_domain::{CategoryFilter, ExportFilter};
use vault_sdk::{PresetPath, VaultClient};

/// Execute the export command.
pub async fn execute_export(args: ExportArgs, client: &VaultClient, formatter: &Formatter) -> Result<()> {
    if args.output.is_dir() {
        return Err(CliError::InvalidInput(format!(
            "Export destination is a directory: {}",
            args.output.display()
        )));
    }

    let filter = ExportFilter {
        status: args.status,
        category: args
            .category
            .as_deref()
            .map(CategoryFilter::from)
            .unwrap_or_default(),
    };

    match client.build_export(filter, &PresetPath::new(&args.output)).await? {
        Some(summary) => println!("{}", formatter.format_export(&summary)?),
        None => println!("{}", formatter.info("Export cancelled")),
    }

    Ok(())
}
