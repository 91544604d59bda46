//! Command implementations.

pub mod add;
pub mod audit;
pub mod delete;
pub mod edit;
pub mod export;
pub mod info;
pub mod list;
pub mod show;

pub use self::add::execute_add;
pub use self::audit::execute_audit;
pub use self::delete::{execute_delete, execute_undo};
pub use self::edit::execute_edit;
pub use self::export::execute_export;
pub use self::info::{execute_categories, execute_theme};
pub use self::list::execute_list;
pub use self::show::execute_show;

use crate::cli::Command;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use vault_domain::EvidenceId;
use vault_sdk::VaultClient;

/// Run one vault command.
///
/// `Repl` is handled by the caller.
pub async fn dispatch(
    command: Command,
    client: &VaultClient,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    match command {
        Command::Add(args) => execute_add(args, client, formatter).await,
        Command::List(args) => execute_list(args, client, config, formatter).await,
        Command::Show(args) => execute_show(args, client, formatter).await,
        Command::Edit(args) => execute_edit(args, client, formatter).await,
        Command::Delete(args) => execute_delete(args, client, config, formatter).await,
        Command::Undo => execute_undo(client, formatter).await,
        Command::Audit(args) => execute_audit(args, client, formatter).await,
        Command::Export(args) => execute_export(args, client, formatter).await,
        Command::Categories => execute_categories(client, formatter).await,
        Command::Theme => execute_theme(client, config, formatter).await,
        Command::Repl => {
            println!("{}", formatter.info("Already in REPL mode"));
            Ok(())
        }
    }
}

/// Parse a version id argument.
pub(crate) fn parse_id(raw: &str) -> Result<EvidenceId> {
    EvidenceId::parse(raw.trim())
        .map_err(|e| CliError::InvalidInput(format!("Invalid ID '{}': {}", raw, e)))
}
