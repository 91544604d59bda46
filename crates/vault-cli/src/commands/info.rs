//! Categories and theme command implementations.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use vault_sdk::VaultClient;

/// Execute the categories command.
pub async fn execute_categories(client: &VaultClient, formatter: &Formatter) -> Result<()> {
    let categories = client.list_categories().await?;
    println!("{}", formatter.format_names(&categories)?);
    Ok(())
}

/// Execute the theme command.
pub async fn execute_theme(client: &VaultClient, config: &Config, formatter: &Formatter) -> Result<()> {
    let theme = client.theme_preference(&config.settings.theme).await;
    println!("{}", formatter.format_theme(theme)?);
    Ok(())
}
