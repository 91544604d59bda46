//! List command implementation.

use crate::cli::ListArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use vault_domain::{CategoryFilter, ListFilter};
use vault_sdk::VaultClient;

/// Execute the list command.
pub async fn execute_list(
    args: ListArgs,
    client: &VaultClient,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let filter = build_filter(&args, config.settings.page_size);
    let page_number = filter.page;
    let page_size = filter.page_size;

    let page = client.list_evidence(filter).await?;
    println!("{}", formatter.format_page(&page, page_number, page_size)?);

    Ok(())
}

/// Translate arguments into a listing filter.
pub fn build_filter(args: &ListArgs, default_page_size: u32) -> ListFilter {
    ListFilter {
        search: args.search.clone().unwrap_or_default(),
        status: args.status,
        category: args
            .category
            .as_deref()
            .map(CategoryFilter::from)
            .unwrap_or_default(),
        sort_by: args.sort.into(),
        sort_dir: args.direction(),
        page: args.page,
        page_size: args.page_size.unwrap_or(default_page_size),
        include_history: args.history,
    }
    .normalized()
}
