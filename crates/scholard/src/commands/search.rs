//! Module for the "search" command: a free-text search whose results are stored.

use super::*;

#[derive(Args, Clone)]
pub struct SearchArgs {
  /// Free-text query sent to the search service
  pub query: String,

  /// Most results to store, defaults to the configured per-query cap
  #[arg(long)]
  pub cap: Option<usize>,

  /// Show every field of each stored article
  #[arg(long)]
  pub detailed: bool,
}

/// Function for the [`Commands::Search`] in the CLI.
pub async fn search<I: UserInteraction>(
  interaction: &I,
  scholar: Scholar,
  args: SearchArgs,
) -> Result<()> {
  let SearchArgs { query, cap, detailed } = args;
  let cap = cap_or_default(cap, scholar.config())?;

  interaction.reply(ResponseContent::Info(&format!("Searching for: {query}")))?;
  let articles = scholar.search_and_ingest(&query, cap).await?;

  if detailed {
    for article in &articles {
      interaction.reply(ResponseContent::Article(article))?;
    }
    Ok(())
  } else {
    interaction.reply(ResponseContent::Articles(&articles))
  }
}
