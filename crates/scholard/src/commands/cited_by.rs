//! Module for the "cited-by" command.

use super::*;

#[derive(Args, Clone)]
pub struct CitedByArgs {
  /// Row id of a stored article
  pub article_id: i64,

  /// Most citing works to store, defaults to the configured per-query cap
  #[arg(long)]
  pub cap: Option<usize>,
}

/// Function for the [`Commands::CitedBy`] in the CLI.
pub async fn cited_by<I: UserInteraction>(
  interaction: &I,
  scholar: Scholar,
  args: CitedByArgs,
) -> Result<()> {
  let cap = cap_or_default(args.cap, scholar.config())?;
  let articles = scholar.ingest_cited_by(args.article_id, cap).await?;
  interaction.reply(ResponseContent::Articles(&articles))
}
