//! Module for the "harvest" command: batch ingestion of researchers' works.

use super::*;

#[derive(Args, Clone)]
pub struct HarvestArgs {
  /// Researcher names to search for
  pub names: Vec<String>,

  /// File with one researcher name per line; blank lines and `#` comments are ignored
  #[arg(long)]
  pub file: Option<PathBuf>,

  /// Most works to store per researcher, defaults to the configured per-query cap
  #[arg(long)]
  pub cap: Option<usize>,
}

/// Function for the [`Commands::Harvest`] in the CLI.
pub async fn harvest<I: UserInteraction>(
  interaction: &I,
  scholar: Scholar,
  args: HarvestArgs,
) -> Result<()> {
  let HarvestArgs { mut names, file, cap } = args;
  let cap = cap_or_default(cap, scholar.config())?;

  if let Some(file) = file {
    let content = tokio::fs::read_to_string(&file).await?;
    names.extend(parse_names(&content));
  }
  if names.is_empty() {
    return Err(ScholardError::Usage("no researcher names given".to_string()));
  }

  interaction.reply(ResponseContent::Info(&format!(
    "Harvesting {} researcher{}, up to {cap} works each",
    names.len(),
    if names.len() == 1 { "" } else { "s" }
  )))?;
  let articles = scholar.run_batch(&names, cap).await;
  interaction.reply(ResponseContent::Articles(&articles))
}

/// Researcher names listed in a harvest file.
fn parse_names(content: &str) -> Vec<String> {
  content
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty() && !line.starts_with('#'))
    .map(str::to_string)
    .collect()
}
