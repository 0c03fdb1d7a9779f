//! Module for the "stats" command.

use super::*;

/// Function for the [`Commands::Stats`] in the CLI.
pub async fn stats<I: UserInteraction>(interaction: &I, db: &Database) -> Result<()> {
  let stats = Stats.execute(db).await?;
  interaction.reply(ResponseContent::Stats(&stats))
}
