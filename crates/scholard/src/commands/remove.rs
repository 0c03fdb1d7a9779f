//! Module for the "remove" command.

use super::*;

#[derive(Args, Clone)]
#[group(required = true, multiple = false)]
pub struct RemoveTarget {
  /// Row id of the article to remove
  #[arg(long)]
  pub article: Option<i64>,

  /// Row id of the author to remove
  #[arg(long)]
  pub author: Option<i64>,
}

#[derive(Args, Clone)]
pub struct RemoveArgs {
  #[command(flatten)]
  pub target: RemoveTarget,

  /// Report what would be removed without removing it
  #[arg(long)]
  pub dry_run: bool,
}

/// Function for the [`Commands::Remove`] in the CLI.
pub async fn remove<I: UserInteraction>(
  interaction: &I,
  db: &Database,
  args: RemoveArgs,
) -> Result<()> {
  let (instruction, label) = match (args.target.article, args.target.author) {
    (Some(id), _) => (Remove::article(id), format!("article {id}")),
    (None, Some(id)) => (Remove::author(id), format!("author {id}")),
    (None, None) => return Err(ScholardError::Usage("nothing to remove".to_string())),
  };

  let found = instruction.clone().dry_run().execute(db).await?;
  if found == 0 {
    interaction.reply(ResponseContent::Warning(&format!("No stored {label}")))?;
    return Ok(());
  }

  if args.dry_run {
    interaction.reply(ResponseContent::Info(&format!("Would remove {label}")))?;
    return Ok(());
  }

  if !interaction.confirm(&format!("Remove {label}?"))? {
    interaction.reply(ResponseContent::Info("Operation cancelled"))?;
    return Ok(());
  }

  instruction.execute(db).await?;
  interaction.reply(ResponseContent::Success(&format!("Removed {label}")))
}
