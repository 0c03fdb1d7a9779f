//! Module for the "authors" command.

use super::*;

/// Statistic authors are ranked by.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankArg {
  /// Sum of the citations of their works
  Citations,
  /// Number of works
  Articles,
}

#[derive(Args, Clone)]
pub struct AuthorsArgs {
  /// Show authors whose name contains this text
  #[arg(long, conflicts_with = "article")]
  pub name: Option<String>,

  /// Show the authors of this stored article, in byline order
  #[arg(long)]
  pub article: Option<i64>,

  /// How many top authors to show
  #[arg(long, default_value_t = 10)]
  pub top: usize,

  /// Statistic to rank top authors by
  #[arg(long, value_enum, default_value = "citations")]
  pub by: RankArg,
}

/// Function for the [`Commands::Authors`] in the CLI.
pub async fn authors<I: UserInteraction>(
  interaction: &I,
  db: &Database,
  args: AuthorsArgs,
) -> Result<()> {
  let query = match (args.name, args.article) {
    (Some(name), _) => AuthorQuery::name_contains(name),
    (None, Some(article_id)) => AuthorQuery::of_article(article_id),
    (None, None) => match args.by {
      RankArg::Citations => AuthorQuery::top_by_citations(args.top),
      RankArg::Articles => AuthorQuery::top_by_articles(args.top),
    },
  };

  let authors = query.execute(db).await?;
  interaction.reply(ResponseContent::Authors(&authors))
}
