//! Module for the "list" command over stored articles.

use super::*;

/// Fields stored articles can be ordered by.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderArg {
  /// Alphabetically by title
  Title,
  /// By publication year
  Year,
  /// By citation count
  Citations,
  /// In the order they were stored
  Created,
}

impl From<OrderArg> for OrderField {
  fn from(value: OrderArg) -> Self {
    match value {
      OrderArg::Title => OrderField::Title,
      OrderArg::Year => OrderField::Year,
      OrderArg::Citations => OrderField::Citations,
      OrderArg::Created => OrderField::Created,
    }
  }
}

#[derive(Args, Clone)]
pub struct ListArgs {
  /// Keep titles containing this text, ignoring case
  #[arg(long)]
  pub title: Option<String>,

  /// Keep works linked to the author with exactly this name
  #[arg(long)]
  pub author: Option<String>,

  /// Keep works published in this year
  #[arg(long)]
  pub year: Option<i32>,

  /// Keep works cited more than this many times
  #[arg(long)]
  pub min_citations: Option<i64>,

  /// Order of the listing
  #[arg(long, value_enum, default_value = "created")]
  pub order: OrderArg,

  /// Reverse the order
  #[arg(long)]
  pub desc: bool,

  /// Show at most this many articles
  #[arg(long)]
  pub limit: Option<usize>,

  /// Show every field of each article
  #[arg(long)]
  pub detailed: bool,
}

impl ListArgs {
  /// The query these arguments describe.
  fn query(&self) -> Query {
    let mut criteria = Vec::new();
    if let Some(title) = &self.title {
      criteria.push(QueryCriteria::Title(title.clone()));
    }
    if let Some(author) = &self.author {
      criteria.push(QueryCriteria::Author(author.clone()));
    }
    if let Some(year) = self.year {
      criteria.push(QueryCriteria::Year(year));
    }
    if let Some(citations) = self.min_citations {
      criteria.push(QueryCriteria::CitedMoreThan(citations));
    }

    let mut criteria = criteria.into_iter();
    let mut query = criteria.next().map_or_else(Query::list_all, Query::new);
    for criterion in criteria {
      query = query.and(criterion);
    }

    query = query.order_by(self.order.into());
    if self.desc {
      query = query.descending();
    }
    if let Some(limit) = self.limit {
      query = query.limit(limit);
    }
    query
  }
}

/// Function for the [`Commands::List`] in the CLI.
pub async fn list<I: UserInteraction>(interaction: &I, db: &Database, args: ListArgs) -> Result<()> {
  let articles = args.query().execute(db).await?;
  if args.detailed {
    for article in &articles {
      interaction.reply(ResponseContent::Article(article))?;
    }
    Ok(())
  } else {
    interaction.reply(ResponseContent::Articles(&articles))
  }
}
