//! Talking to the person at the terminal: confirmations, prompts and formatted replies.

use dialoguer::{Confirm, Input};

use super::*;

pub static INFO_PREFIX: &str = "ℹ ";
pub static SUCCESS_PREFIX: &str = "✓ ";
pub static ERROR_PREFIX: &str = "✗ ";
pub static WARNING_PREFIX: &str = "! ";
pub static PROMPT_PREFIX: &str = "❯ ";
pub static ITEM_PREFIX: &str = "├─";
pub static LAST_ITEM_PREFIX: &str = "└─";
pub static CONTINUE_PREFIX: &str = "│  ";

/// Something a command wants to show.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  Article(&'a Article),
  Articles(&'a [Article]),
  Authors(&'a [Author]),
  Stats(&'a StorageStats),
  Success(&'a str),
  Error(ScholardError),
  Warning(&'a str),
  Info(&'a str),
}

pub trait UserInteraction {
  fn confirm(&self, message: &str) -> Result<bool>;
  fn prompt(&self, message: &str) -> Result<String>;
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

impl UserInteraction for Cli {
  fn confirm(&self, message: &str) -> Result<bool> {
    if self.accept_defaults {
      return Ok(true);
    }
    Ok(
      Confirm::new()
        .with_prompt(format!("{}{}", style(PROMPT_PREFIX).yellow(), message))
        .default(false)
        .interact()?,
    )
  }

  fn prompt(&self, message: &str) -> Result<String> {
    if self.accept_defaults {
      return Ok(String::new());
    }
    Ok(
      Input::<String>::new()
        .with_prompt(format!("{}{}", style(PROMPT_PREFIX).yellow(), message))
        .allow_empty(true)
        .interact_text()?,
    )
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Article(article) => print_article(article),
      ResponseContent::Articles(articles) => {
        if articles.is_empty() {
          println!("{}No articles", style(INFO_PREFIX).blue());
          return Ok(());
        }
        println!(
          "{}{} article{}",
          style(SUCCESS_PREFIX).green(),
          articles.len(),
          if articles.len() == 1 { "" } else { "s" }
        );
        for (index, article) in articles.iter().enumerate() {
          let prefix = if index + 1 == articles.len() { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
          println!(
            "{} {} {}",
            style(prefix).dim(),
            style(format!("[{}]", article.id.unwrap_or_default())).dim(),
            style(&article.title).white().bold()
          );
          let continuation = if index + 1 == articles.len() { "   " } else { CONTINUE_PREFIX };
          println!(
            "{}{} {} {}",
            style(continuation).dim(),
            style(&article.authors).cyan(),
            style(year_label(article.publication_year)).yellow(),
            style(format!("({} citations)", article.citation_count)).dim()
          );
        }
      },
      ResponseContent::Authors(authors) => {
        if authors.is_empty() {
          println!("{}No authors", style(INFO_PREFIX).blue());
          return Ok(());
        }
        for (index, author) in authors.iter().enumerate() {
          let prefix = if index + 1 == authors.len() { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
          println!(
            "{} {} {} {}",
            style(prefix).dim(),
            style(format!("[{}]", author.id)).dim(),
            style(&author.full_name).cyan().bold(),
            style(format!(
              "{} article{}, {} citations",
              author.article_count,
              if author.article_count == 1 { "" } else { "s" },
              author.total_citations
            ))
            .dim()
          );
        }
      },
      ResponseContent::Stats(stats) => {
        println!("{}Storage statistics", style(INFO_PREFIX).blue());
        println!("{} Articles:  {}", style(ITEM_PREFIX).dim(), style(stats.articles).bold());
        println!("{} Authors:   {}", style(ITEM_PREFIX).dim(), style(stats.authors).bold());
        println!("{} Links:     {}", style(ITEM_PREFIX).dim(), style(stats.links).bold());
        println!(
          "{} Citations: {}",
          style(LAST_ITEM_PREFIX).dim(),
          style(stats.total_citations).bold()
        );
      },
      ResponseContent::Success(message) => println!("{}{}", style(SUCCESS_PREFIX).green(), message),
      ResponseContent::Error(error) =>
        eprintln!("{}{}", style(ERROR_PREFIX).red(), style(error).red()),
      ResponseContent::Warning(message) =>
        println!("{}{}", style(WARNING_PREFIX).yellow(), style(message).yellow()),
      ResponseContent::Info(message) => println!("{}{}", style(INFO_PREFIX).blue(), message),
    }
    Ok(())
  }
}

fn print_article(article: &Article) {
  println!("{}{}", style(SUCCESS_PREFIX).green(), style(&article.title).white().bold());
  let mut fields = vec![("Authors", article.authors.clone()), ("Year", year_label(article.publication_year))];
  fields.push(("Venue", article.venue.clone()));
  fields.push(("Publisher", article.publisher.clone()));
  fields.push(("Citations", article.citation_count.to_string()));
  if let Some(external_id) = &article.external_id {
    fields.push(("Result id", external_id.clone()));
  }
  if let Some(url) = &article.url {
    fields.push(("URL", url.clone()));
  }
  if let Some(pdf_url) = &article.pdf_url {
    fields.push(("PDF", pdf_url.clone()));
  }
  for (index, (label, value)) in fields.iter().enumerate() {
    let prefix = if index + 1 == fields.len() { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
    println!("{} {} {}", style(prefix).dim(), style(format!("{label}:")).green().bold(), value);
  }
}

fn year_label(year: Option<i32>) -> String { year.map_or_else(|| "n.d.".to_string(), |y| y.to_string()) }
