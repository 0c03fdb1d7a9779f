use scholar::parse::summary::UNKNOWN_AUTHOR;

use super::*;

#[traced_test]
#[tokio::test]
async fn test_ingest_search_page() -> TestResult<()> {
  let (scholar, _dir) = setup_scholar(Arc::new(MockSearch::new())).await;
  let response = fixture(SEARCH_FIXTURE);

  let articles = scholar.ingest(&response.organic_results, 10).await?;
  assert_eq!(titles(&articles), vec![
    "Population biology of plants",
    "The population biology of invasive species",
    "Seed ecology without any summary",
  ]);

  let harper = &articles[0];
  assert_eq!(harper.authors, "JL Harper");
  assert_eq!(harper.publication_year, Some(1977));
  assert_eq!(harper.citation_count, 16131);
  assert_eq!(harper.citing_set_id.as_deref(), Some("16055614372148427706"));

  let invasive = &articles[1];
  assert_eq!(invasive.publication_year, Some(2001));
  assert_eq!(invasive.pdf_url.as_deref(), Some("https://www.researchgate.net/invasive-species.pdf"));

  let authors = AuthorQuery::of_article(invasive.id.unwrap()).execute(scholar.database()).await?;
  let names: Vec<&str> = authors.iter().map(|author| author.full_name.as_str()).collect();
  assert_eq!(names, vec!["AK Sakai", "FW Allendorf", "JS Holt", "DM Lodge", "J Molofsky"]);

  let stats = Stats.execute(scholar.database()).await?;
  assert_eq!(stats.articles, 3);
  // Harper, five co-authors and the placeholder of the result without a summary
  assert_eq!(stats.authors, 7);
  assert_eq!(stats.links, 7);
  assert_eq!(stats.total_citations, 16131 + 5180);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_ingest_without_summary_keeps_placeholder() -> TestResult<()> {
  let (scholar, _dir) = setup_scholar(Arc::new(MockSearch::new())).await;
  let response = fixture(SEARCH_FIXTURE);

  let articles = scholar.ingest(&response.organic_results[3..], 1).await?;
  assert_eq!(articles.len(), 1);
  assert_eq!(articles[0].authors, UNKNOWN_AUTHOR);
  assert!(articles[0].publication_year.is_none());

  let authors = AuthorQuery::of_article(articles[0].id.unwrap()).execute(scholar.database()).await?;
  assert_eq!(authors.len(), 1);
  assert_eq!(authors[0].full_name, UNKNOWN_AUTHOR);
  assert_eq!(authors[0].article_count, 1);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_reingest_is_idempotent() -> TestResult<()> {
  let (scholar, _dir) = setup_scholar(Arc::new(MockSearch::new())).await;
  let response = fixture(SEARCH_FIXTURE);

  let first = scholar.ingest(&response.organic_results, 10).await?;
  let before = Stats.execute(scholar.database()).await?;

  let second = scholar.ingest(&response.organic_results, 10).await?;
  let after = Stats.execute(scholar.database()).await?;

  let ids = |articles: &[Article]| articles.iter().map(|article| article.id).collect::<Vec<_>>();
  assert_eq!(ids(&first), ids(&second));
  assert_eq!(after, before);

  let harper = AuthorQuery::by_name("JL Harper").execute(scholar.database()).await?;
  assert_eq!(harper.len(), 1);
  assert_eq!(harper[0].article_count, 1);
  assert_eq!(harper[0].total_citations, 16131);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_ingest_respects_cap() -> TestResult<()> {
  let (scholar, _dir) = setup_scholar(Arc::new(MockSearch::new())).await;
  let response = fixture(SEARCH_FIXTURE);

  let articles = scholar.ingest(&response.organic_results, 1).await?;
  assert_eq!(titles(&articles), vec!["Population biology of plants"]);
  assert_eq!(Stats.execute(scholar.database()).await?.articles, 1);

  let error = scholar.ingest(&response.organic_results, 0).await.unwrap_err();
  assert!(matches!(error, ScholarError::InvalidInput(_)));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_stored_articles_are_queryable() -> TestResult<()> {
  let (scholar, _dir) = setup_scholar(Arc::new(MockSearch::new())).await;
  scholar.ingest(&fixture(SEARCH_FIXTURE).organic_results, 10).await?;

  let by_author = Query::by_author("JS Holt").execute(scholar.database()).await?;
  assert_eq!(titles(&by_author), vec!["The population biology of invasive species"]);

  let cited = Query::cited_more_than(10_000).execute(scholar.database()).await?;
  assert_eq!(titles(&cited), vec!["Population biology of plants"]);

  let by_id = Query::by_external_id("QvOS0mbsaN8J").execute(scholar.database()).await?;
  assert_eq!(by_id.len(), 1);
  Ok(())
}
