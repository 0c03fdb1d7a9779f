use scholar::error::ValidationError;

use super::*;

const HARPER_CITES: &str = "16055614372148427706";

fn citing_page() -> SearchResponse {
  SearchResponse {
    organic_results: vec![
      raw(
        "citing00001",
        "Plant strategies and vegetation processes",
        "JP Grime - 1979 - Wiley",
        9000,
      ),
      raw(
        "citing00002",
        "Demography of plant populations",
        "JL Harper, J White - Annual review of ecology, 1974 - JSTOR",
        1200,
      ),
    ],
    ..Default::default()
  }
}

#[traced_test]
#[tokio::test]
async fn test_search_and_ingest() -> TestResult<()> {
  let search = Arc::new(MockSearch::new().respond("plant population biology", fixture(SEARCH_FIXTURE)));
  let (scholar, _dir) = setup_scholar(search).await;

  let articles = scholar.search_and_ingest("plant population biology", 2).await?;
  assert_eq!(titles(&articles), vec![
    "Population biology of plants",
    "The population biology of invasive species"
  ]);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_search_and_ingest_surfaces_search_failure() -> TestResult<()> {
  let search = Arc::new(MockSearch::new().fail("unreachable", 503));
  let (scholar, _dir) = setup_scholar(search).await;

  let error = scholar.search_and_ingest("unreachable", 5).await.unwrap_err();
  assert!(matches!(error, ScholarError::Transport { status: 503, .. }));
  assert!(error.is_transport());
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_ingest_cited_by() -> TestResult<()> {
  let search = Arc::new(
    MockSearch::new()
      .respond("plant population biology", fixture(SEARCH_FIXTURE))
      .respond(HARPER_CITES, citing_page()),
  );
  let (scholar, _dir) = setup_scholar(search.clone()).await;

  let stored = scholar.search_and_ingest("plant population biology", 10).await?;
  let harper = stored[0].id.unwrap();

  let citing = scholar.ingest_cited_by(harper, 10).await?;
  assert_eq!(titles(&citing), vec![
    "Plant strategies and vegetation processes",
    "Demography of plant populations"
  ]);
  assert_eq!(search.calls(), vec!["plant population biology", HARPER_CITES]);

  // "JL Harper" now has the original work and the citing one.
  let author = AuthorQuery::by_name("JL Harper").execute(scholar.database()).await?;
  assert_eq!(author[0].article_count, 2);
  assert_eq!(author[0].total_citations, 16131 + 1200);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_ingest_cited_by_errors() -> TestResult<()> {
  let search = Arc::new(MockSearch::new().respond("plant population biology", fixture(SEARCH_FIXTURE)));
  let (scholar, _dir) = setup_scholar(search).await;
  let stored = scholar.search_and_ingest("plant population biology", 10).await?;

  let error = scholar.ingest_cited_by(9_999, 5).await.unwrap_err();
  assert!(matches!(error, ScholarError::NotFound { entity: "article", id: 9_999 }));

  // The third stored result carries no citation block.
  let uncited = stored[2].id.unwrap();
  let error = scholar.ingest_cited_by(uncited, 5).await.unwrap_err();
  assert!(matches!(error, ScholarError::InvalidInput(_)));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_save_article() -> TestResult<()> {
  let (scholar, _dir) = setup_scholar(Arc::new(MockSearch::new())).await;

  let article = Article::new("A manual entry", "Jane Doe and John Roe")
    .with_external_id("manual0001")
    .with_year(2020)
    .with_citations(7);
  let saved = scholar.save_article(article.clone()).await?;
  assert!(saved.id.is_some());

  let again = scholar.save_article(article).await?;
  assert_eq!(again.id, saved.id);

  let doe = AuthorQuery::by_name("Jane Doe").execute(scholar.database()).await?;
  assert_eq!(doe[0].article_count, 1);
  assert_eq!(doe[0].total_citations, 7);

  let error = scholar.save_article(Article::new("   ", "Jane Doe")).await.unwrap_err();
  assert!(matches!(error, ScholarError::Validation(ValidationError::MissingTitle)));

  let error = scholar.save_article(Article::new("Far future", "Jane Doe").with_year(3000)).await.unwrap_err();
  assert!(matches!(error, ScholarError::Validation(ValidationError::YearOutOfRange { .. })));
  Ok(())
}
