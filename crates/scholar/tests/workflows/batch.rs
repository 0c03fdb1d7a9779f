use super::*;

fn queries(names: &[&str]) -> Vec<String> { names.iter().map(|name| name.to_string()).collect() }

#[traced_test]
#[tokio::test]
async fn test_failed_query_does_not_stop_batch() -> TestResult<()> {
  let search = MockSearch::new()
    .respond("M. Curie", profile("M. Curie", vec![raw(
      "curie1898",
      "On a new radioactive substance",
      "P Curie, M Curie, G Bémont - Comptes rendus, 1898 - Gallica",
      900,
    )]))
    .fail("Offline Person", 503)
    .respond("JL Harper", profile("JL Harper", vec![raw(
      "harper1977",
      "Population biology of plants",
      "JL Harper - Population biology of plants., 1977 - cabdirect.org",
      16131,
    )]));
  let search = Arc::new(search);
  let (scholar, _dir) = setup_scholar(search.clone()).await;

  let articles =
    scholar.run_batch(&queries(&["M. Curie", "Offline Person", "JL Harper"]), 10).await;

  assert_eq!(titles(&articles), vec![
    "On a new radioactive substance",
    "Population biology of plants"
  ]);
  assert_eq!(search.calls(), vec!["M. Curie", "Offline Person", "JL Harper"]);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_batch_uses_first_profile_only() -> TestResult<()> {
  let search = Arc::new(MockSearch::new().respond("Einstein", fixture(PROFILES_FIXTURE)));
  let (scholar, _dir) = setup_scholar(search).await;

  let articles = scholar.run_batch(&queries(&["Einstein"]), 10).await;
  assert_eq!(articles.len(), 3);
  assert!(articles.iter().all(|article| article.external_id.as_deref() != Some("mozart1945")));

  let einstein = AuthorQuery::by_name("A Einstein").execute(scholar.database()).await?;
  assert_eq!(einstein.len(), 1);
  assert_eq!(einstein[0].article_count, 3);
  assert_eq!(einstein[0].total_citations, 50_000);

  let rosen = AuthorQuery::by_name("N Rosen").execute(scholar.database()).await?;
  assert_eq!(rosen[0].article_count, 1);
  assert_eq!(rosen[0].total_citations, 30_000);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_batch_per_query_cap() -> TestResult<()> {
  let search = Arc::new(MockSearch::new().respond("Einstein", fixture(PROFILES_FIXTURE)));
  let (scholar, _dir) = setup_scholar(search).await;

  let articles = scholar.run_batch(&queries(&["Einstein"]), 2).await;
  assert_eq!(articles.len(), 2);
  assert_eq!(articles[0].external_id.as_deref(), Some("einstein1905a"));
  assert_eq!(articles[1].external_id.as_deref(), Some("epr1935"));
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_batch_edge_cases_return_nothing() -> TestResult<()> {
  let search = Arc::new(MockSearch::new().fail("Broken", 500));
  let (scholar, _dir) = setup_scholar(search).await;

  assert!(scholar.run_batch(&[], 10).await.is_empty());
  assert!(scholar.run_batch(&queries(&["Nobody Known"]), 10).await.is_empty());
  assert!(scholar.run_batch(&queries(&["Broken"]), 10).await.is_empty());
  assert!(scholar.run_batch(&queries(&["Nobody Known"]), 0).await.is_empty());

  assert_eq!(Stats.execute(scholar.database()).await?.articles, 0);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_zero_cap_batch_never_searches() -> TestResult<()> {
  let search = Arc::new(MockSearch::new().respond("Einstein", fixture(PROFILES_FIXTURE)));
  let (scholar, _dir) = setup_scholar(search.clone()).await;

  let articles = scholar.run_batch(&queries(&["Einstein", "JL Harper"]), 0).await;
  assert!(articles.is_empty());
  assert!(search.calls().is_empty());
  assert_eq!(Stats.execute(scholar.database()).await?.articles, 0);
  Ok(())
}

#[traced_test]
#[tokio::test]
async fn test_batch_shares_authors_across_queries() -> TestResult<()> {
  let shared = "J Smith, B Jones - Journal of Tests, 2020 - Publisher";
  let search = MockSearch::new()
    .respond("J Smith", profile("J Smith", vec![raw("paper00001", "First paper", shared, 10)]))
    .respond("B Jones", profile("B Jones", vec![
      raw("paper00001", "First paper", shared, 10),
      raw("paper00002", "Second paper", "B Jones - Journal of Tests, 2021 - Publisher", 5),
    ]));
  let (scholar, _dir) = setup_scholar(Arc::new(search)).await;

  let articles = scholar.run_batch(&queries(&["J Smith", "B Jones"]), 10).await;
  // The shared paper is reported by both queries but stored once.
  assert_eq!(articles.len(), 3);
  assert_eq!(articles[0].id, articles[1].id);

  let jones = AuthorQuery::by_name("B Jones").execute(scholar.database()).await?;
  assert_eq!(jones[0].article_count, 2);
  assert_eq!(jones[0].total_citations, 15);

  let smith = AuthorQuery::by_name("J Smith").execute(scholar.database()).await?;
  assert_eq!(smith[0].article_count, 1);
  assert_eq!(smith[0].total_citations, 10);
  Ok(())
}
