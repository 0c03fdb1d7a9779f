use super::*;

/// Helper function to set up a test database
async fn setup_test_db() -> (Database, PathBuf, tempfile::TempDir) {
  let dir = tempdir().unwrap();
  let path = dir.path().join("test.db");
  let db = Database::open(&path).await.unwrap();
  (db, path, dir)
}

fn sample(external_id: &str, citations: i64) -> Article {
  Article::new(format!("Article {external_id}"), "J Smith, B Jones")
    .with_external_id(external_id)
    .with_year(2001)
    .with_citations(citations)
}

#[traced_test]
#[tokio::test]
async fn test_database_creation() {
  let (db, path, _dir) = setup_test_db().await;
  assert!(path.exists());
  assert_eq!(db.path(), path.as_path());
  assert_eq!(db.admission().policy(), AdmissionPolicy::Pooled);
}

#[traced_test]
#[tokio::test]
async fn test_open_creates_parent_directories_and_is_idempotent() {
  let dir = tempdir().unwrap();
  let path = dir.path().join("a").join("b").join("test.db");

  let db = Database::open(&path).await.unwrap();
  db.acquire().await.unwrap().insert_article(&sample("abc", 1)).await.unwrap();
  drop(db);

  let db = Database::open(&path).await.unwrap();
  let stats = Stats.execute(&db).await.unwrap();
  assert_eq!(stats.articles, 1);
}

#[traced_test]
#[test]
fn test_default_path() {
  let path = Database::default_path();
  assert!(path.ends_with("scholar/scholar.db") || path.ends_with("scholar\\scholar.db"));
  assert!(path
    .parent()
    .unwrap()
    .starts_with(dirs::data_dir().unwrap_or_else(|| PathBuf::from("."))));
}

#[traced_test]
#[tokio::test]
async fn test_insert_and_find_by_external_id() {
  let (db, _path, _dir) = setup_test_db().await;
  let handle = db.acquire().await.unwrap();

  let stored = handle.insert_article(&sample("QvOS0mbsaN8J", 12)).await.unwrap();
  assert!(stored.id.is_some());

  let found = handle.find_by_external_id("QvOS0mbsaN8J").await.unwrap().unwrap();
  assert_eq!(found.id, stored.id);
  assert_eq!(found.title, "Article QvOS0mbsaN8J");
  assert_eq!(found.publication_year, Some(2001));
  assert_eq!(found.citation_count, 12);
  assert_eq!(found.created_at, stored.created_at);

  assert!(handle.find_by_external_id("missing").await.unwrap().is_none());
  assert_eq!(handle.find_article(stored.id.unwrap()).await.unwrap().unwrap().id, stored.id);
}

#[traced_test]
#[tokio::test]
async fn test_insert_rejects_empty_authors() {
  let (db, _path, _dir) = setup_test_db().await;
  let handle = db.acquire().await.unwrap();

  let err = handle.insert_article(&Article::new("Title", "")).await.unwrap_err();
  assert!(err.is_storage());
}

#[traced_test]
#[tokio::test]
async fn test_upsert_author_reuses_exact_name() {
  let (db, _path, _dir) = setup_test_db().await;
  let handle = db.acquire().await.unwrap();

  let first = handle.upsert_author_by_name("A. Einstein").await.unwrap();
  let again = handle.upsert_author_by_name("A. Einstein").await.unwrap();
  let other = handle.upsert_author_by_name("A Einstein").await.unwrap();

  assert_eq!(first.id, again.id);
  assert_ne!(first.id, other.id);
  assert_eq!(first.counters(), AuthorCounters::default());
}

#[traced_test]
#[tokio::test]
async fn test_link_overwrites_position() {
  let (db, _path, _dir) = setup_test_db().await;
  let handle = db.acquire().await.unwrap();

  let article = handle.insert_article(&sample("abc", 0)).await.unwrap();
  let article_id = article.id.unwrap();
  let smith = handle.upsert_author_by_name("J Smith").await.unwrap();
  let jones = handle.upsert_author_by_name("B Jones").await.unwrap();

  assert!(handle.link_author_to_article(article_id, smith.id, 0).await.unwrap());
  assert!(handle.link_author_to_article(article_id, jones.id, 1).await.unwrap());
  assert!(!handle.link_author_to_article(article_id, smith.id, 2).await.unwrap());
  drop(handle);

  let authors = AuthorQuery::of_article(article_id).execute(&db).await.unwrap();
  let names: Vec<_> = authors.iter().map(|author| author.full_name.as_str()).collect();
  assert_eq!(names, vec!["B Jones", "J Smith"]);
}

#[traced_test]
#[tokio::test]
async fn test_author_counters_round_trip() {
  let (db, _path, _dir) = setup_test_db().await;
  let handle = db.acquire().await.unwrap();

  let author = handle.upsert_author_by_name("M. Curie").await.unwrap();
  let counters = AuthorCounters { article_count: 3, total_citations: 120 };
  handle.write_author_counters(author.id, counters).await.unwrap();
  assert_eq!(handle.read_author_counters(author.id).await.unwrap(), counters);

  assert!(matches!(
    handle.read_author_counters(9999).await,
    Err(ScholarError::NotFound { entity: "author", id: 9999 })
  ));
  assert!(matches!(
    handle.write_author_counters(9999, counters).await,
    Err(ScholarError::NotFound { .. })
  ));
}

#[traced_test]
#[tokio::test]
async fn test_touch_article_only_updates_timestamp() {
  let (db, _path, _dir) = setup_test_db().await;
  let handle = db.acquire().await.unwrap();

  let stored = handle.insert_article(&sample("abc", 5)).await.unwrap();
  tokio::time::sleep(Duration::from_millis(5)).await;
  handle.touch_article(stored.id.unwrap()).await.unwrap();

  let touched = handle.find_article(stored.id.unwrap()).await.unwrap().unwrap();
  assert!(touched.updated_at > stored.updated_at);
  assert_eq!(touched.created_at, stored.created_at);
  assert_eq!(touched.citation_count, 5);

  assert!(matches!(handle.touch_article(777).await, Err(ScholarError::NotFound { .. })));
}

#[traced_test]
#[tokio::test]
async fn test_query_criteria() {
  let (db, _path, _dir) = setup_test_db().await;
  let handle = db.acquire().await.unwrap();

  let plants = handle
    .insert_article(
      &Article::new("Population Biology of Plants", "JL Harper").with_year(1977).with_citations(90),
    )
    .await
    .unwrap();
  let harper = handle.upsert_author_by_name("JL Harper").await.unwrap();
  handle.link_author_to_article(plants.id.unwrap(), harper.id, 0).await.unwrap();
  handle
    .insert_article(&Article::new("Animal ecology", "C Elton").with_year(1927).with_citations(10))
    .await
    .unwrap();
  drop(handle);

  let found = Query::title("plants").execute(&db).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].title, "Population Biology of Plants");

  assert_eq!(Query::by_author("JL Harper").execute(&db).await.unwrap().len(), 1);
  assert_eq!(Query::by_year(1927).execute(&db).await.unwrap()[0].authors, "C Elton");
  assert_eq!(Query::cited_more_than(10).execute(&db).await.unwrap().len(), 1);

  let ordered =
    Query::list_all().order_by(OrderField::Citations).descending().execute(&db).await.unwrap();
  assert_eq!(ordered[0].citation_count, 90);
  assert_eq!(ordered[1].citation_count, 10);

  let limited = Query::list_all().order_by(OrderField::Year).limit(1).execute(&db).await.unwrap();
  assert_eq!(limited.len(), 1);
  assert_eq!(limited[0].publication_year, Some(1927));

  let combined = Query::title("a")
    .and(QueryCriteria::Year(1977))
    .execute(&db)
    .await
    .unwrap();
  assert_eq!(combined.len(), 1);
}

#[traced_test]
#[tokio::test]
async fn test_remove_article_rolls_back_author_counters() {
  let (db, _path, _dir) = setup_test_db().await;
  let handle = db.acquire().await.unwrap();

  let first = handle.insert_article(&sample("first", 10)).await.unwrap();
  let second = handle.insert_article(&sample("second", 4)).await.unwrap();
  let author = handle.upsert_author_by_name("J Smith").await.unwrap();
  for article in [&first, &second] {
    handle.link_author_to_article(article.id.unwrap(), author.id, 0).await.unwrap();
  }
  handle
    .write_author_counters(author.id, AuthorCounters { article_count: 2, total_citations: 14 })
    .await
    .unwrap();
  drop(handle);

  let first_id = first.id.unwrap();
  assert_eq!(Remove::article(first_id).dry_run().execute(&db).await.unwrap(), 1);
  assert_eq!(Query::list_all().execute(&db).await.unwrap().len(), 2);

  assert_eq!(Remove::article(first_id).execute(&db).await.unwrap(), 1);
  assert_eq!(Remove::article(first_id).execute(&db).await.unwrap(), 0);

  let remaining = Query::list_all().execute(&db).await.unwrap();
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0].external_id.as_deref(), Some("second"));

  let handle = db.acquire().await.unwrap();
  assert_eq!(
    handle.read_author_counters(author.id).await.unwrap(),
    AuthorCounters { article_count: 1, total_citations: 4 }
  );
  assert!(handle.find_by_external_id("first").await.unwrap().is_none());
}

#[traced_test]
#[tokio::test]
async fn test_remove_author_and_top_queries() {
  let (db, _path, _dir) = setup_test_db().await;
  let handle = db.acquire().await.unwrap();

  for (name, count, citations) in [("A", 1, 50), ("B", 3, 10), ("C", 0, 0)] {
    let author = handle.upsert_author_by_name(name).await.unwrap();
    handle
      .write_author_counters(author.id, AuthorCounters {
        article_count:   count,
        total_citations: citations,
      })
      .await
      .unwrap();
  }
  drop(handle);

  let by_citations = AuthorQuery::top_by_citations(10).execute(&db).await.unwrap();
  let names: Vec<_> = by_citations.iter().map(|author| author.full_name.as_str()).collect();
  assert_eq!(names, vec!["A", "B"]);

  let by_articles = AuthorQuery::top_by_articles(1).execute(&db).await.unwrap();
  assert_eq!(by_articles[0].full_name, "B");

  let b = &AuthorQuery::by_name("B").execute(&db).await.unwrap()[0];
  assert_eq!(Remove::author(b.id).execute(&db).await.unwrap(), 1);
  assert!(AuthorQuery::by_name("B").execute(&db).await.unwrap().is_empty());
  assert_eq!(AuthorQuery::name_contains("a").execute(&db).await.unwrap().len(), 1);
}

#[traced_test]
#[tokio::test]
async fn test_stats() {
  let (db, _path, _dir) = setup_test_db().await;
  assert_eq!(Stats.execute(&db).await.unwrap(), StorageStats::default());

  let handle = db.acquire().await.unwrap();
  let article = handle.insert_article(&sample("abc", 7)).await.unwrap();
  let author = handle.upsert_author_by_name("J Smith").await.unwrap();
  handle.link_author_to_article(article.id.unwrap(), author.id, 0).await.unwrap();
  drop(handle);

  let stats = Stats.execute(&db).await.unwrap();
  assert_eq!(stats, StorageStats { articles: 1, authors: 1, links: 1, total_citations: 7 });
}

#[traced_test]
#[tokio::test]
async fn test_serialized_database_works_end_to_end() {
  let dir = tempdir().unwrap();
  let config = AdmissionConfig { policy: AdmissionPolicy::Serialized, pool_size: 1 };
  let db = Database::open_with(dir.path().join("serial.db"), &config).await.unwrap();

  let handle = db.acquire().await.unwrap();
  handle.insert_article(&sample("abc", 1)).await.unwrap();
  handle.release().await.unwrap();

  assert_eq!(Stats.execute(&db).await.unwrap().articles, 1);
  assert_eq!(db.admission().opened(), 3);
}
