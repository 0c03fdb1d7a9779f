use super::*;

mod batch;
mod facade;
mod ingest;

#[test]
fn test_search_fixture_deserialization() {
  let response = fixture(SEARCH_FIXTURE);
  assert!(response.is_success());
  assert_eq!(response.organic_results.len(), 4);
  assert!(response.profiles.is_empty());

  let invasive = &response.organic_results[1];
  assert_eq!(invasive.result_id.as_deref(), Some("x7Ukf2kZ5sYJ"));
  assert_eq!(invasive.cited_by().and_then(|cited| cited.total), Some(5180));
  assert_eq!(invasive.pdf_link(), Some("https://www.researchgate.net/invasive-species.pdf"));

  assert!(response.organic_results[3].summary().is_none());
}

#[test]
fn test_profiles_fixture_first_match() {
  let response = fixture(PROFILES_FIXTURE);
  assert_eq!(response.profiles.len(), 2);

  let works = response.first_match().unwrap();
  assert_eq!(works.len(), 3);
  assert_eq!(works[0].result_id.as_deref(), Some("einstein1905a"));
}
