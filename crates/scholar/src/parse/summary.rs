//! Parsing of the composite publication summary line.
//!
//! Search results describe where a work appeared with one free-text line shaped like
//! `"<authors> - <venue>, <year> - <publisher>"`, for example:
//!
//! ```text
//! JL Harper - Population biology of plants., 1977 - cabdirect.org
//! ```
//!
//! [`PublicationSummary::parse`] splits that line into its parts. It never fails: anything it
//! cannot make sense of degrades to the `Unknown ...` placeholders.

use super::*;

/// Placeholder used when the authors segment is empty.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
/// Placeholder used when no venue can be recovered.
pub const UNKNOWN_SOURCE: &str = "Unknown Source";
/// Placeholder used when the publisher segment is empty or absent.
pub const UNKNOWN_PUBLISHER: &str = "Unknown Publisher";

/// Separator between the summary segments.
const SEGMENT_SEPARATOR: &str = " - ";

/// Oldest year recognized inside a venue segment.
const MIN_SUMMARY_YEAR: i32 = 1900;
/// Newest year recognized inside a venue segment.
const MAX_SUMMARY_YEAR: i32 = 2030;

lazy_static! {
  static ref YEAR_TOKEN: Regex = Regex::new(r"\b(?:19|20)\d{2}\b").unwrap();
}

/// Structured view of a publication summary line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationSummary {
  /// Display string of the authors, whitespace-normalized
  pub authors:   String,
  /// Journal, conference or book the work appeared in
  pub venue:     String,
  /// Publication year, when one could be found in the venue segment
  pub year:      Option<i32>,
  /// Hosting site or publisher
  pub publisher: String,
  /// The unmodified input line
  pub original:  String,
}

impl PublicationSummary {
  /// Parses a summary line into its authors, venue, year and publisher.
  ///
  /// The line is split on the literal `" - "` into at most three segments. The year is the
  /// first four-digit token between 1900 and 2030 found in the middle segment, and is cut out of
  /// the venue together with one adjoining comma.
  ///
  /// # Examples
  ///
  /// ```
  /// use scholar::parse::PublicationSummary;
  ///
  /// let summary =
  ///   PublicationSummary::parse("JL Harper - Population biology of plants., 1977 - cabdirect.org");
  /// assert_eq!(summary.authors, "JL Harper");
  /// assert_eq!(summary.venue, "Population biology of plants.");
  /// assert_eq!(summary.year, Some(1977));
  /// assert_eq!(summary.publisher, "cabdirect.org");
  /// ```
  pub fn parse(summary: &str) -> Self {
    if summary.trim().is_empty() {
      debug!("Empty publication summary, falling back to placeholders");
      return Self::unknown(summary);
    }

    let mut segments = summary.splitn(3, SEGMENT_SEPARATOR);
    let authors = segments.next().map(normalize_whitespace).unwrap_or_default();
    let venue_segment = segments.next().unwrap_or_default();
    let publisher = segments.next().map(normalize_whitespace).unwrap_or_default();

    let (venue, year) = split_venue_and_year(venue_segment);

    let parsed = Self {
      authors: or_placeholder(authors, UNKNOWN_AUTHOR),
      venue: or_placeholder(venue, UNKNOWN_SOURCE),
      year,
      publisher: or_placeholder(publisher, UNKNOWN_PUBLISHER),
      original: summary.to_string(),
    };
    trace!(?parsed, "Parsed publication summary");
    parsed
  }

  /// The all-placeholder result, keeping `original` as given.
  pub fn unknown(original: &str) -> Self {
    Self {
      authors:   UNKNOWN_AUTHOR.to_string(),
      venue:     UNKNOWN_SOURCE.to_string(),
      year:      None,
      publisher: UNKNOWN_PUBLISHER.to_string(),
      original:  original.to_string(),
    }
  }

  /// Whether the authors segment was missing and replaced by the placeholder.
  pub fn has_unknown_authors(&self) -> bool { self.authors == UNKNOWN_AUTHOR }
}

/// Collapses every whitespace run into a single space and trims the ends.
pub fn normalize_whitespace(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn or_placeholder(value: String, placeholder: &str) -> String {
  if value.is_empty() {
    placeholder.to_string()
  } else {
    value
  }
}

/// Finds the year in a venue segment and returns the venue with the year removed.
fn split_venue_and_year(segment: &str) -> (String, Option<i32>) {
  let found = YEAR_TOKEN.find_iter(segment).find_map(|m| {
    m.as_str()
      .parse::<i32>()
      .ok()
      .filter(|year| (MIN_SUMMARY_YEAR..=MAX_SUMMARY_YEAR).contains(year))
      .map(|year| (m.start(), m.end(), year))
  });

  let Some((start, end, year)) = found else {
    return (normalize_whitespace(segment), None);
  };

  // Drop one comma next to the year, preferring the one before it.
  let before = segment[..start].trim_end();
  let (before, after) = match before.strip_suffix(',') {
    Some(stripped) => (stripped, segment[end..].trim_start()),
    None => {
      let after = segment[end..].trim_start();
      (before, after.strip_prefix(',').unwrap_or(after))
    },
  };

  let joiner = if before.is_empty() || after.is_empty() || after.starts_with(',') { "" } else { " " };
  (normalize_whitespace(&format!("{before}{joiner}{after}")), Some(year))
}
