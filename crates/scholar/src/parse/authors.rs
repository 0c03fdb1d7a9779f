//! Splitting of free-text author lists into individual names.
//!
//! Author strings arrive in many shapes:
//! - `"JF Ambros-Antemate, MDP Beristain-Colorado"`
//! - `"John Smith; Jane Doe; Bob Wilson"`
//! - `"A. Einstein and M. Curie"`
//! - `"J Smith, B Jones…"` (truncated by the upstream service)
//!
//! [`AuthorList::split`] handles all of them and reports whether the list was cut short.

use super::*;

lazy_static! {
  /// Two or more dots, an ellipsis character, or a whole-word "et al" with optional period.
  static ref TRUNCATION_MARKER: Regex = Regex::new(r"(?i)\.{2,}|…|\bet\s+al\b\.?").unwrap();
  static ref NAME_SEPARATOR: Regex = Regex::new(r"[,;]|\sand\s|\s&\s").unwrap();
  static ref NOT_A_NAME: Regex = Regex::new(r"^[\d\s.\-]+$").unwrap();
}

/// Ordered names extracted from a raw author string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorList {
  /// Validated names in the order they appear in the raw string
  pub names:     Vec<String>,
  /// Whether the raw string ended in an ellipsis or "et al"
  pub truncated: bool,
}

impl AuthorList {
  /// Splits a raw author string into validated names.
  ///
  /// Anything from the first truncation marker onward is discarded before splitting on
  /// `,`, `;`, `" and "` and `" & "`. Pieces shorter than two characters, pieces without a
  /// letter, and pieces made only of digits, spaces, hyphens and dots are dropped silently.
  ///
  /// # Examples
  ///
  /// ```
  /// use scholar::parse::AuthorList;
  ///
  /// let list = AuthorList::split("J Smith, B Jones…");
  /// assert_eq!(list.names, vec!["J Smith", "B Jones"]);
  /// assert!(list.truncated);
  ///
  /// let list = AuthorList::split("123, --, Jane Doe");
  /// assert_eq!(list.names, vec!["Jane Doe"]);
  /// assert!(!list.truncated);
  /// ```
  pub fn split(raw: &str) -> Self {
    let marker = TRUNCATION_MARKER.find(raw);
    let kept = marker.map_or(raw, |m| &raw[..m.start()]);

    let names: Vec<String> = NAME_SEPARATOR
      .split(kept)
      .map(clean_name)
      .filter(|name| {
        let valid = is_valid_name(name);
        if !valid && !name.is_empty() {
          trace!(piece = %name, "Dropping author piece that is not a name");
        }
        valid
      })
      .collect();

    Self { names, truncated: marker.is_some() }
  }

  /// Number of names that survived validation.
  pub fn len(&self) -> usize { self.names.len() }

  /// Whether no valid name was found.
  pub fn is_empty(&self) -> bool { self.names.is_empty() }
}

impl IntoIterator for AuthorList {
  type IntoIter = std::vec::IntoIter<String>;
  type Item = String;

  fn into_iter(self) -> Self::IntoIter { self.names.into_iter() }
}

fn clean_name(piece: &str) -> String {
  let collapsed = normalize_whitespace(piece);
  collapsed.replace('…', "").replace("...", "").trim().to_string()
}

fn is_valid_name(name: &str) -> bool {
  name.chars().count() >= 2 && name.chars().any(char::is_alphabetic) && !NOT_A_NAME.is_match(name)
}
