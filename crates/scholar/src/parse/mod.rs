//! Heuristic parsers for the loosely structured text fields of search results.
//!
//! - [`PublicationSummary`]: the `"authors - venue, year - publisher"` summary line
//! - [`AuthorList`]: comma/semicolon separated author strings, with truncation detection
//!
//! Both parsers are total: they never return an error, only degraded output.

use super::*;

pub mod authors;
pub mod summary;

pub use self::{
  authors::AuthorList,
  summary::{normalize_whitespace, PublicationSummary},
};
