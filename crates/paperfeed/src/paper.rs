//! The stored paper record.
//!
//! A [`Paper`] is the unit of the persisted collection and serializes to exactly the JSON shape the
//! web front end reads:
//!
//! ```json
//! {
//!   "id": "2412.12345v1",
//!   "title": "A Paper Title",
//!   "authors": ["Alice", "Bob"],
//!   "published_date": "2024-12-16",
//!   "tags": ["cs.CR", "cs.LG"],
//!   "link": "http://arxiv.org/abs/2412.12345v1",
//!   "pdf_link": "http://arxiv.org/pdf/2412.12345v1",
//!   "content": { "en": "Original abstract.", "tr": "" }
//! }
//! ```
//!
//! Records are created by the [`retriever`](crate::retriever), receive their summary exactly once
//! through [`Paper::set_summary`], and are left alone after they have been saved.

use super::*;

/// Maximum number of authors kept per paper.
pub const MAX_AUTHORS: usize = 5;

/// One paper together with its original and generated summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
  /// Unique identifier, the trailing segment of the source URI (e.g. `2412.12345v1`)
  pub id:             String,
  /// Single-line title
  pub title:          String,
  /// Up to [`MAX_AUTHORS`] author names, in source order
  pub authors:        Vec<String>,
  /// Submission day
  pub published_date: NaiveDate,
  /// Category labels, in source order
  pub tags:           Vec<String>,
  /// Canonical landing page
  pub link:           String,
  /// PDF location
  pub pdf_link:       String,
  /// Original abstract and generated summary
  pub content:        Content,
}

/// The two text bodies of a paper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
  /// Original-language abstract
  pub en: String,
  /// Target-language summary, empty until enrichment has run
  pub tr: String,
}

impl Paper {
  /// Whether the target-language summary has been filled in.
  pub fn is_enriched(&self) -> bool { !self.content.tr.is_empty() }

  /// Stores the target-language summary.
  pub fn set_summary(&mut self, summary: String) { self.content.tr = summary; }

  /// A title cut to `max` characters with an ellipsis, for progress output.
  pub fn short_title(&self, max: usize) -> String {
    if self.title.chars().count() <= max {
      self.title.clone()
    } else {
      let mut short: String = self.title.chars().take(max).collect();
      short.push_str("...");
      short
    }
  }
}

/// Collapses line breaks, and the indentation around them, into single spaces.
///
/// arXiv wraps long titles and abstracts over several indented lines; the stored record keeps
/// each on one line.
///
/// # Examples
///
/// ```
/// use paperfeed::paper::normalize_text;
///
/// assert_eq!(normalize_text("Attacks on\n  Large Language\r\n Models"), "Attacks on Large Language Models");
/// ```
pub fn normalize_text(text: &str) -> String {
  lazy_static! {
    static ref LINE_BREAK: Regex = Regex::new(r"[ \t]*\r?\n\s*").unwrap();
  }
  LINE_BREAK.replace_all(text.trim(), " ").into_owned()
}

/// Builds a paper with the given id and `YYYY-MM-DD` date for unit tests.
#[cfg(test)]
pub(crate) fn test_paper(id: &str, date: &str) -> Paper {
  Paper {
    id:             id.to_string(),
    title:          format!("Paper {id}"),
    authors:        vec!["Ada Lovelace".to_string()],
    published_date: date.parse().unwrap(),
    tags:           vec!["cs.CR".to_string()],
    link:           format!("http://arxiv.org/abs/{id}"),
    pdf_link:       format!("http://arxiv.org/pdf/{id}"),
    content:        Content { en: format!("Abstract of {id}."), tr: String::new() },
  }
}
