//! Filtering a stored collection.
//!
//! These are the filters the web front end offers: free text, tags that must all be present,
//! and a publication-date lower bound. Text search here is an exact case-insensitive substring
//! match; it does not tolerate typos the way the front end's fuzzy search does.
//!
//! # Examples
//!
//! ```
//! use paperfeed::query::Query;
//!
//! # fn example(papers: &[paperfeed::paper::Paper]) {
//! let hits = Query::new().text("fuzzing").tag("cs.LG").limit(10).apply(papers);
//! for paper in hits {
//!   println!("{}", paper.title);
//! }
//! # }
//! ```

use super::*;

/// A set of filters over papers; an empty query matches everything.
#[derive(Debug, Clone, Default)]
pub struct Query {
  /// Case-insensitive text searched in title, authors and both summaries
  text:  Option<String>,
  /// Tags that must all be present
  tags:  Vec<String>,
  /// Earliest publication date
  since: Option<NaiveDate>,
  /// Maximum number of results
  limit: Option<usize>,
}

impl Query {
  /// A query that matches every paper.
  pub fn new() -> Self { Self::default() }

  /// Requires `text` to appear in the title, an author name, or one of the summaries.
  pub fn text(mut self, text: &str) -> Self {
    let text = text.trim();
    self.text = (!text.is_empty()).then(|| text.to_lowercase());
    self
  }

  /// Requires `tag` among the paper's tags; repeated calls require every tag.
  pub fn tag(mut self, tag: &str) -> Self {
    self.tags.push(tag.to_string());
    self
  }

  /// Requires publication on or after `date`.
  pub fn since(mut self, date: NaiveDate) -> Self {
    self.since = Some(date);
    self
  }

  /// Returns at most `limit` papers.
  pub fn limit(mut self, limit: usize) -> Self {
    self.limit = Some(limit);
    self
  }

  /// Whether one paper passes every filter.
  pub fn matches(&self, paper: &Paper) -> bool {
    if let Some(since) = self.since {
      if paper.published_date < since {
        return false;
      }
    }
    if !self.tags.iter().all(|tag| paper.tags.contains(tag)) {
      return false;
    }
    match &self.text {
      Some(text) =>
        [paper.title.as_str(), paper.content.en.as_str(), paper.content.tr.as_str()]
          .into_iter()
          .chain(paper.authors.iter().map(String::as_str))
          .any(|field| field.to_lowercase().contains(text)),
      None => true,
    }
  }

  /// The matching papers, in collection order.
  pub fn apply<'a>(&self, papers: &'a [Paper]) -> Vec<&'a Paper> {
    let matches = papers.iter().filter(|paper| self.matches(paper));
    match self.limit {
      Some(limit) => matches.take(limit).collect(),
      None => matches.collect(),
    }
  }
}

/// Every tag used in the collection, sorted and without repeats.
pub fn all_tags(papers: &[Paper]) -> Vec<String> {
  let unique: HashSet<&String> = papers.iter().flat_map(|paper| paper.tags.iter()).collect();
  let mut tags: Vec<String> = unique.into_iter().cloned().collect();
  tags.sort();
  tags
}
