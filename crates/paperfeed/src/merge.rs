//! Deduplication and ordering of paper collections.
//!
//! A run consults the merger twice: first to pick the fetched papers that still need a summary
//! ([`MergeMode::fresh`]), then to fold those papers into the collection that gets saved
//! ([`MergeMode::combine`]). The `id` of a paper is the only key used for deduplication.
//!
//! # Examples
//!
//! ```
//! use paperfeed::{merge::MergeMode, paper::Paper};
//!
//! fn run(existing: Vec<Paper>, fetched: Vec<Paper>) -> Vec<Paper> {
//!   let mode = MergeMode::Merge;
//!   let fresh = mode.fresh(&existing, fetched);
//!   // ... summarize `fresh` here ...
//!   mode.combine(existing, fresh)
//! }
//! ```

use super::*;

/// What a run does with the papers already in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
  /// Append unknown papers to the stored history
  #[default]
  Merge,
  /// Overwrite the store with the current batch only
  Replace,
}

impl MergeMode {
  /// The fetched papers that need enrichment.
  ///
  /// In [`MergeMode::Merge`] these are the papers whose id is not stored yet. Stored papers are
  /// never handed out again, even when their summary is still empty. In [`MergeMode::Replace`]
  /// every fetched paper is returned. Repeated ids inside `fetched` keep their first occurrence.
  pub fn fresh(&self, existing: &[Paper], fetched: Vec<Paper>) -> Vec<Paper> {
    let mut seen: HashSet<String> = match self {
      MergeMode::Merge => existing.iter().map(|paper| paper.id.clone()).collect(),
      MergeMode::Replace => HashSet::new(),
    };
    let fetched_count = fetched.len();
    let fresh: Vec<Paper> = fetched.into_iter().filter(|paper| seen.insert(paper.id.clone())).collect();

    debug!("{} of {} fetched papers are new ({self} mode)", fresh.len(), fetched_count);
    fresh
  }

  /// The collection to persist, sorted by [`sort_by_date`].
  ///
  /// In [`MergeMode::Merge`] this is every existing paper plus the fresh papers with unknown ids;
  /// an existing paper is never overwritten by a fresh one. In [`MergeMode::Replace`] the existing
  /// papers are dropped.
  pub fn combine(&self, existing: Vec<Paper>, fresh: Vec<Paper>) -> Vec<Paper> {
    let mut combined = match self {
      MergeMode::Merge => {
        let mut seen: HashSet<String> = existing.iter().map(|paper| paper.id.clone()).collect();
        let mut combined = existing;
        let before = combined.len();
        combined.extend(fresh.into_iter().filter(|paper| seen.insert(paper.id.clone())));
        info!("{} new papers added", combined.len() - before);
        combined
      },
      MergeMode::Replace => {
        let kept: HashSet<&str> = fresh.iter().map(|paper| paper.id.as_str()).collect();
        let dropped = existing.iter().filter(|paper| !kept.contains(paper.id.as_str())).count();
        if dropped > 0 {
          warn!("Replace mode discards {dropped} stored papers outside the current batch");
        }
        let mut seen = HashSet::new();
        fresh.into_iter().filter(|paper| seen.insert(paper.id.clone())).collect()
      },
    };
    sort_by_date(&mut combined);
    combined
  }
}

impl Display for MergeMode {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      MergeMode::Merge => write!(f, "merge"),
      MergeMode::Replace => write!(f, "replace"),
    }
  }
}

impl FromStr for MergeMode {
  type Err = FeedError;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_lowercase().as_str() {
      "merge" | "append" => Ok(MergeMode::Merge),
      "replace" | "refresh" => Ok(MergeMode::Replace),
      other => Err(FeedError::Config(format!("Unknown mode `{other}`, expected merge or replace"))),
    }
  }
}

/// Sorts papers newest first by `published_date`.
///
/// Papers from the same day keep no particular order relative to each other.
pub fn sort_by_date(papers: &mut [Paper]) {
  papers.sort_by(|a, b| b.published_date.cmp(&a.published_date));
}
