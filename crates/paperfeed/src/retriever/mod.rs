//! Retrieval of recent papers from a search index.
//!
//! A [`PaperSource`] turns a [`FetchRequest`] (query, result cap, optional lookback window) into
//! [`Paper`]s sorted newest first. [`Arxiv`] is the production source; tests substitute their own
//! implementations.
//!
//! # Examples
//!
//! ```no_run
//! use paperfeed::{
//!   configuration::SourceConfig,
//!   prelude::*,
//!   retriever::{Arxiv, FetchRequest},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let arxiv = Arxiv::new(&SourceConfig::default())?;
//! let request = FetchRequest::new("cat:cs.CR", 20).with_lookback(chrono::Duration::days(3));
//!
//! for paper in arxiv.fetch(&request).await? {
//!   println!("{} {}", paper.published_date, paper.title);
//! }
//! # Ok(())
//! # }
//! ```

use super::*;
use crate::configuration::SourceConfig;

pub mod atom;

use atom::{parse_feed, Entry};

/// Parameters of one fetch.
#[derive(Debug, Clone)]
pub struct FetchRequest {
  /// Boolean filter over category labels, e.g. `cat:cs.CR AND cat:cs.AI`
  pub query:       String,
  /// Maximum number of papers returned
  pub max_results: usize,
  /// Papers submitted before `now - lookback` are dropped
  pub lookback:    Option<chrono::Duration>,
  /// Reference time for the lookback window
  pub now:         DateTime<Utc>,
}

impl FetchRequest {
  /// A request without lookback window, anchored at the current time.
  pub fn new(query: impl Into<String>, max_results: usize) -> Self {
    Self { query: query.into(), max_results, lookback: None, now: Utc::now() }
  }

  /// The request described by a run configuration.
  pub fn from_config(config: &Config) -> Self {
    Self {
      query:       config.query.clone(),
      max_results: config.max_results,
      lookback:    config.lookback(),
      now:         Utc::now(),
    }
  }

  /// Sets the lookback window.
  pub fn with_lookback(mut self, lookback: chrono::Duration) -> Self {
    self.lookback = Some(lookback);
    self
  }

  /// Moves the reference time of the lookback window.
  pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
    self.now = now;
    self
  }

  /// Oldest submission time still accepted, if a window is set.
  ///
  /// A window reaching past the earliest representable time has no cutoff.
  pub fn cutoff(&self) -> Option<DateTime<Utc>> {
    self.lookback.and_then(|lookback| self.now.checked_sub_signed(lookback))
  }

  /// Whether a submission time falls inside the window.
  ///
  /// Only timestamps strictly older than the cutoff are rejected.
  pub fn accepts(&self, published: DateTime<Utc>) -> bool {
    self.cutoff().map_or(true, |cutoff| published >= cutoff)
  }
}

/// A search index that yields recent papers.
///
/// Failures are returned as errors and are fatal for the run; an empty result is not a failure.
#[async_trait]
pub trait PaperSource: Send + Sync {
  /// Fetches papers matching `request`, newest first, at most `request.max_results` of them.
  async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Paper>>;
}

/// Client for the arXiv Atom query API.
#[derive(Debug, Clone)]
pub struct Arxiv {
  /// Shared HTTP client with the configured timeout
  client:     reqwest::Client,
  /// Query endpoint
  endpoint:   Url,
  /// Results requested per page
  page_size:  usize,
  /// Pause between page requests
  page_delay: Duration,
}

impl Arxiv {
  /// Creates a client from the source settings.
  pub fn new(config: &SourceConfig) -> Result<Self> {
    let endpoint = Url::parse(&config.endpoint)
      .map_err(|e| FeedError::Config(format!("Invalid arXiv endpoint `{}`: {e}", config.endpoint)))?;
    let client = reqwest::Client::builder()
      .timeout(config.request_timeout())
      .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(Self { client, endpoint, page_size: config.page_size.max(1), page_delay: config.page_delay() })
  }

  /// URL of the page starting at result `start` with `size` results.
  pub fn page_url(&self, query: &str, start: usize, size: usize) -> Url {
    let mut url = self.endpoint.clone();
    url
      .query_pairs_mut()
      .append_pair("search_query", query)
      .append_pair("start", &start.to_string())
      .append_pair("max_results", &size.to_string())
      .append_pair("sortBy", "submittedDate")
      .append_pair("sortOrder", "descending");
    url
  }

  /// Requests and parses one page of results.
  async fn fetch_page(&self, query: &str, start: usize, size: usize) -> Result<atom::Feed> {
    let url = self.page_url(query, start, size);
    debug!("Fetching arXiv page via: {url}");

    let response = self.client.get(url).send().await?;
    let status = response.status();
    let body = response.text().await?;
    trace!("arXiv response: {body}");

    if !status.is_success() {
      return Err(FeedError::ApiError(format!("arXiv returned status {status}")));
    }
    parse_feed(&body)
  }
}

#[async_trait]
impl PaperSource for Arxiv {
  async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Paper>> {
    info!("Querying arXiv: {}", request.query);
    if let Some(cutoff) = request.cutoff() {
      info!("Keeping papers submitted since {}", cutoff.format("%Y-%m-%d %H:%M"));
    }

    let mut entries: Vec<Entry> = Vec::new();
    let mut start = 0;
    while start < request.max_results {
      if start > 0 {
        tokio::time::sleep(self.page_delay).await;
      }

      let size = self.page_size.min(request.max_results - start);
      let page = self.fetch_page(&request.query, start, size).await?;
      let received = page.entries.len();
      let total = page.total_results;

      let reached_cutoff = page.entries.last().is_some_and(|entry| !request.accepts(entry.published));
      entries.extend(page.entries.into_iter().filter(|entry| request.accepts(entry.published)));
      start += received;

      if received == 0 || reached_cutoff || total.is_some_and(|total| start >= total) {
        break;
      }
    }

    let papers = select(entries, request)?;
    info!("{} papers found", papers.len());
    Ok(papers)
  }
}

/// Orders entries newest first, caps them and maps them to papers.
fn select(mut entries: Vec<Entry>, request: &FetchRequest) -> Result<Vec<Paper>> {
  entries.sort_by(|a, b| b.published.cmp(&a.published));
  entries.into_iter().take(request.max_results).map(Entry::into_paper).collect()
}
