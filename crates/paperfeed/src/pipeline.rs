//! One ingestion run: load, fetch, enrich, merge, save.
//!
//! The run is strictly sequential. Papers are summarized one after another with a fixed pause
//! after every call to the generative service, and the store is written once, at the end.
//!
//! Failure handling:
//!
//! - a fetch error aborts the run before the store is touched
//! - a failed summary falls back to the original abstract and the run continues
//! - a store write error is returned after all other work is done
//!
//! # Examples
//!
//! ```no_run
//! use paperfeed::{enrich::SummaryEnricher, pipeline::Pipeline, retriever::Arxiv, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load(Config::default_path())?;
//! let source = Arxiv::new(&config.source)?;
//! let enricher = SummaryEnricher::new(&config.enrichment, None)?;
//!
//! let report = Pipeline::new(&config, source, enricher).run().await?;
//! println!("{report:?}");
//! # Ok(())
//! # }
//! ```

use super::*;

/// Counts describing a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
  /// Papers in the store before the run
  pub existing:  usize,
  /// Papers returned by the source
  pub fetched:   usize,
  /// Fetched papers that were enriched and added
  pub fresh:     usize,
  /// Summaries produced by the service
  pub generated: usize,
  /// Papers that kept their original abstract
  pub fallbacks: usize,
  /// Size of the saved collection, `None` when the store was left untouched
  pub saved:     Option<usize>,
}

/// Drives a run with a given source and enricher.
pub struct Pipeline<'a, S, E> {
  /// Run configuration
  config:   &'a Config,
  /// Where papers come from
  source:   S,
  /// Who writes the summaries
  enricher: E,
  /// Where the collection lives
  store:    Store,
}

impl<'a, S: PaperSource, E: Enricher> Pipeline<'a, S, E> {
  /// Creates a pipeline writing to `config.store_path`.
  pub fn new(config: &'a Config, source: S, enricher: E) -> Self {
    Self { config, source, enricher, store: Store::new(&config.store_path) }
  }

  /// The store this pipeline reads and writes.
  pub fn store(&self) -> &Store { &self.store }

  /// Runs once with the current time as lookback reference.
  pub async fn run(&self) -> Result<RunReport> {
    self.run_with(FetchRequest::from_config(self.config)).await
  }

  /// Runs once with an explicit fetch request.
  pub async fn run_with(&self, request: FetchRequest) -> Result<RunReport> {
    let mode = self.config.mode;
    let existing = self.store.load().await;
    let mut report = RunReport { existing: existing.len(), ..RunReport::default() };
    info!("{} papers already stored", report.existing);

    let fetched = self.source.fetch(&request).await?;
    report.fetched = fetched.len();
    if fetched.is_empty() {
      info!("No papers fetched, store left unchanged");
      return Ok(report);
    }

    let mut fresh = mode.fresh(&existing, fetched);
    report.fresh = fresh.len();

    let total = fresh.len();
    for (index, paper) in fresh.iter_mut().enumerate() {
      info!("[{}/{}] {}", index + 1, total, paper.short_title(60));

      let outcome = self.enricher.enrich(&paper.title, &paper.content.en).await;
      let called_service = outcome.called_service();
      match &outcome {
        Enrichment::Generated(_) => report.generated += 1,
        Enrichment::Failed(_) | Enrichment::Unavailable => report.fallbacks += 1,
      }
      let summary = outcome.into_text(&paper.content.en);
      paper.set_summary(summary);

      if called_service && self.enricher.is_live() && index + 1 < total {
        tokio::time::sleep(self.config.enrichment.pacing()).await;
      }
    }

    let combined = mode.combine(existing, fresh);
    self.store.save(&combined).await?;
    report.saved = Some(combined.len());
    Ok(report)
  }
}

impl Display for RunReport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "existing: {}, fetched: {}, new: {} ({} generated, {} fallback), ",
      self.existing, self.fetched, self.fresh, self.generated, self.fallbacks
    )?;
    match self.saved {
      Some(saved) => write!(f, "saved: {saved}"),
      None => write!(f, "saved: nothing"),
    }
  }
}
