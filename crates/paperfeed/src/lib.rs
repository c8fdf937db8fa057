//! Recent-paper ingestion with generated summaries.
//!
//! `paperfeed` keeps a JSON collection of recently submitted arXiv papers up to date:
//!
//! - Paper metadata retrieval from the arXiv Atom API
//! - Target-language summaries generated with Google Gemini
//! - Deduplicating merges against the previously stored collection
//! - A plain JSON store meant to be served as-is to a web front end
//!
//! # Features
//!
//! - **Lookback windows**: only keep papers submitted in the last `n` days
//! - **Graceful degradation**: without an API key, or when a request fails, the original abstract is
//!   stored in place of the summary
//! - **Two store modes**: append new papers to the history, or replace it with the current batch
//! - **Rate-limit pacing**: a fixed pause after every call to the generative service
//!
//! # Getting Started
//!
//! ```no_run
//! use paperfeed::{
//!   enrich::SummaryEnricher, pipeline::Pipeline, retriever::Arxiv, Config,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let config = Config::default().with_lookback_days(Some(3));
//!
//!   let source = Arxiv::new(&config.source)?;
//!   let enricher = SummaryEnricher::new(&config.enrichment, std::env::var("GEMINI_API_KEY").ok())?;
//!
//!   let report = Pipeline::new(&config, source, enricher).run().await?;
//!   println!("{} new papers, {:?} saved", report.fresh, report.saved);
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`paper`]: The stored record type
//! - [`retriever`]: The arXiv source and its Atom parser
//! - [`llm`]: Request and response types for the Gemini API
//! - [`enrich`]: Summary generation with explicit fallback outcomes
//! - [`merge`]: Deduplication and ordering of collections
//! - [`store`]: Loading and saving the JSON collection
//! - [`query`]: Filtering a stored collection
//! - [`pipeline`]: The fetch, enrich, merge, save run
//! - [`configuration`]: Run configuration

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  collections::HashSet,
  fmt::Display,
  path::{Path, PathBuf},
  str::FromStr,
  time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod configuration;
pub mod enrich;
pub mod error;
pub mod llm;
pub mod merge;
pub mod paper;
pub mod pipeline;
pub mod query;
pub mod retriever;
pub mod store;

pub use configuration::Config;

use crate::{enrich::*, error::*, merge::*, paper::*, retriever::*, store::*};

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use paperfeed::prelude::*;
///
/// async fn latest(source: &impl PaperSource, request: &FetchRequest) -> Result<usize, FeedError> {
///   Ok(source.fetch(request).await?.len())
/// }
/// ```
pub mod prelude {
  pub use crate::{
    enrich::Enricher,
    error::FeedError,
    retriever::{FetchRequest, PaperSource},
  };
}
