//! Error types for the paperfeed library.
//!
//! Only a few of these ever reach the caller of a run. Fetch and store-write failures are fatal,
//! while failures of the generative service are folded into
//! [`Enrichment::Failed`](crate::enrich::Enrichment::Failed) and replaced by fallback text.
//!
//! # Examples
//!
//! ```
//! use paperfeed::{error::FeedError, retriever::atom::parse_feed};
//!
//! match parse_feed("<feed><entry><id>") {
//!   Err(FeedError::Xml(e)) => println!("Malformed feed: {e}"),
//!   Err(e) => println!("Other error: {e}"),
//!   Ok(feed) => println!("{} entries", feed.entries.len()),
//! }
//! ```

use thiserror::Error;

/// Error type alias used for the [`paperfeed`](crate) crate.
pub type Result<T> = core::result::Result<T, FeedError>;

/// Errors that can occur while fetching, enriching or storing papers.
#[derive(Error, Debug)]
pub enum FeedError {
  /// A network request failed.
  ///
  /// This covers unreachable hosts, TLS failures, timeouts and bodies that could not be decoded
  /// as the expected JSON.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// A remote API answered, but with an error.
  ///
  /// For arXiv this is either a non-success status or an error entry embedded in the feed. For
  /// Gemini it carries the `error.message` of the response, or a note that the response held no
  /// usable text.
  #[error("API error: {0}")]
  ApiError(String),

  /// The Atom feed was not well-formed XML.
  #[error(transparent)]
  Xml(#[from] quick_xml::Error),

  /// An attribute inside the Atom feed could not be read.
  #[error(transparent)]
  XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

  /// A feed entry was missing a field every paper needs.
  #[error("Feed entry is missing its {0}")]
  MissingField(&'static str),

  /// A timestamp or date could not be parsed.
  #[error("Invalid date: {0}")]
  InvalidDate(String),

  /// An identifier URI had no usable trailing path segment.
  #[error("Invalid identifier: {0}")]
  InvalidIdentifier(String),

  /// JSON (de)serialization failed.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// A file system operation failed.
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// A configuration file could not be parsed.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// A configuration could not be written out.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),

  /// A configuration value is unusable.
  #[error("{0}")]
  Config(String),
}
