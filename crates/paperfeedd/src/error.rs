//! Error types for the paperfeed CLI.

use thiserror::Error;

use super::*;

/// Error type alias used for the CLI.
pub type Result<T> = core::result::Result<T, PaperfeedError>;

/// Errors that end a CLI invocation.
#[derive(Error, Debug)]
pub enum PaperfeedError {
  /// Any failure reported by the library.
  #[error(transparent)]
  Feed(#[from] FeedError),

  /// An explicitly requested configuration file does not exist.
  #[error("No configuration at {}. Run `paperfeed init` first", .0.display())]
  MissingConfig(PathBuf),
}
