//! Subcommands of the `paperfeed` binary.

use super::*;

pub mod init;
pub mod list;
pub mod run;
pub mod tags;

pub use init::{init, InitArgs};
pub use list::{list, ListArgs};
pub use run::{run, RunArgs};
pub use tags::{tags, TagsArgs};

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Write a configuration file with default settings
  Init(InitArgs),

  /// Fetch recent papers, summarize the new ones and save the collection
  Run(RunArgs),

  /// Show stored papers, optionally filtered
  List(ListArgs),

  /// Show every tag used in the store
  Tags(TagsArgs),
}

/// Loads the configuration for a command.
///
/// A file passed with `--config` must exist. The default location may be missing, in which case
/// the built-in defaults apply.
pub fn load_config(cli: &Cli) -> Result<Config> {
  let path = cli.config_path();
  if path.is_file() {
    return Ok(Config::load(&path)?);
  }
  if cli.config.is_some() {
    return Err(PaperfeedError::MissingConfig(path));
  }
  debug!("No configuration at {}, using defaults", path.display());
  Ok(Config::default())
}

/// The store named by `--store`, or the one from the configuration.
pub fn open_store(cli: &Cli, store: Option<PathBuf>) -> Result<Store> {
  match store {
    Some(path) => Ok(Store::new(path)),
    None => Ok(Store::new(load_config(cli)?.store_path)),
  }
}
