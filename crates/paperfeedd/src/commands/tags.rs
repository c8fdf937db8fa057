//! Module for listing the tags of the stored collection.

use super::*;

/// Arguments for [`Commands::Tags`]
#[derive(Args, Clone)]
pub struct TagsArgs {
  /// Path of the JSON store
  #[arg(long)]
  pub store: Option<PathBuf>,
}

/// Function for the [`Commands::Tags`] in the CLI.
pub async fn tags(cli: &Cli, tags_args: TagsArgs) -> Result<()> {
  let store = open_store(cli, tags_args.store)?;
  let papers = store.load().await;
  reply(ResponseContent::Tags(&all_tags(&papers)));
  Ok(())
}
