//! Module for browsing the stored collection.

use super::*;

/// Arguments for [`Commands::List`]
#[derive(Args, Clone)]
pub struct ListArgs {
  /// Case-insensitive text to look for in titles, authors and summaries
  #[arg(long, short)]
  pub search: Option<String>,

  /// Only papers carrying this tag, repeat to require several
  #[arg(long = "tag", short)]
  pub tags: Vec<String>,

  /// Only papers published on or after this date (YYYY-MM-DD)
  #[arg(long)]
  pub since: Option<NaiveDate>,

  /// Show at most this many papers
  #[arg(long, short = 'n')]
  pub limit: Option<usize>,

  /// Path of the JSON store
  #[arg(long)]
  pub store: Option<PathBuf>,
}

/// Function for the [`Commands::List`] in the CLI.
pub async fn list(cli: &Cli, list_args: ListArgs) -> Result<()> {
  let ListArgs { search, tags, since, limit, store } = list_args;

  let store = open_store(cli, store)?;
  if !store.exists() {
    reply(ResponseContent::Warning(&format!("No store at {}", store.path().display())));
  }
  let papers = store.load().await;

  let mut query = Query::new();
  if let Some(text) = &search {
    query = query.text(text);
  }
  for tag in &tags {
    query = query.tag(tag);
  }
  if let Some(since) = since {
    query = query.since(since);
  }
  if let Some(limit) = limit {
    query = query.limit(limit);
  }

  let hits = query.apply(&papers);
  info!("{} of {} stored papers match", hits.len(), papers.len());
  reply(ResponseContent::Papers(&hits));
  Ok(())
}
