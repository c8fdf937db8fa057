//! Module for a single pipeline run.

use super::*;

/// Arguments for [`Commands::Run`], each overriding the configuration file
#[derive(Args, Clone)]
pub struct RunArgs {
  /// Append new papers to the store (merge) or overwrite it with this batch (replace)
  #[arg(long)]
  pub mode: Option<MergeMode>,

  /// Maximum number of papers to fetch
  #[arg(long)]
  pub max_results: Option<usize>,

  /// Only keep papers submitted within this many days, 0 keeps everything
  #[arg(long, conflicts_with = "no_lookback")]
  pub lookback_days: Option<u32>,

  /// Keep papers regardless of their submission date
  #[arg(long)]
  pub no_lookback: bool,

  /// Path of the JSON store
  #[arg(long)]
  pub store: Option<PathBuf>,

  /// Gemini API key, summaries are skipped without one
  #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
  pub api_key: Option<String>,
}

/// Function for the [`Commands::Run`] in the CLI.
pub async fn run(cli: &Cli, run_args: RunArgs) -> Result<()> {
  let RunArgs { mode, max_results, lookback_days, no_lookback, store, api_key } = run_args;

  let mut config = load_config(cli)?;
  if let Some(mode) = mode {
    config = config.with_mode(mode);
  }
  if let Some(max_results) = max_results {
    config = config.with_max_results(max_results);
  }
  if no_lookback {
    config = config.with_lookback_days(None);
  } else if let Some(days) = lookback_days {
    config = config.with_lookback_days(Some(days));
  }
  if let Some(store) = store {
    config = config.with_store_path(store);
  }
  config.validate()?;

  let source = Arxiv::new(&config.source)?;
  let enricher = SummaryEnricher::new(&config.enrichment, api_key)?;
  if !enricher.is_live() {
    reply(ResponseContent::Warning("No Gemini API key, abstracts are stored without summaries"));
  }
  if config.mode == MergeMode::Replace {
    reply(ResponseContent::Warning("Replace mode, stored papers outside this batch are dropped"));
  }

  let window = match config.lookback_days {
    0 => String::new(),
    days => format!(" from the last {days} days"),
  };
  reply(ResponseContent::Info(&format!("Fetching up to {} papers{window}", config.max_results)));

  let pipeline = Pipeline::new(&config, source, enricher);
  let report = pipeline.run().await?;
  info!("Run finished: {report}");

  reply(ResponseContent::Report(&report, pipeline.store().path()));
  Ok(())
}
