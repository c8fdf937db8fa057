//! Module for writing a default [`Config`] file.

use super::*;

/// Arguments for [`Commands::Init`]
#[derive(Args, Clone)]
pub struct InitArgs {
  /// Overwrite an existing configuration file
  #[arg(long)]
  pub force: bool,
}

/// Function for the [`Commands::Init`] in the CLI.
pub async fn init(cli: &Cli, init_args: InitArgs) -> Result<()> {
  let path = cli.config_path();
  if path.exists() && !init_args.force {
    reply(ResponseContent::Warning(&format!(
      "Configuration already exists at {}, pass --force to overwrite it",
      path.display()
    )));
    return Ok(());
  }

  let config = Config::default();
  config.save(&path)?;

  reply(ResponseContent::Success(&format!("Created configuration at {}", path.display())));
  reply(ResponseContent::Info(&format!(
    "Papers will be stored in {} (relative to the working directory)",
    config.store_path.display()
  )));
  reply(ResponseContent::Info("Set GEMINI_API_KEY, or add it to a .env file, to enable summaries"));
  Ok(())
}
