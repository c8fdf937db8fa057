//! Run configuration.
//!
//! A [`Config`] is built once when the process starts, usually from a TOML file, and handed by
//! reference to every component of a run. Every field has a default, so an empty file (or
//! [`Config::default`]) describes the standard security-papers feed.
//!
//! The Gemini API key is deliberately not part of the file. It is passed to
//! [`SummaryEnricher::new`](crate::enrich::SummaryEnricher::new) separately.
//!
//! # Examples
//!
//! ```
//! use paperfeed::{merge::MergeMode, Config};
//!
//! let config: Config = toml::from_str(
//!   r#"
//!   max_results = 20
//!   mode = "replace"
//!
//!   [enrichment]
//!   target_language = "German"
//!   heading = "Zusammenfassung"
//!   "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.max_results, 20);
//! assert_eq!(config.mode, MergeMode::Replace);
//! assert_eq!(config.lookback_days, 7);
//! ```

use super::*;

/// Subject-area filter used when nothing else is configured: security crossed with AI, ML or
/// programming languages.
pub const DEFAULT_QUERY: &str = "cat:cs.CR AND (cat:cs.AI OR cat:cs.LG OR cat:cs.PL)";

/// Top-level configuration of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Boolean category filter sent to arXiv
  pub query:         String,
  /// Upper bound on the number of papers fetched per run
  pub max_results:   usize,
  /// Only papers submitted within this many days are kept; `0` disables the window
  pub lookback_days: u32,
  /// Whether new papers are appended to the store or replace it
  pub mode:          MergeMode,
  /// Location of the JSON store, relative paths resolve against the working directory
  pub store_path:    PathBuf,
  /// arXiv access settings
  pub source:        SourceConfig,
  /// Gemini settings
  pub enrichment:    EnrichmentConfig,
}

/// How the arXiv API is queried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
  /// Atom query endpoint
  pub endpoint:             String,
  /// Number of results requested per page
  pub page_size:            usize,
  /// Pause between consecutive page requests, in milliseconds
  pub page_delay_ms:        u64,
  /// Timeout applied to each HTTP request, in seconds
  pub request_timeout_secs: u64,
}

/// How summaries are requested from Gemini.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
  /// Base URL of the Generative Language API
  pub endpoint:             String,
  /// Model name, e.g. `gemini-1.5-flash`
  pub model:                String,
  /// Language the summaries are written in
  pub target_language:      String,
  /// Markdown heading that opens every summary
  pub heading:              String,
  /// Terms that must appear untranslated in the summary
  pub untranslated_terms:   Vec<String>,
  /// Word limit given to the model
  pub max_words:            usize,
  /// Token limit of the generated answer
  pub max_output_tokens:    u32,
  /// Sampling temperature
  pub temperature:          f64,
  /// Pause after each call to the service, in milliseconds
  pub pacing_ms:            u64,
  /// Timeout applied to each HTTP request, in seconds
  pub request_timeout_secs: u64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      query:         DEFAULT_QUERY.to_string(),
      max_results:   50,
      lookback_days: 7,
      mode:          MergeMode::Merge,
      store_path:    PathBuf::from("public").join("data.json"),
      source:        SourceConfig::default(),
      enrichment:    EnrichmentConfig::default(),
    }
  }
}

impl Default for SourceConfig {
  fn default() -> Self {
    Self {
      endpoint:             "http://export.arxiv.org/api/query".to_string(),
      page_size:            100,
      page_delay_ms:        3000,
      request_timeout_secs: 60,
    }
  }
}

impl Default for EnrichmentConfig {
  fn default() -> Self {
    Self {
      endpoint:             "https://generativelanguage.googleapis.com/v1beta".to_string(),
      model:                "gemini-1.5-flash".to_string(),
      target_language:      "Turkish".to_string(),
      heading:              "Özet".to_string(),
      untranslated_terms:   [
        "Large Language Model",
        "LLM",
        "Prompt Injection",
        "Jailbreak",
        "Backdoor",
        "Fuzzing",
        "Malware",
        "Side-Channel",
        "Zero-Knowledge Proof",
        "Federated Learning",
      ]
      .into_iter()
      .map(String::from)
      .collect(),
      max_words:            150,
      max_output_tokens:    1024,
      temperature:          0.7,
      pacing_ms:            1000,
      request_timeout_secs: 60,
    }
  }
}

impl Config {
  /// Default location of the configuration file.
  ///
  /// - On Unix: `~/.config/paperfeed/config.toml`
  /// - On macOS: `~/Library/Application Support/paperfeed/config.toml`
  /// - On Windows: `%APPDATA%\paperfeed\config.toml`
  /// - Fallback: `./paperfeed/config.toml`
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("paperfeed").join("config.toml")
  }

  /// Reads and validates a configuration file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    debug!("Loaded configuration from {}", path.as_ref().display());
    Ok(config)
  }

  /// Writes this configuration as TOML, creating missing parent directories.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(self)?)?;
    Ok(())
  }

  /// Rejects values no run could work with.
  pub fn validate(&self) -> Result<()> {
    if self.query.trim().is_empty() {
      return Err(FeedError::Config("`query` must not be empty".to_string()));
    }
    if self.max_results == 0 {
      return Err(FeedError::Config("`max_results` must be at least 1".to_string()));
    }
    if self.source.page_size == 0 {
      return Err(FeedError::Config("`source.page_size` must be at least 1".to_string()));
    }
    Ok(())
  }

  /// Replaces the query expression.
  pub fn with_query(mut self, query: impl Into<String>) -> Self {
    self.query = query.into();
    self
  }

  /// Replaces the result cap.
  pub fn with_max_results(mut self, max_results: usize) -> Self {
    self.max_results = max_results;
    self
  }

  /// Replaces the lookback window, `None` disables it.
  pub fn with_lookback_days(mut self, lookback_days: Option<u32>) -> Self {
    self.lookback_days = lookback_days.unwrap_or(0);
    self
  }

  /// Replaces the store mode.
  pub fn with_mode(mut self, mode: MergeMode) -> Self {
    self.mode = mode;
    self
  }

  /// Replaces the store location.
  pub fn with_store_path(mut self, path: impl AsRef<Path>) -> Self {
    self.store_path = path.as_ref().to_path_buf();
    self
  }

  /// Replaces the pause after each enrichment call.
  pub fn with_pacing(mut self, pacing: Duration) -> Self {
    self.enrichment.pacing_ms = u64::try_from(pacing.as_millis()).unwrap_or(u64::MAX);
    self
  }

  /// The lookback window as a chrono duration, if one is configured.
  pub fn lookback(&self) -> Option<chrono::Duration> {
    (self.lookback_days > 0).then(|| chrono::Duration::days(i64::from(self.lookback_days)))
  }
}

impl SourceConfig {
  /// Pause between page requests.
  pub fn page_delay(&self) -> Duration { Duration::from_millis(self.page_delay_ms) }

  /// Per-request timeout.
  pub fn request_timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }
}

impl EnrichmentConfig {
  /// Pause after each call to the generative service.
  pub fn pacing(&self) -> Duration { Duration::from_millis(self.pacing_ms) }

  /// Per-request timeout.
  pub fn request_timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }
}
