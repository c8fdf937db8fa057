//! Target-language summaries for fetched papers.
//!
//! An [`Enricher`] never fails a run. Each call returns an [`Enrichment`] that says what happened,
//! and the caller picks the text to store with [`Enrichment::into_text`], falling back to the
//! original abstract whenever no summary was generated.
//!
//! [`SummaryEnricher`] is the Gemini-backed implementation. Without an API key it stays inert and
//! every paper keeps its original abstract.
//!
//! # Examples
//!
//! ```no_run
//! use paperfeed::{configuration::EnrichmentConfig, enrich::SummaryEnricher, prelude::*};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let enricher = SummaryEnricher::new(&EnrichmentConfig::default(), Some("my-key".to_string()))?;
//!
//! let abstract_text = "We show that ...";
//! let summary = enricher.enrich("A Paper Title", abstract_text).await.into_text(abstract_text);
//! # Ok(())
//! # }
//! ```

use super::*;
use crate::{configuration::EnrichmentConfig, llm::GenerateRequest};

/// Outcome of one enrichment attempt.
#[derive(Debug)]
pub enum Enrichment {
  /// The service produced a summary
  Generated(String),
  /// The service was called and failed
  Failed(FeedError),
  /// No call was made because the enricher is not configured
  Unavailable,
}

impl Enrichment {
  /// The text to store: the generated summary, or `fallback` if there is none.
  pub fn into_text(self, fallback: &str) -> String {
    match self {
      Enrichment::Generated(text) => text,
      Enrichment::Failed(_) | Enrichment::Unavailable => fallback.to_string(),
    }
  }

  /// Whether the remote service was contacted for this outcome.
  pub fn called_service(&self) -> bool { !matches!(self, Enrichment::Unavailable) }
}

/// Produces a target-language text for a paper's title and abstract.
#[async_trait]
pub trait Enricher: Send + Sync {
  /// Whether calls reach a remote service, and must therefore be paced.
  fn is_live(&self) -> bool;

  /// Summarizes one paper.
  async fn enrich(&self, title: &str, text: &str) -> Enrichment;
}

/// The instruction sent with every paper.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
  /// Language of the summary
  pub language:           String,
  /// Heading the summary opens with
  pub heading:            String,
  /// Terms kept in their original form
  pub untranslated_terms: Vec<String>,
  /// Word limit
  pub max_words:          usize,
}

impl PromptTemplate {
  /// Takes the template settings from the enrichment configuration.
  pub fn from_config(config: &EnrichmentConfig) -> Self {
    Self {
      language:           config.target_language.clone(),
      heading:            config.heading.clone(),
      untranslated_terms: config.untranslated_terms.clone(),
      max_words:          config.max_words,
    }
  }

  /// Renders the full prompt for one paper.
  pub fn render(&self, title: &str, abstract_text: &str) -> String {
    let language = &self.language;
    let terms = if self.untranslated_terms.is_empty() {
      "Keep established technical terms in their original English form".to_string()
    } else {
      format!(
        "Keep these technical terms exactly as written, without translating them: {}",
        self.untranslated_terms.join(", ")
      )
    };

    format!(
      "Write a {language} summary of the following academic paper.

Rules:
1. Write in Markdown: start with a \"## {heading}\" heading, then use bullet points and **bold** \
       text for key ideas.
2. Summarize the main contribution, the methodology and the results.
3. {terms}. For other technical terms give the {language} equivalent followed by the English term \
       in parentheses.
4. Use at most {max_words} words.
5. Use an academic but accessible tone.

Paper title: {title}

Abstract:
{abstract_text}

{language} summary:",
      heading = self.heading,
      max_words = self.max_words,
    )
  }
}

/// Gemini-backed enricher.
#[derive(Debug, Clone)]
pub struct SummaryEnricher {
  /// HTTP client and key; `None` when no key was configured
  remote:   Option<Remote>,
  /// Instruction template
  template: PromptTemplate,
  /// Endpoint, model and sampling settings
  config:   EnrichmentConfig,
}

/// Everything needed to reach the service.
#[derive(Clone)]
struct Remote {
  /// Shared HTTP client
  client:  reqwest::Client,
  /// Gemini API key
  api_key: String,
}

impl std::fmt::Debug for Remote {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Remote").field("client", &self.client).field("api_key", &"<redacted>").finish()
  }
}

impl SummaryEnricher {
  /// Creates the enricher.
  ///
  /// A missing or blank `api_key` is not an error: the enricher is then inert, which is logged
  /// once here.
  pub fn new(config: &EnrichmentConfig, api_key: Option<String>) -> Result<Self> {
    let remote = match api_key.filter(|key| !key.trim().is_empty()) {
      Some(api_key) => {
        let client = reqwest::Client::builder().timeout(config.request_timeout()).build()?;
        Some(Remote { client, api_key })
      },
      None => {
        warn!(
          "No Gemini API key configured; {} summaries will not be generated and abstracts are \
           stored untranslated",
          config.target_language
        );
        None
      },
    };
    Ok(Self { remote, template: PromptTemplate::from_config(config), config: config.clone() })
  }

  /// The prompt template in use.
  pub fn template(&self) -> &PromptTemplate { &self.template }
}

#[async_trait]
impl Enricher for SummaryEnricher {
  fn is_live(&self) -> bool { self.remote.is_some() }

  async fn enrich(&self, title: &str, text: &str) -> Enrichment {
    let Some(remote) = &self.remote else {
      return Enrichment::Unavailable;
    };

    let request = GenerateRequest::new()
      .with_endpoint(&self.config.endpoint)
      .with_model(&self.config.model)
      .with_api_key(&remote.api_key)
      .with_max_output_tokens(self.config.max_output_tokens)
      .with_temperature(self.config.temperature)
      .with_prompt(self.template.render(title, text));

    match request.send(&remote.client).await.and_then(|response| response.text()) {
      Ok(summary) => Enrichment::Generated(summary),
      Err(e) => {
        warn!("Gemini request failed for \"{title}\": {e}");
        Enrichment::Failed(e)
      },
    }
  }
}
