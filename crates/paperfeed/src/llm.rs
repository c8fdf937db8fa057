//! Client types for the Google Gemini `generateContent` API.
//!
//! This module only knows how to talk to the service: build a request, send it, and pull the
//! generated text out of the answer. What to ask for, and what to do when asking fails, lives in
//! [`enrich`](crate::enrich).
//!
//! # Examples
//!
//! ```no_run
//! use paperfeed::llm::GenerateRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let response = GenerateRequest::new()
//!   .with_model("gemini-1.5-flash")
//!   .with_api_key("my-key")
//!   .with_prompt("Summarize the Diffie-Hellman key exchange in one sentence.")
//!   .send(&reqwest::Client::new())
//!   .await?;
//!
//! println!("{}", response.text()?);
//! # Ok(())
//! # }
//! ```

use super::*;

/// Base URL used when no endpoint is set.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Request builder for Gemini text generation.
///
/// The body serializes to the JSON the API expects; endpoint, model and key are kept out of it.
#[derive(Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
  /// Conversation turns, a single user turn for our purposes
  pub contents:          Vec<RequestContent>,
  /// Sampling and length settings
  pub generation_config: GenerationConfig,

  /// Base URL of the API; [`DEFAULT_ENDPOINT`] with a warning if unset
  #[serde(skip)]
  pub endpoint: Option<String>,
  /// Model to run; sending fails if unset
  #[serde(skip)]
  pub model:    Option<String>,
  /// API key sent in the `x-goog-api-key` header; sending fails if unset
  #[serde(skip)]
  pub api_key:  Option<String>,
}

/// One turn of the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContent {
  /// Speaker of the turn, `user` for prompts
  pub role:  String,
  /// Text parts of the turn
  pub parts: Vec<Part>,
}

/// A text fragment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
  /// The text; absent for non-text parts
  #[serde(default)]
  pub text: Option<String>,
}

/// Generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
  /// Maximum number of tokens in the answer
  pub max_output_tokens: u32,
  /// Sampling temperature
  pub temperature:       f64,
}

impl Default for GenerationConfig {
  fn default() -> Self { Self { max_output_tokens: 1024, temperature: 0.7 } }
}

/// Successful answer of the service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
  /// Generated alternatives, usually one
  #[serde(default)]
  pub candidates:      Vec<Candidate>,
  /// Present when the prompt itself was blocked
  #[serde(default)]
  pub prompt_feedback: Option<PromptFeedback>,
}

/// One generated alternative.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
  /// Generated turn; missing when generation was stopped by a safety filter
  #[serde(default)]
  pub content:       Option<CandidateContent>,
  /// Why generation stopped, e.g. `STOP` or `SAFETY`
  #[serde(default)]
  pub finish_reason: Option<String>,
}

/// Parts of a generated turn.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
  /// Text parts
  #[serde(default)]
  pub parts: Vec<Part>,
}

/// Feedback about the prompt.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
  /// Set when the prompt was refused
  #[serde(default)]
  pub block_reason: Option<String>,
}

/// Error body returned with non-success statuses.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
  /// The error details
  error: ErrorDetail,
}

/// Details of a service error.
#[derive(Debug, Deserialize)]
struct ErrorDetail {
  /// Human readable message
  message: String,
  /// Status name, e.g. `RESOURCE_EXHAUSTED`
  #[serde(default)]
  status:  Option<String>,
}

impl std::fmt::Debug for GenerateRequest {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("GenerateRequest")
      .field("contents", &self.contents)
      .field("generation_config", &self.generation_config)
      .field("endpoint", &self.endpoint)
      .field("model", &self.model)
      .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
      .finish()
  }
}

impl GenerateRequest {
  /// Creates an empty request with default generation settings.
  pub fn new() -> Self { Self::default() }

  /// Sets the API base URL.
  pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
    self.endpoint = Some(endpoint.into());
    self
  }

  /// Sets the model.
  pub fn with_model(mut self, model: impl Into<String>) -> Self {
    self.model = Some(model.into());
    self
  }

  /// Sets the API key.
  pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
    self.api_key = Some(api_key.into());
    self
  }

  /// Adds a user turn with `prompt` as its only part.
  pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
    self.contents.push(RequestContent {
      role:  "user".to_string(),
      parts: vec![Part { text: Some(prompt.into()) }],
    });
    self
  }

  /// Limits the length of the answer.
  pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
    self.generation_config.max_output_tokens = max_output_tokens;
    self
  }

  /// Sets the sampling temperature.
  pub fn with_temperature(mut self, temperature: f64) -> Self {
    self.generation_config.temperature = temperature;
    self
  }

  /// The `generateContent` URL for the configured endpoint and model.
  pub fn url(&self) -> Result<Url> {
    let model = self.model.as_deref().ok_or_else(|| FeedError::Config("No model was chosen".into()))?;
    let endpoint = self.endpoint.as_deref().unwrap_or_else(|| {
      warn!("No endpoint set, using {DEFAULT_ENDPOINT}");
      DEFAULT_ENDPOINT
    });
    let url = format!("{}/models/{model}:generateContent", endpoint.trim_end_matches('/'));
    Url::parse(&url).map_err(|e| FeedError::Config(format!("Invalid Gemini endpoint `{url}`: {e}")))
  }

  /// Sends the request.
  ///
  /// # Errors
  ///
  /// - [`FeedError::Config`] if model or key is missing, or no prompt was added
  /// - [`FeedError::Network`] if the request fails or the answer is not valid JSON
  /// - [`FeedError::ApiError`] if the service answers with an error status
  pub async fn send(&self, client: &reqwest::Client) -> Result<GenerateResponse> {
    let url = self.url()?;
    let api_key =
      self.api_key.as_deref().ok_or_else(|| FeedError::Config("No API key was supplied".into()))?;
    if self.contents.is_empty() {
      return Err(FeedError::Config("No prompt was supplied".into()));
    }

    debug!("Sending generation request to {url}");
    let response = client.post(url).header("x-goog-api-key", api_key).json(self).send().await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await?;
      let message = match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(ErrorResponse { error }) => match error.status {
          Some(name) => format!("{name}: {}", error.message),
          None => error.message,
        },
        Err(_) => format!("Gemini returned status {status}"),
      };
      return Err(FeedError::ApiError(message));
    }

    let response: GenerateResponse = response.json().await?;
    trace!("Gemini response: {response:?}");
    Ok(response)
  }
}

impl GenerateResponse {
  /// The generated text of the first candidate, trimmed.
  ///
  /// # Errors
  ///
  /// Returns [`FeedError::ApiError`] when the prompt was blocked, there is no candidate, or the
  /// candidate holds no text.
  pub fn text(&self) -> Result<String> {
    if let Some(reason) = self.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_deref()) {
      return Err(FeedError::ApiError(format!("Prompt was blocked: {reason}")));
    }

    let candidate =
      self.candidates.first().ok_or_else(|| FeedError::ApiError("Response had no candidates".into()))?;
    let text: String = candidate
      .content
      .iter()
      .flat_map(|content| content.parts.iter())
      .filter_map(|part| part.text.as_deref())
      .collect();

    let text = text.trim();
    if text.is_empty() {
      let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
      return Err(FeedError::ApiError(format!("Response had no text (finish reason: {reason})")));
    }
    Ok(text.to_string())
  }
}
