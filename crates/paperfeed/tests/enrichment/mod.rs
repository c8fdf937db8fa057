use paperfeed::{configuration::EnrichmentConfig, enrich::SummaryEnricher};

use super::*;

const GEMINI_RESPONSE: &str = include_str!("../data/gemini_response.json");

fn enricher_for(server: &MockServer) -> SummaryEnricher {
  let config = EnrichmentConfig {
    endpoint: format!("{}/v1beta", server.base_url),
    request_timeout_secs: 5,
    ..EnrichmentConfig::default()
  };
  SummaryEnricher::new(&config, Some("test-key".to_string())).unwrap()
}

#[tokio::test]
async fn test_generated_summary() {
  let server = MockServer::start(vec![Canned::new(200, "application/json", GEMINI_RESPONSE)]).await;
  let enricher = enricher_for(&server);

  let outcome = enricher.enrich("Prompt Injection Attacks", "We study prompt injection.").await;
  let summary = match outcome {
    Enrichment::Generated(summary) => summary,
    other => panic!("expected a generated summary, got {other:?}"),
  };
  assert!(summary.starts_with("## Özet\n\n- **Prompt Injection**"));
  assert!(summary.ends_with("savunmaların çoğunu aşar."));

  let requests = server.requests.lock().unwrap();
  let request = &requests[0];
  assert!(request.starts_with("POST /v1beta/models/gemini-1.5-flash:generateContent HTTP/1.1"));
  assert!(request.contains("x-goog-api-key: test-key"));

  let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
  let body: serde_json::Value = serde_json::from_str(body).unwrap();
  let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
  assert!(prompt.contains("Paper title: Prompt Injection Attacks"));
  assert!(prompt.contains("We study prompt injection."));
  assert_eq!(body["generationConfig"]["maxOutputTokens"], 1024);
}

#[tokio::test]
async fn test_service_error_is_a_failed_outcome() {
  let error = r#"{
    "error": {
      "code": 429,
      "message": "Resource has been exhausted (e.g. check quota).",
      "status": "RESOURCE_EXHAUSTED"
    }
  }"#;
  let server = MockServer::start(vec![Canned::new(429, "application/json", error)]).await;

  let outcome = enricher_for(&server).enrich("Title", "Abstract").await;
  assert!(matches!(
    &outcome,
    Enrichment::Failed(FeedError::ApiError(message)) if message.starts_with("RESOURCE_EXHAUSTED")
  ));
  assert_eq!(outcome.into_text("Abstract"), "Abstract");
}

#[tokio::test]
async fn test_blocked_answer_is_a_failed_outcome() {
  let blocked = r#"{ "promptFeedback": { "blockReason": "SAFETY" } }"#;
  let server = MockServer::start(vec![Canned::new(200, "application/json", blocked)]).await;

  let outcome = enricher_for(&server).enrich("Title", "Abstract").await;
  assert!(matches!(outcome, Enrichment::Failed(FeedError::ApiError(_))));
}

#[tokio::test]
async fn test_pipeline_falls_back_per_paper() -> TestResult<()> {
  let server = MockServer::start(vec![
    Canned::new(200, "application/json", GEMINI_RESPONSE),
    Canned::new(500, "application/json", r#"{ "error": { "message": "Internal error" } }"#),
  ])
  .await;
  let (_dir, config) = create_test_setup();
  let source = StaticSource(vec![paper("b", "2025-01-02"), paper("a", "2025-01-01")]);

  let report = run_once(&config, source, enricher_for(&server)).await?;
  assert_eq!(report.generated, 1);
  assert_eq!(report.fallbacks, 1);

  let papers = stored(&config).await;
  assert!(papers[0].content.tr.starts_with("## Özet"));
  assert_eq!(papers[1].content.tr, "Abstract of a.");
  Ok(())
}
