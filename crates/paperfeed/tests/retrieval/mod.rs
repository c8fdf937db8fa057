use chrono::{TimeZone, Utc};
use paperfeed::{configuration::SourceConfig, retriever::Arxiv};

use super::*;

const PAGE_1: &str = include_str!("../data/arxiv_page_1.xml");
const PAGE_2: &str = include_str!("../data/arxiv_page_2.xml");
const ERROR_PAGE: &str = include_str!("../data/arxiv_error.xml");

fn atom(body: &str) -> Canned { Canned::new(200, "application/atom+xml; charset=utf-8", body) }

fn arxiv_for(server: &MockServer) -> Arxiv {
  let config = SourceConfig {
    endpoint:             format!("{}/api/query", server.base_url),
    page_size:            2,
    page_delay_ms:        0,
    request_timeout_secs: 5,
  };
  Arxiv::new(&config).unwrap()
}

fn request(max_results: usize) -> FetchRequest {
  FetchRequest::new("cat:cs.CR", max_results)
    .with_now(Utc.with_ymd_and_hms(2025, 1, 20, 12, 0, 0).unwrap())
}

#[tokio::test]
async fn test_fetch_pages_until_total() -> TestResult<()> {
  let server = MockServer::start(vec![atom(PAGE_1), atom(PAGE_2)]).await;
  let papers = arxiv_for(&server).fetch(&request(3)).await?;

  assert_eq!(ids(&papers), ["2501.00003v1", "2501.00002v2", "2501.00001v1"]);

  let lines = server.request_lines();
  assert_eq!(lines.len(), 2);
  assert!(lines[0].starts_with("GET /api/query?search_query=cat%3Acs.CR&start=0&max_results=2"));
  assert!(lines[1].contains("start=2&max_results=1"));
  assert!(lines[1].contains("sortBy=submittedDate&sortOrder=descending"));
  Ok(())
}

#[tokio::test]
async fn test_fetched_papers_are_mapped() -> TestResult<()> {
  let server = MockServer::start(vec![atom(PAGE_1), atom(PAGE_2)]).await;
  let papers = arxiv_for(&server).fetch(&request(3)).await?;

  let injection = &papers[0];
  assert_eq!(injection.title, "Prompt Injection Attacks on Tool-Using Agents");
  assert_eq!(
    injection.content.en,
    "We study prompt injection against agents that call external tools. We show that <5% of \
     defenses survive adaptive attacks."
  );
  assert!(injection.content.tr.is_empty());
  assert_eq!(injection.authors, ["Alice Example", "Bob Example"]);
  assert_eq!(injection.tags, ["cs.CR", "cs.AI"]);
  assert_eq!(injection.published_date.to_string(), "2025-01-19");
  assert_eq!(injection.link, "http://arxiv.org/abs/2501.00003v1");
  assert_eq!(injection.pdf_link, "http://arxiv.org/pdf/2501.00003v1");

  assert_eq!(papers[1].pdf_link, "http://arxiv.org/pdf/2501.00002v2");
  assert_eq!(papers[2].authors.len(), 5);
  assert_eq!(papers[2].authors[4], "Heidi Example");
  Ok(())
}

#[tokio::test]
async fn test_lookback_excludes_old_papers() -> TestResult<()> {
  let server = MockServer::start(vec![atom(PAGE_1), atom(PAGE_2)]).await;
  let request = request(3).with_lookback(chrono::Duration::days(7));

  let papers = arxiv_for(&server).fetch(&request).await?;
  assert_eq!(ids(&papers), ["2501.00003v1", "2501.00002v2"]);
  assert_eq!(server.request_lines().len(), 2);
  Ok(())
}

#[tokio::test]
async fn test_paging_stops_at_cutoff() -> TestResult<()> {
  let server = MockServer::start(vec![atom(PAGE_1), atom(PAGE_2)]).await;
  let request = request(3).with_lookback(chrono::Duration::days(3));

  let papers = arxiv_for(&server).fetch(&request).await?;
  assert_eq!(ids(&papers), ["2501.00003v1"]);
  assert_eq!(server.request_lines().len(), 1);
  Ok(())
}

#[tokio::test]
async fn test_error_status_fails_fetch() {
  let server = MockServer::start(vec![Canned::new(503, "text/plain", "Service Unavailable")]).await;
  let result = arxiv_for(&server).fetch(&request(3)).await;
  assert!(matches!(result, Err(FeedError::ApiError(message)) if message.contains("503")));
}

#[tokio::test]
async fn test_error_feed_fails_fetch() {
  let server = MockServer::start(vec![atom(ERROR_PAGE)]).await;
  let result = arxiv_for(&server).fetch(&request(3)).await;
  assert!(matches!(
    result,
    Err(FeedError::ApiError(message)) if message == "incorrect id format for 1234"
  ));
}

#[tokio::test]
async fn test_pipeline_with_arxiv_source() -> TestResult<()> {
  let server = MockServer::start(vec![atom(PAGE_1), atom(PAGE_2)]).await;
  let (_dir, config) = create_test_setup();
  let config = config.with_max_results(3).with_lookback_days(None);

  let report = run_once(&config, arxiv_for(&server), ScriptedEnricher::new()).await?;
  assert_eq!(report.saved, Some(3));

  let papers = stored(&config).await;
  assert_eq!(ids(&papers), ["2501.00003v1", "2501.00002v2", "2501.00001v1"]);
  assert!(papers.iter().all(|p| p.is_enriched()));
  Ok(())
}
