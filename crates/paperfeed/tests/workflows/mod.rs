use std::{collections::HashSet, time::Instant};

use super::*;

mod replace;

#[tokio::test]
async fn test_first_run_creates_sorted_store() -> TestResult<()> {
  let (_dir, config) = create_test_setup();
  let source = StaticSource(vec![
    paper("2405.00001", "2024-05-01"),
    paper("2405.00003", "2024-05-03"),
    paper("2404.00020", "2024-04-20"),
  ]);

  let report = run_once(&config, source, ScriptedEnricher::new()).await?;
  assert_eq!(report.existing, 0);
  assert_eq!(report.fetched, 3);
  assert_eq!(report.fresh, 3);
  assert_eq!(report.generated, 3);
  assert_eq!(report.saved, Some(3));

  let papers = stored(&config).await;
  assert_eq!(ids(&papers), ["2405.00003", "2405.00001", "2404.00020"]);
  assert!(papers.iter().all(|p| !p.content.tr.is_empty()));
  assert_eq!(papers[0].content.tr, ScriptedEnricher::summary_for("Paper 2405.00003"));
  assert_eq!(papers[0].content.en, "Abstract of 2405.00003.");
  Ok(())
}

#[tokio::test]
async fn test_stored_papers_are_not_fetched_again() -> TestResult<()> {
  let (_dir, config) = create_test_setup();
  let mut known = paper("2501.00001", "2025-01-01");
  known.set_summary("## Özet\n- daha önce".to_string());
  Store::new(&config.store_path).save(&[known.clone()]).await?;

  let mut renamed = paper("2501.00001", "2025-01-01");
  renamed.title = "A revised title".to_string();
  let source = StaticSource(vec![renamed, paper("2501.00002", "2025-01-02")]);
  let enricher = ScriptedEnricher::new();
  let calls = enricher.calls();

  let report = run_once(&config, source, enricher).await?;
  assert_eq!(report.existing, 1);
  assert_eq!(report.fresh, 1);
  assert_eq!(*calls.lock().unwrap(), ["Paper 2501.00002"]);

  let papers = stored(&config).await;
  assert_eq!(ids(&papers), ["2501.00002", "2501.00001"]);
  assert_eq!(papers[1], known);
  Ok(())
}

#[tokio::test]
async fn test_repeated_run_is_idempotent() -> TestResult<()> {
  let (_dir, config) = create_test_setup();
  let batch = vec![paper("2501.00002", "2025-01-02"), paper("2501.00001", "2025-01-01")];

  run_once(&config, StaticSource(batch.clone()), ScriptedEnricher::new()).await?;
  let first = std::fs::read(&config.store_path)?;

  let enricher = ScriptedEnricher::new();
  let calls = enricher.calls();
  let report = run_once(&config, StaticSource(batch), enricher).await?;
  let second = std::fs::read(&config.store_path)?;

  assert_eq!(report.fresh, 0);
  assert_eq!(report.saved, Some(2));
  assert!(calls.lock().unwrap().is_empty());
  assert_eq!(first, second);
  Ok(())
}

#[tokio::test]
async fn test_failed_summary_keeps_abstract() -> TestResult<()> {
  let (_dir, config) = create_test_setup();
  let source = StaticSource(vec![paper("a", "2025-01-02"), paper("b", "2025-01-01")]);
  let enricher = ScriptedEnricher::new().failing_on("Paper b");
  let calls = enricher.calls();

  let report = run_once(&config, source, enricher).await?;
  assert_eq!(report.generated, 1);
  assert_eq!(report.fallbacks, 1);
  assert_eq!(calls.lock().unwrap().len(), 2);

  let papers = stored(&config).await;
  assert_eq!(papers[0].content.tr, ScriptedEnricher::summary_for("Paper a"));
  assert_eq!(papers[1].content.tr, papers[1].content.en);
  assert_eq!(papers[1].content.tr, "Abstract of b.");
  Ok(())
}

#[tokio::test]
async fn test_offline_enricher_stores_abstracts() -> TestResult<()> {
  let (_dir, config) = create_test_setup();
  let source = StaticSource(vec![paper("a", "2025-01-02"), paper("b", "2025-01-01")]);

  let report = run_once(&config, source, ScriptedEnricher::offline()).await?;
  assert_eq!(report.generated, 0);
  assert_eq!(report.fallbacks, 2);

  let papers = stored(&config).await;
  assert!(papers.iter().all(|p| p.content.tr == p.content.en));
  Ok(())
}

#[tokio::test]
async fn test_fetch_failure_leaves_store_untouched() -> TestResult<()> {
  let (_dir, config) = create_test_setup();
  run_once(&config, StaticSource(vec![paper("a", "2025-01-01")]), ScriptedEnricher::new()).await?;
  let before = std::fs::read(&config.store_path)?;

  let result = run_once(&config, FailingSource, ScriptedEnricher::new()).await;
  assert!(matches!(result, Err(FeedError::ApiError(_))));
  assert_eq!(std::fs::read(&config.store_path)?, before);
  Ok(())
}

#[tokio::test]
async fn test_empty_fetch_writes_nothing() -> TestResult<()> {
  let (_dir, config) = create_test_setup();

  let report = run_once(&config, StaticSource(Vec::new()), ScriptedEnricher::new()).await?;
  assert_eq!(report.fetched, 0);
  assert_eq!(report.saved, None);
  assert!(!config.store_path.exists());
  Ok(())
}

#[tokio::test]
async fn test_corrupt_store_starts_over() -> TestResult<()> {
  let (_dir, config) = create_test_setup();
  std::fs::create_dir_all(config.store_path.parent().unwrap())?;
  std::fs::write(&config.store_path, "[{\"id\": \"half a rec")?;

  let source = StaticSource(vec![paper("a", "2025-01-01")]);
  let report = run_once(&config, source, ScriptedEnricher::new()).await?;
  assert_eq!(report.existing, 0);
  assert_eq!(report.saved, Some(1));
  assert_eq!(ids(&stored(&config).await), ["a"]);
  Ok(())
}

#[tokio::test]
async fn test_duplicate_ids_in_batch_are_stored_once() -> TestResult<()> {
  let (_dir, config) = create_test_setup();
  let mut again = paper("a", "2025-01-01");
  again.title = "Same id, other title".to_string();
  let source = StaticSource(vec![paper("a", "2025-01-01"), paper("b", "2025-01-02"), again]);

  run_once(&config, source, ScriptedEnricher::new()).await?;
  let papers = stored(&config).await;
  let unique: HashSet<&str> = papers.iter().map(|p| p.id.as_str()).collect();
  assert_eq!(unique.len(), papers.len());
  assert_eq!(papers.len(), 2);
  assert_eq!(papers[1].title, "Paper a");
  Ok(())
}

#[tokio::test]
async fn test_max_results_caps_batch() -> TestResult<()> {
  let (_dir, config) = create_test_setup();
  let config = config.with_max_results(2);
  let source = StaticSource(vec![
    paper("c", "2025-01-03"),
    paper("b", "2025-01-02"),
    paper("a", "2025-01-01"),
  ]);

  let report = run_once(&config, source, ScriptedEnricher::new()).await?;
  assert_eq!(report.fetched, 2);
  assert_eq!(ids(&stored(&config).await), ["c", "b"]);
  Ok(())
}

#[tokio::test]
async fn test_live_calls_are_paced() -> TestResult<()> {
  let (_dir, config) = create_test_setup();
  let config = config.with_pacing(Duration::from_millis(150));
  let source = StaticSource(vec![
    paper("c", "2025-01-03"),
    paper("b", "2025-01-02"),
    paper("a", "2025-01-01"),
  ]);

  let started = Instant::now();
  run_once(&config, source, ScriptedEnricher::new().failing_on("Paper b")).await?;
  assert!(started.elapsed() >= Duration::from_millis(300));
  Ok(())
}
