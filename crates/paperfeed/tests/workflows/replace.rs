use super::*;

#[tokio::test]
async fn test_replace_drops_history() -> TestResult<()> {
  let (_dir, config) = create_test_setup();
  let config = replacing(config);
  let mut old = paper("2401.00001", "2024-01-01");
  old.set_summary("## Özet\n- eski".to_string());
  let mut kept = paper("2501.00001", "2025-01-01");
  kept.set_summary("## Özet\n- önceki".to_string());
  Store::new(&config.store_path).save(&[kept, old]).await?;

  let source =
    StaticSource(vec![paper("2501.00002", "2025-01-02"), paper("2501.00001", "2025-01-01")]);
  let enricher = ScriptedEnricher::new();
  let calls = enricher.calls();

  let report = run_once(&config, source, enricher).await?;
  assert_eq!(report.existing, 2);
  assert_eq!(report.fresh, 2);
  assert_eq!(report.saved, Some(2));
  assert_eq!(*calls.lock().unwrap(), ["Paper 2501.00002", "Paper 2501.00001"]);

  let papers = stored(&config).await;
  assert_eq!(ids(&papers), ["2501.00002", "2501.00001"]);
  assert_eq!(papers[1].content.tr, ScriptedEnricher::summary_for("Paper 2501.00001"));
  Ok(())
}

#[tokio::test]
async fn test_replace_with_empty_fetch_keeps_history() -> TestResult<()> {
  let (_dir, config) = create_test_setup();
  let config = replacing(config);
  Store::new(&config.store_path).save(&[paper("a", "2025-01-01")]).await?;
  let before = std::fs::read(&config.store_path)?;

  let report = run_once(&config, StaticSource(Vec::new()), ScriptedEnricher::new()).await?;
  assert_eq!(report.saved, None);
  assert_eq!(std::fs::read(&config.store_path)?, before);
  Ok(())
}
