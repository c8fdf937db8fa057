//! The JSON file that holds the whole collection.
//!
//! The store is the system of record: one pretty-printed JSON array of [`Paper`]s, newest first,
//! readable by the web front end without any processing. Every save rewrites the whole file.
//!
//! A missing or unreadable file is not an error when loading. The run simply starts from an empty
//! collection, which is also the only recovery from a write that was interrupted half way.
//!
//! # Examples
//!
//! ```no_run
//! use paperfeed::store::Store;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Store::new("public/data.json");
//! let papers = store.load().await;
//! store.save(&papers).await?;
//! # Ok(())
//! # }
//! ```

use super::*;

/// Handle on the JSON collection file.
#[derive(Debug, Clone)]
pub struct Store {
  /// Location of the collection file
  path: PathBuf,
}

impl Store {
  /// Creates a handle; nothing is read or written yet.
  pub fn new(path: impl AsRef<Path>) -> Self { Self { path: path.as_ref().to_path_buf() } }

  /// Location of the collection file.
  pub fn path(&self) -> &Path { &self.path }

  /// Whether the collection file exists.
  pub fn exists(&self) -> bool { self.path.is_file() }

  /// Reads the stored collection.
  ///
  /// Returns an empty collection if the file does not exist, cannot be read, or does not hold a
  /// well-formed collection. The latter two cases are logged.
  pub async fn load(&self) -> Vec<Paper> {
    let data = match tokio::fs::read(&self.path).await {
      Ok(data) => data,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        debug!("No store at {}, starting empty", self.path.display());
        return Vec::new();
      },
      Err(e) => {
        warn!("Could not read store {}: {e}; starting empty", self.path.display());
        return Vec::new();
      },
    };

    match serde_json::from_slice::<Vec<Paper>>(&data) {
      Ok(papers) => {
        debug!("Loaded {} papers from {}", papers.len(), self.path.display());
        papers
      },
      Err(e) => {
        warn!("Store {} is not a valid collection ({e}); starting empty", self.path.display());
        Vec::new()
      },
    }
  }

  /// Overwrites the file with `papers`, creating missing parent directories.
  ///
  /// The write is not atomic: a crash part-way leaves a truncated file behind, which the next
  /// [`Store::load`] treats as empty.
  pub async fn save(&self, papers: &[Paper]) -> Result<()> {
    if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(parent).await?;
    }

    let mut json = serde_json::to_string_pretty(papers)?;
    json.push('\n');
    tokio::fs::write(&self.path, json).await?;

    info!("Saved {} papers to {}", papers.len(), self.path.display());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_missing_store_is_empty() {
    let dir = tempdir().unwrap();
    let store = Store::new(dir.path().join("data.json"));
    assert!(!store.exists());
    assert!(store.load().await.is_empty());
  }

  #[traced_test]
  #[tokio::test]
  async fn test_corrupt_store_is_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    std::fs::write(&path, "[{\"id\": \"2501.00001\", \"title\": ").unwrap();

    let store = Store::new(&path);
    assert!(store.load().await.is_empty());
    assert!(logs_contain("is not a valid collection"));

    std::fs::write(&path, "{\"papers\": []}").unwrap();
    assert!(store.load().await.is_empty());
  }

  #[tokio::test]
  async fn test_save_creates_directories_and_overwrites() {
    let dir = tempdir().unwrap();
    let store = Store::new(dir.path().join("public").join("data.json"));

    let first = vec![test_paper("a", "2025-01-01"), test_paper("b", "2025-01-02")];
    store.save(&first).await.unwrap();
    assert_eq!(store.load().await, first);

    let second = vec![test_paper("c", "2025-01-03")];
    store.save(&second).await.unwrap();
    assert_eq!(store.load().await, second);
  }

  #[tokio::test]
  async fn test_saved_text_is_readable() {
    let dir = tempdir().unwrap();
    let store = Store::new(dir.path().join("data.json"));
    let mut paper = test_paper("2501.00001", "2025-01-01");
    paper.set_summary("## Özet\n- Güvenlik açığı **çözümü**".to_string());

    store.save(&[paper]).await.unwrap();
    let text = std::fs::read_to_string(store.path()).unwrap();

    assert!(text.contains("Özet"));
    assert!(text.contains("Güvenlik açığı"));
    assert!(text.starts_with("[\n  {\n    \"id\": \"2501.00001\""));
    assert!(text.ends_with("]\n"));
  }
}
