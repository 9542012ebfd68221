use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::core::cache::{CacheError, CacheStore, PaperTexts};

/// Suffix that marks a file in the cache directory as a text cache.
pub const CACHE_SUFFIX: &str = ".json";

/// JSON file store for extracted paper text. One flat object per file,
/// document name -> full text, no envelope or version field.
pub struct JsonCacheStore {
    dir: PathBuf,
}

impl JsonCacheStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

#[async_trait]
impl CacheStore for JsonCacheStore {
    async fn discover(&self) -> Result<Vec<String>, CacheError> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(CACHE_SUFFIX) && entry.file_type().await?.is_file() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    async fn load(&self, name: &str) -> Result<PaperTexts, CacheError> {
        let path = self.file_path(name);
        if !path.exists() {
            return Ok(PaperTexts::new());
        }

        let text = fs::read_to_string(&path).await?;
        // Parsing straight into name -> text rejects nested values and
        // anything else that is not a flat string map.
        let papers: PaperTexts = serde_json::from_str(&text)?;
        Ok(papers)
    }

    async fn save(&self, name: &str, papers: &PaperTexts) -> Result<(), CacheError> {
        let path = self.file_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let text = serde_json::to_string_pretty(papers)?;
        fs::write(&path, text).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn papers(entries: &[(&str, &str)]) -> PaperTexts {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let store = JsonCacheStore::new(dir.path());

        let saved = papers(&[("A.pdf", "alpha text"), ("B.pdf", "beta text")]);
        store.save("papers.json", &saved).await.unwrap();

        let loaded = store.load("papers.json").await.unwrap();
        assert_eq!(loaded, saved);
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty_mapping() {
        let dir = tempdir().unwrap();
        let store = JsonCacheStore::new(dir.path());

        let loaded = store.load("nothing-here.json").await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn save_replaces_prior_content_wholesale() {
        let dir = tempdir().unwrap();
        let store = JsonCacheStore::new(dir.path());

        store
            .save("papers.json", &papers(&[("A.pdf", "a"), ("B.pdf", "b")]))
            .await
            .unwrap();
        store
            .save("papers.json", &papers(&[("C.pdf", "c")]))
            .await
            .unwrap();

        let loaded = store.load("papers.json").await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded["C.pdf"], "c");
    }

    #[tokio::test]
    async fn saving_an_empty_fetch_empties_the_file() {
        let dir = tempdir().unwrap();
        let store = JsonCacheStore::new(dir.path());

        store
            .save("papers.json", &papers(&[("A.pdf", "a")]))
            .await
            .unwrap();
        store.save("papers.json", &PaperTexts::new()).await.unwrap();

        let loaded = store.load("papers.json").await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn discover_lists_only_cache_files_sorted() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), "{}").unwrap();
        std::fs::write(dir.path().join("a.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let store = JsonCacheStore::new(dir.path());
        let names = store.discover().await.unwrap();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[tokio::test]
    async fn load_rejects_non_string_values() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("bad.json"),
            r#"{"A.pdf": {"nested": true}}"#,
        )
        .unwrap();

        let store = JsonCacheStore::new(dir.path());
        assert!(matches!(
            store.load("bad.json").await,
            Err(CacheError::Schema(_))
        ));
    }

    #[tokio::test]
    async fn load_rejects_malformed_json() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "not json at all").unwrap();

        let store = JsonCacheStore::new(dir.path());
        assert!(store.load("bad.json").await.is_err());
    }

    #[tokio::test]
    async fn saved_file_is_pretty_printed() {
        let dir = tempdir().unwrap();
        let store = JsonCacheStore::new(dir.path());

        store
            .save("papers.json", &papers(&[("A.pdf", "alpha")]))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join("papers.json")).unwrap();
        assert!(raw.contains('\n'));
        assert!(raw.contains("  \"A.pdf\": \"alpha\""));
    }
}
