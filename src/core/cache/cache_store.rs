use std::collections::BTreeMap;

use async_trait::async_trait;

/// Document name -> extracted full text. A BTreeMap keeps batch iteration and
/// the serialized cache file ordered by name.
pub type PaperTexts = BTreeMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cache file is not a name -> text JSON object: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Persistence for the extracted-text cache. One flat JSON file per cache;
/// the store only ever reads and replaces whole files, never merges.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// File names in the cache directory that look like cache files, sorted.
    /// An empty result means nothing can be loaded yet; a fetch may still
    /// name a new file to create.
    async fn discover(&self) -> Result<Vec<String>, CacheError>;

    /// Reads one cache file into memory. A file that does not exist yet
    /// yields an empty mapping.
    async fn load(&self, name: &str) -> Result<PaperTexts, CacheError>;

    /// Overwrites one cache file with exactly this mapping, pretty-printed.
    async fn save(&self, name: &str, papers: &PaperTexts) -> Result<(), CacheError>;
}
