use thiserror::Error;

use super::drive_client::{DriveClient, DriveError, ExtractError, TextExtractor};
use crate::core::cache::PaperTexts;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Drive(#[from] DriveError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Runs the list -> download -> extract pass for one folder.
pub struct FetchService<C: DriveClient, E: TextExtractor> {
    client: C,
    extractor: E,
}

impl<C: DriveClient, E: TextExtractor> FetchService<C, E> {
    pub fn new(client: C, extractor: E) -> Self {
        Self { client, extractor }
    }

    /// Fetches every PDF in the folder and returns name -> extracted text.
    ///
    /// Documents are processed strictly one at a time, in listing order. Any
    /// listing, download or extraction failure aborts the whole pass and
    /// discards everything fetched so far, so the caller never persists a
    /// partial result. A folder with zero PDFs yields an empty mapping.
    pub async fn fetch_folder(&self, folder_id: &str) -> Result<PaperTexts, FetchError> {
        let documents = self.client.list_pdfs(folder_id).await?;
        tracing::info!("Folder {} lists {} PDF file(s)", folder_id, documents.len());

        let mut texts = PaperTexts::new();
        for document in documents {
            tracing::debug!("Downloading {} ({})", document.name, document.id);
            let bytes = self.client.download(&document.id).await?;
            let text = self.extractor.extract(&bytes)?;
            if text.is_empty() {
                tracing::warn!("No text layer in {}", document.name);
            }
            texts.insert(document.name, text);
        }

        Ok(texts)
    }
}
