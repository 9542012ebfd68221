use async_trait::async_trait;

use super::drive_models::RemoteDocument;

/// Errors raised while talking to the remote storage service.
#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    #[error("Drive API error: {0}")]
    Api(String),
    #[error("Drive authentication failed: {0}")]
    Auth(String),
}

/// Errors raised while pulling text out of downloaded PDF bytes.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Malformed PDF: {0}")]
    Pdf(String),
}

/// Remote storage operations the fetch pass needs. Implementations handle
/// whatever authentication the backing service requires.
#[async_trait]
pub trait DriveClient: Send + Sync {
    /// Lists the PDF files that are direct children of the given folder.
    /// Order is whatever the service returns.
    async fn list_pdfs(&self, folder_id: &str) -> Result<Vec<RemoteDocument>, DriveError>;

    /// Downloads the full binary content of one file, buffered in memory.
    async fn download(&self, file_id: &str) -> Result<Vec<u8>, DriveError>;
}

/// Turns raw PDF bytes into plain text.
pub trait TextExtractor: Send + Sync {
    /// Returns the concatenated text of every page in page order, each page
    /// followed by a newline. An empty string means the document has no
    /// extractable text layer (e.g. scanned images). No OCR fallback.
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}
