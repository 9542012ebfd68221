pub mod analysis_service;
pub mod models;

pub use analysis_service::{AnalysisService, CompletionProvider, NO_TEXT_SENTINEL};
pub use models::{Analysis, AnalysisConfig, AnalysisError, ChatMessage, DocumentAnalysis};
