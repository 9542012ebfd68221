use serde::{Deserialize, Serialize};

/// One turn of a chat completion request. Serializes straight into the wire
/// format expected by OpenAI-compatible endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub model: String,
    pub temperature: f32,
    /// Character-count cap on the document text sent per request. A raw
    /// character slice, never tokens; input beyond this is dropped and the
    /// result is marked truncated.
    pub max_input_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: crate::core::config::DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            max_input_chars: crate::core::config::DEFAULT_MAX_ANALYSIS_CHARS,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Completion API error: {0}")]
    Api(String),
}

/// Outcome of analyzing a single document. Never cached; recomputed on every
/// invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// The model's answer, or the no-text sentinel when the document had
    /// nothing to analyze.
    pub text: String,
    /// True when the cached text was cut to the configured character limit
    /// before being sent.
    pub truncated: bool,
}

/// One entry of a batch run: the document name plus its own result. Keeping
/// the result per document lets one failure leave the rest of the batch
/// intact.
#[derive(Debug)]
pub struct DocumentAnalysis {
    pub name: String,
    pub result: Result<Analysis, AnalysisError>,
}
