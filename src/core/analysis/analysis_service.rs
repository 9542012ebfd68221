use async_trait::async_trait;

use super::models::{Analysis, AnalysisConfig, AnalysisError, ChatMessage, DocumentAnalysis};
use crate::core::cache::PaperTexts;

/// Returned instead of calling the completion service when a cached document
/// has no extractable text.
pub const NO_TEXT_SENTINEL: &str = "No text found in this PDF.";

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends one chat completion request and returns the first choice's
    /// message content verbatim.
    async fn chat_complete(
        &self,
        messages: &[ChatMessage],
        config: &AnalysisConfig,
    ) -> Result<String, AnalysisError>;
}

pub struct AnalysisService<P: CompletionProvider> {
    provider: P,
    config: AnalysisConfig,
}

impl<P: CompletionProvider> AnalysisService<P> {
    pub fn new(provider: P, config: AnalysisConfig) -> Self {
        Self { provider, config }
    }

    /// Analyzes one cached document against a free-text prompt.
    ///
    /// Absent or empty text short-circuits to the sentinel without touching
    /// the completion service. Otherwise the first `max_input_chars`
    /// characters of the text are sent as the user turn, with the prompt
    /// embedded in the system turn.
    pub async fn analyze(
        &self,
        text: Option<&str>,
        prompt: &str,
    ) -> Result<Analysis, AnalysisError> {
        let text = match text {
            Some(t) if !t.is_empty() => t,
            _ => {
                return Ok(Analysis {
                    text: NO_TEXT_SENTINEL.to_string(),
                    truncated: false,
                })
            }
        };

        let (input, truncated) = truncate_chars(text, self.config.max_input_chars);

        let messages = [
            ChatMessage::system(format!("Analyze this research paper based on: {prompt}")),
            ChatMessage::user(input),
        ];

        let answer = self.provider.chat_complete(&messages, &self.config).await?;
        Ok(Analysis {
            text: answer,
            truncated,
        })
    }

    /// Analyzes every cached document in mapping order, one request at a
    /// time. A failing document gets an `Err` in its own slot; the remaining
    /// documents still run.
    pub async fn analyze_all(&self, papers: &PaperTexts, prompt: &str) -> Vec<DocumentAnalysis> {
        let mut results = Vec::with_capacity(papers.len());
        for (name, text) in papers {
            tracing::info!("Analyzing {}", name);
            let result = self.analyze(Some(text), prompt).await;
            if let Err(e) = &result {
                tracing::warn!("Analysis of {} failed: {}", name, e);
            }
            results.push(DocumentAnalysis {
                name: name.clone(),
                result,
            });
        }
        results
    }
}

/// Cuts `text` to its first `limit` characters. Counts code points, not
/// bytes, so multi-byte text is never split mid-character.
fn truncate_chars(text: &str, limit: usize) -> (String, bool) {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => (text[..byte_index].to_string(), true),
        None => (text.to_string(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every request; fails when the user turn contains `fail_on`.
    struct RecordingProvider {
        calls: Mutex<Vec<Vec<ChatMessage>>>,
        fail_on: Option<String>,
    }

    impl RecordingProvider {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: None,
            }
        }

        fn failing_on(marker: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: Some(marker.to_string()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionProvider for RecordingProvider {
        async fn chat_complete(
            &self,
            messages: &[ChatMessage],
            _config: &AnalysisConfig,
        ) -> Result<String, AnalysisError> {
            self.calls.lock().unwrap().push(messages.to_vec());
            if let Some(marker) = &self.fail_on {
                if messages.iter().any(|m| m.content.contains(marker)) {
                    return Err(AnalysisError::Api("simulated failure".to_string()));
                }
            }
            let user = messages.last().unwrap();
            Ok(format!("analysis of: {}", user.content))
        }
    }

    fn service(provider: RecordingProvider) -> AnalysisService<RecordingProvider> {
        AnalysisService::new(provider, AnalysisConfig::default())
    }

    #[tokio::test]
    async fn missing_text_returns_sentinel_without_any_request() {
        let svc = service(RecordingProvider::new());

        let analysis = svc.analyze(None, "summarize").await.unwrap();
        assert_eq!(analysis.text, NO_TEXT_SENTINEL);
        assert!(!analysis.truncated);
        assert_eq!(svc.provider.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_text_returns_sentinel_without_any_request() {
        let svc = service(RecordingProvider::new());

        let analysis = svc.analyze(Some(""), "summarize").await.unwrap();
        assert_eq!(analysis.text, NO_TEXT_SENTINEL);
        assert_eq!(svc.provider.call_count(), 0);
    }

    #[tokio::test]
    async fn long_text_is_cut_to_exactly_the_char_limit() {
        let svc = service(RecordingProvider::new());
        let text = "x".repeat(4005);

        let analysis = svc.analyze(Some(&text), "summarize").await.unwrap();
        assert!(analysis.truncated);

        let calls = svc.provider.calls.lock().unwrap();
        let user = &calls[0][1];
        assert_eq!(user.content.chars().count(), 4000);
        assert_eq!(user.content, text[..4000]);
    }

    #[tokio::test]
    async fn truncation_counts_characters_not_bytes() {
        let svc = service(RecordingProvider::new());
        // 4001 two-byte characters
        let text = "é".repeat(4001);

        let analysis = svc.analyze(Some(&text), "summarize").await.unwrap();
        assert!(analysis.truncated);

        let calls = svc.provider.calls.lock().unwrap();
        assert_eq!(calls[0][1].content.chars().count(), 4000);
    }

    #[tokio::test]
    async fn short_text_is_sent_whole_and_not_flagged() {
        let svc = service(RecordingProvider::new());

        let analysis = svc.analyze(Some("short paper"), "summarize").await.unwrap();
        assert!(!analysis.truncated);

        let calls = svc.provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0].role, "system");
        assert_eq!(
            calls[0][0].content,
            "Analyze this research paper based on: summarize"
        );
        assert_eq!(calls[0][1].role, "user");
        assert_eq!(calls[0][1].content, "short paper");
    }

    #[tokio::test]
    async fn batch_runs_once_per_document_in_name_order() {
        let svc = service(RecordingProvider::new());
        let papers = PaperTexts::from([
            ("B.pdf".to_string(), "beta text".to_string()),
            ("A.pdf".to_string(), "alpha text".to_string()),
        ]);

        let results = svc.analyze_all(&papers, "compare").await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "A.pdf");
        assert_eq!(results[1].name, "B.pdf");
        assert_eq!(
            results[0].result.as_ref().unwrap().text,
            "analysis of: alpha text"
        );
        assert_eq!(
            results[1].result.as_ref().unwrap().text,
            "analysis of: beta text"
        );
        assert_eq!(svc.provider.call_count(), 2);
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_the_rest_of_the_batch() {
        let svc = service(RecordingProvider::failing_on("beta"));
        let papers = PaperTexts::from([
            ("A.pdf".to_string(), "alpha text".to_string()),
            ("B.pdf".to_string(), "beta text".to_string()),
            ("C.pdf".to_string(), "gamma text".to_string()),
        ]);

        let results = svc.analyze_all(&papers, "compare").await;
        assert_eq!(results.len(), 3);
        assert!(results[0].result.is_ok());
        assert!(results[1].result.is_err());
        assert!(results[2].result.is_ok());
        assert_eq!(svc.provider.call_count(), 3);
    }
}
