use lopdf::Document;

use crate::core::drive::{ExtractError, TextExtractor};

/// lopdf-backed extractor. Concatenates the text of every page in page-number
/// order, one newline after each page.
pub struct LopdfExtractor;

impl TextExtractor for LopdfExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let document = Document::load_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))?;

        let mut text = String::new();
        for page_number in document.get_pages().keys() {
            let page_text = document
                .extract_text(&[*page_number])
                .map_err(|e| ExtractError::Pdf(e.to_string()))?;
            text.push_str(&page_text);
            text.push('\n');
        }

        Ok(normalize(text))
    }
}

/// A document whose pages carry no text at all (scanned images) still
/// produces one separator newline per page. Collapse that to the empty
/// string so callers can treat "no text layer" as empty.
fn normalize(text: String) -> String {
    if text.trim().is_empty() {
        String::new()
    } else {
        text
    }
}
