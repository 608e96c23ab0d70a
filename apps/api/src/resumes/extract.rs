//! Best-effort PDF text extraction.
//!
//! Extraction failure degrades to placeholder text rather than blocking the
//! upload — feedback generation will still run against the placeholder, just
//! with poor quality, and the feedback endpoint rejects it with a re-upload
//! hint before spending an LLM call.

use tracing::warn;

/// Stored when extraction fails; the feedback endpoint checks for it.
pub const EXTRACTION_FAILED_PLACEHOLDER: &str = "Text extraction failed";

/// Extracts plain text from PDF bytes, degrading to the placeholder on any
/// failure.
pub fn extract_resume_text(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        warn!("Empty file buffer — skipping extraction");
        return EXTRACTION_FAILED_PLACEHOLDER.to_string();
    }

    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(raw) => {
            let text = clean_resume_text(&raw);
            if text.is_empty() {
                warn!("No text extracted — possibly scanned PDF");
            }
            text
        }
        Err(e) => {
            warn!("PDF extraction failed: {e}");
            EXTRACTION_FAILED_PLACEHOLDER.to_string()
        }
    }
}

/// Normalizes raw extracted text: carriage returns become spaces, runs of
/// newlines collapse to one, runs of spaces/tabs collapse to one.
pub fn clean_resume_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());

    for ch in raw.chars() {
        match ch {
            '\r' => {
                if !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            '\n' => {
                while out.ends_with(' ') {
                    out.pop();
                }
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            ' ' | '\t' => {
                if !out.ends_with(' ') && !out.ends_with('\n') && !out.is_empty() {
                    out.push(' ');
                }
            }
            other => out.push(other),
        }
    }

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_collapses_inline_whitespace() {
        assert_eq!(clean_resume_text("a  \t b"), "a b");
    }

    #[test]
    fn test_clean_collapses_newline_runs() {
        assert_eq!(clean_resume_text("a\n\n\nb"), "a\nb");
    }

    #[test]
    fn test_clean_replaces_carriage_returns() {
        assert_eq!(clean_resume_text("a\rb"), "a b");
    }

    #[test]
    fn test_clean_trims_result() {
        assert_eq!(clean_resume_text("  \n hello \n "), "hello");
    }

    #[test]
    fn test_clean_empty_input() {
        assert_eq!(clean_resume_text(""), "");
    }

    #[test]
    fn test_extract_empty_bytes_yields_placeholder() {
        assert_eq!(extract_resume_text(&[]), EXTRACTION_FAILED_PLACEHOLDER);
    }

    #[test]
    fn test_extract_garbage_bytes_yields_placeholder() {
        assert_eq!(
            extract_resume_text(b"not a pdf at all"),
            EXTRACTION_FAILED_PLACEHOLDER
        );
    }
}
