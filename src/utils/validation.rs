// file: src/utils/validation.rs
// description: input validation and log-friendly text helpers
// reference: https://huggingface.co/docs/hub/repositories-naming

use crate::error::{PipelineError, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // namespace/name, each part 1-96 chars of alnum, '-', '_' or '.'
    static ref REPO_ID: Regex =
        Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,95}/[A-Za-z0-9][A-Za-z0-9._-]{0,95}$")
            .expect("REPO_ID regex is valid");
}

pub struct Validator;

impl Validator {
    pub fn validate_content_not_empty(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(PipelineError::Validation("Content is empty".to_string()));
        }
        Ok(())
    }

    pub fn validate_repo_id(repo_id: &str) -> Result<()> {
        if !REPO_ID.is_match(repo_id) || repo_id.contains("..") || repo_id.ends_with('.') {
            return Err(PipelineError::Validation(format!(
                "Invalid repository id '{}': expected namespace/name",
                repo_id
            )));
        }
        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(PipelineError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    /// Keeps at most `max_chars` characters, never splitting a code point.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            None => text.to_string(),
            Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content_not_empty() {
        assert!(Validator::validate_content_not_empty("content").is_ok());
        assert!(Validator::validate_content_not_empty("").is_err());
        assert!(Validator::validate_content_not_empty(" \n\t ").is_err());
    }

    #[test]
    fn test_validate_repo_id() {
        assert!(Validator::validate_repo_id("acme/manual-qa").is_ok());
        assert!(Validator::validate_repo_id("user_1/qa.v2").is_ok());

        assert!(Validator::validate_repo_id("no-namespace").is_err());
        assert!(Validator::validate_repo_id("a/b/c").is_err());
        assert!(Validator::validate_repo_id("acme/bad name").is_err());
        assert!(Validator::validate_repo_id("acme/name..x").is_err());
        assert!(Validator::validate_repo_id("/name").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert!(Validator::validate_url("https://huggingface.co").is_ok());
        assert!(Validator::validate_url("http://localhost:4000/v1").is_ok());
        assert!(Validator::validate_url("huggingface.co").is_err());
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(
            Validator::truncate_text("this is a very long text", 10),
            "this is a ..."
        );
        assert_eq!(Validator::truncate_text("問答對提取", 3), "問答對...");
    }
}
