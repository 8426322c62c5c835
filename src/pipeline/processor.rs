// file: src/pipeline/processor.rs
// description: turns one input file into enriched qa pairs
// reference: extracts text off the async runtime, then queries the llm

use crate::error::{PipelineError, Result};
use crate::extractor;
use crate::llm::{CompletionBackend, QaClient};
use crate::models::document::normalized_extension;
use crate::models::QaPair;
use crate::utils::Validator;
use std::path::Path;
use tracing::{debug, info};

/// What happened to a file that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Processed { pairs: Vec<QaPair>, truncated: usize },
    Skipped(String),
}

pub struct FileProcessor<B> {
    client: QaClient<B>,
}

impl<B: CompletionBackend> FileProcessor<B> {
    pub fn new(client: QaClient<B>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &QaClient<B> {
        &self.client
    }

    pub async fn process(
        &self,
        path: &Path,
        model: &str,
        requested: Option<usize>,
    ) -> Result<FileOutcome> {
        let extension = normalized_extension(path);
        if !extractor::is_supported(&extension) {
            return Ok(FileOutcome::Skipped(format!(
                "unsupported file type '{}'",
                extension
            )));
        }

        info!("Processing file: {}", path.display());

        let owned = path.to_path_buf();
        let document = tokio::task::spawn_blocking(move || extractor::extract_document(&owned))
            .await
            .map_err(|e| {
                PipelineError::extraction(path, format!("extraction task failed: {}", e))
            })??;

        let text = document.text();
        if Validator::validate_content_not_empty(&text).is_err() {
            return Ok(FileOutcome::Skipped("no extractable text".to_string()));
        }
        debug!(
            "Extracted {} chars from {}",
            text.chars().count(),
            document.source_filename
        );

        let mut candidates = self
            .client
            .complete(model, &text, &document.source_identifier(), requested)
            .await?;

        let mut truncated = 0;
        if let Some(limit) = requested
            && candidates.len() > limit
        {
            truncated = candidates.len() - limit;
            info!(
                "Truncating {} QA pairs to the requested {} for {}",
                candidates.len(),
                limit,
                document.source_filename
            );
            candidates.truncate(limit);
        }

        let pairs: Vec<QaPair> = candidates
            .into_iter()
            .map(|candidate| QaPair::enrich(candidate, &document.source_filename))
            .collect();

        info!(
            "Extracted {} QA pairs from {}",
            pairs.len(),
            document.source_filename
        );
        Ok(FileOutcome::Processed { pairs, truncated })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::RetryPolicy;
    use crate::llm::client::testing::{MockBackend, pairs_json};
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn processor(backend: MockBackend) -> FileProcessor<MockBackend> {
        FileProcessor::new(QaClient::new(backend, RetryPolicy::new(3, Duration::ZERO)))
    }

    #[tokio::test]
    async fn test_truncates_to_requested_count_in_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("specs.csv");
        fs::write(&path, "voltage,220V\n").unwrap();

        let processor = processor(MockBackend::replying(&pairs_json(5)));
        let outcome = processor.process(&path, "m", Some(2)).await.unwrap();

        let FileOutcome::Processed { pairs, truncated } = outcome else {
            panic!("expected processed outcome");
        };
        let questions: Vec<&str> = pairs.iter().map(|p| p.question.as_str()).collect();
        assert_eq!(questions, vec!["q1", "q2"]);
        assert_eq!(truncated, 3);
        assert!(pairs.iter().all(|p| p.filename == "specs.csv"));
        assert!(pairs.iter().all(|p| p.page_number.is_none() && p.slide_index.is_none()));
    }

    #[tokio::test]
    async fn test_source_id_is_stem() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("manual.v2.csv");
        fs::write(&path, "a,b\n").unwrap();

        let processor = processor(MockBackend::replying("[]"));
        processor.process(&path, "m", None).await.unwrap();

        let requests = processor.client().backend().requests();
        assert!(requests[0].messages[0].content.contains("manual.v2"));
    }

    #[tokio::test]
    async fn test_blank_text_skips_without_llm_call() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.csv");
        fs::write(&path, "").unwrap();

        let processor = processor(MockBackend::replying(&pairs_json(1)));
        let outcome = processor.process(&path, "m", None).await.unwrap();

        assert!(matches!(outcome, FileOutcome::Skipped(_)));
        assert_eq!(processor.client().backend().calls(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_skipped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "text").unwrap();

        let processor = processor(MockBackend::replying(&pairs_json(1)));
        let outcome = processor.process(&path, "m", None).await.unwrap();

        assert!(matches!(outcome, FileOutcome::Skipped(_)));
    }

    #[tokio::test]
    async fn test_extraction_failure_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.pdf");
        fs::write(&path, "not a pdf").unwrap();

        let processor = processor(MockBackend::replying(&pairs_json(1)));
        let result = processor.process(&path, "m", None).await;

        assert!(matches!(result, Err(PipelineError::Extraction { .. })));
    }

    #[tokio::test]
    async fn test_prompt_carries_registry_extraction() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Rates.CSV");
        fs::write(&path, "plan,price
basic,10
").unwrap();

        let processor = processor(MockBackend::replying(&pairs_json(1)));
        let outcome = processor.process(&path, "m", None).await.unwrap();
        assert!(matches!(outcome, FileOutcome::Processed { .. }));

        let expected = extractor::extract_document(&path).unwrap().text();
        let requests = processor.client().backend().requests();
        assert!(requests[0].messages[0].content.contains(&expected));
    }
}
