// file: src/pipeline/orchestrator.rs
// description: coordinates input scanning, per-file qa extraction and dataset export
// reference: sequential processing with per-file failure isolation

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::exporter::{DatasetExporter, ExportFormat, resolve_export_path, timestamp_suffix};
use crate::input::{InputFilter, InputScanner};
use crate::llm::{CompletionBackend, OpenAiCompatibleBackend, QaClient, RetryPolicy};
use crate::models::document::file_name;
use crate::models::{QaPair, Table};
use crate::pipeline::processor::{FileOutcome, FileProcessor};
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use std::fs;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// One `process` invocation.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub input_path: PathBuf,
    pub input_filter: InputFilter,
    pub model: String,
    pub output_path: PathBuf,
    pub export_format: ExportFormat,
    pub requested_count: Option<usize>,
}

pub struct PipelineOrchestrator<B> {
    processor: FileProcessor<B>,
    show_progress: bool,
    colored: bool,
}

impl PipelineOrchestrator<OpenAiCompatibleBackend> {
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend = OpenAiCompatibleBackend::from_config(&config.llm)?;
        let client = QaClient::new(backend, RetryPolicy::from_config(&config.retry));
        Ok(Self::new(client).with_progress(config.pipeline.show_progress, true))
    }
}

impl<B: CompletionBackend> PipelineOrchestrator<B> {
    pub fn new(client: QaClient<B>) -> Self {
        Self {
            processor: FileProcessor::new(client),
            show_progress: false,
            colored: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool, colored: bool) -> Self {
        self.show_progress = show_progress;
        self.colored = colored;
        self
    }

    pub fn processor(&self) -> &FileProcessor<B> {
        &self.processor
    }

    pub async fn run(&self, request: &RunRequest) -> Result<PipelineStats> {
        if request.requested_count == Some(0) {
            return Err(PipelineError::Validation(
                "requested QA pair count must be at least 1".to_string(),
            ));
        }

        info!(
            "Starting QA extraction: input={}, model={}, export={}",
            request.input_path.display(),
            request.model,
            request.export_format
        );

        let files = self.scan_files(request).await?;
        if files.is_empty() {
            warn!(
                "No processable files found in {}",
                request.input_path.display()
            );
            return Ok(PipelineStats::new());
        }

        let progress = ProgressTracker::with_options(files.len(), self.show_progress, self.colored);
        let results = self.process_files(&files, request, &progress).await;
        progress.finish();

        let mut stats = progress.get_stats();

        if results.is_empty() {
            warn!("No QA pairs were extracted; nothing to export");
            self.log_final_stats(&stats);
            return Ok(stats);
        }

        stats.output_path = Some(self.export_results(&results, request)?);
        self.log_final_stats(&stats);
        Ok(stats)
    }

    async fn scan_files(&self, request: &RunRequest) -> Result<Vec<PathBuf>> {
        let input = request.input_path.clone();
        let filter = request.input_filter.clone();

        tokio::task::spawn_blocking(move || InputScanner::new(filter).scan(&input))
            .await
            .map_err(|e| PipelineError::Validation(format!("File scanning task failed: {}", e)))?
    }

    async fn process_files(
        &self,
        files: &[PathBuf],
        request: &RunRequest,
        progress: &ProgressTracker,
    ) -> Vec<QaPair> {
        let mut results = Vec::new();

        for path in files {
            let name = file_name(path);
            progress.set_message(name.clone());

            match self
                .processor
                .process(path, &request.model, request.requested_count)
                .await
            {
                Ok(FileOutcome::Processed { pairs, truncated }) => {
                    progress.inc_files_processed(pairs.len(), truncated);
                    results.extend(pairs);
                }
                Ok(FileOutcome::Skipped(reason)) => {
                    warn!("Skipping {}: {}", name, reason);
                    progress.inc_files_skipped();
                }
                Err(e) => {
                    error!("Failed to process {}: {}", name, e);
                    progress.inc_files_failed();
                }
            }
        }

        results
    }

    fn export_results(&self, results: &[QaPair], request: &RunRequest) -> Result<PathBuf> {
        let table = Table::from_records(results)?;
        let path = resolve_export_path(&request.output_path, request.export_format, &timestamp_suffix());

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| PipelineError::file_operation(parent, e))?;
        }

        DatasetExporter::export(&table, &path, request.export_format)?;
        Ok(path)
    }

    fn log_final_stats(&self, stats: &PipelineStats) {
        info!("=== Pipeline Execution Summary ===");
        info!("Duration: {} seconds", stats.duration_secs);
        info!("Files discovered: {}", stats.files_discovered);
        info!("Files processed: {}", stats.files_processed);
        info!("Files skipped: {}", stats.files_skipped);
        info!("Files failed: {}", stats.files_failed);
        info!("Success rate: {:.2}%", stats.success_rate());
        info!("Processing speed: {:.2} files/sec", stats.files_per_second());
        info!("QA pairs extracted: {}", stats.pairs_extracted);
        if stats.pairs_truncated > 0 {
            info!("QA pairs truncated: {}", stats.pairs_truncated);
        }
        if let Some(path) = &stats.output_path {
            info!("Output: {}", path.display());
        }
        info!("=================================");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporter::load_table;
    use crate::llm::client::testing::{MockBackend, pairs_json};
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    fn orchestrator(backend: MockBackend, retry: RetryPolicy) -> PipelineOrchestrator<MockBackend> {
        PipelineOrchestrator::new(QaClient::new(backend, retry))
    }

    fn request(input: &Path, output: &Path, format: ExportFormat) -> RunRequest {
        RunRequest {
            input_path: input.to_path_buf(),
            input_filter: InputFilter::Auto,
            model: "test-model".to_string(),
            output_path: output.to_path_buf(),
            export_format: format,
            requested_count: None,
        }
    }

    fn write_inputs(root: &Path) {
        fs::write(root.join("a.csv"), "alpha,1\n").unwrap();
        fs::write(root.join("b.csv"), "beta,2\n").unwrap();
        fs::write(root.join("readme.txt"), "ignored").unwrap();
    }

    fn fails_on_alpha(request: &crate::llm::CompletionRequest) -> Result<String> {
        if request.messages[0].content.contains("alpha,1") {
            Err(PipelineError::LlmTransport("connection reset".into()))
        } else {
            Ok(pairs_json(2))
        }
    }

    #[tokio::test]
    async fn test_exports_enriched_pairs() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("docs");
        fs::create_dir_all(&input).unwrap();
        write_inputs(&input);

        let orchestrator = orchestrator(MockBackend::replying(&pairs_json(2)), RetryPolicy::default());
        let request = request(&input, &temp.path().join("out/results.jsonl"), ExportFormat::Jsonl);
        let stats = orchestrator.run(&request).await.unwrap();

        let output = stats.output_path.clone().unwrap();
        assert_eq!(output.parent().unwrap(), temp.path().join("out"));
        let name = output.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("results_") && name.ends_with(".jsonl"), "{}", name);

        let table = load_table(&output).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(
            table.columns(),
            [
                "question",
                "thought",
                "answer",
                "model",
                "filename",
                "page_number",
                "slide_index",
                "timestamp"
            ]
        );
        let filenames: Vec<&str> = table
            .column_values("filename")
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(filenames, vec!["a.csv", "a.csv", "b.csv", "b.csv"]);
        assert!(table.column_values("model").all(|v| v == "test-model"));
        assert_eq!(stats.files_processed, 2);
        assert_eq!(stats.pairs_extracted, 4);
    }

    #[tokio::test]
    async fn test_requested_count_truncates_each_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.csv"), "alpha,1\n").unwrap();

        let orchestrator = orchestrator(MockBackend::replying(&pairs_json(5)), RetryPolicy::default());
        let mut request = request(temp.path(), &temp.path().join("out/"), ExportFormat::Csv);
        request.requested_count = Some(2);
        let stats = orchestrator.run(&request).await.unwrap();

        let table = load_table(stats.output_path.as_ref().unwrap()).unwrap();
        let questions: Vec<&str> = table
            .column_values("question")
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(questions, vec!["q1", "q2"]);
        assert_eq!(stats.pairs_truncated, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_exhaustion_skips_file_and_continues() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("docs");
        fs::create_dir_all(&input).unwrap();
        write_inputs(&input);

        let orchestrator = orchestrator(MockBackend::with_fallback(fails_on_alpha), RetryPolicy::default());
        let request = request(&input, &temp.path().join("out/results.parquet"), ExportFormat::Parquet);
        let stats = orchestrator.run(&request).await.unwrap();

        assert_eq!(orchestrator.processor().client().backend().calls(), 4);
        assert_eq!(stats.files_failed, 1);
        assert_eq!(stats.files_processed, 1);

        let table = load_table(stats.output_path.as_ref().unwrap()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.column_values("filename").all(|v| v == "b.csv"));
    }

    #[tokio::test]
    async fn test_empty_directory_produces_no_output() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("empty");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("notes.md"), "# not supported").unwrap();
        let out_dir = temp.path().join("out");

        let orchestrator = orchestrator(MockBackend::replying(&pairs_json(1)), RetryPolicy::default());
        let stats = orchestrator
            .run(&request(&input, &out_dir.join("results.jsonl"), ExportFormat::Jsonl))
            .await
            .unwrap();

        assert_eq!(stats, PipelineStats::new());
        assert!(!out_dir.exists());
        assert_eq!(orchestrator.processor().client().backend().calls(), 0);
    }

    #[tokio::test]
    async fn test_all_files_failing_produces_no_output() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.csv"), "alpha,1\n").unwrap();
        let out_dir = temp.path().join("out");

        let orchestrator = orchestrator(
            MockBackend::failing(),
            RetryPolicy::new(2, Duration::ZERO),
        );
        let stats = orchestrator
            .run(&request(temp.path(), &out_dir.join("results.csv"), ExportFormat::Csv))
            .await
            .unwrap();

        assert_eq!(stats.files_failed, 1);
        assert_eq!(stats.output_path, None);
        assert!(!out_dir.exists());
    }

    #[tokio::test]
    async fn test_invalid_input_path_aborts() {
        let temp = TempDir::new().unwrap();
        let orchestrator = orchestrator(MockBackend::replying("[]"), RetryPolicy::default());

        let result = orchestrator
            .run(&request(&temp.path().join("missing"), temp.path(), ExportFormat::Jsonl))
            .await;

        assert!(matches!(result, Err(PipelineError::InputPath(_))));
    }

    #[tokio::test]
    async fn test_zero_requested_count_is_rejected() {
        let temp = TempDir::new().unwrap();
        let orchestrator = orchestrator(MockBackend::replying("[]"), RetryPolicy::default());
        let mut request = request(temp.path(), temp.path(), ExportFormat::Jsonl);
        request.requested_count = Some(0);

        assert!(matches!(
            orchestrator.run(&request).await,
            Err(PipelineError::Validation(_))
        ));
    }
}
