// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod hub;
pub mod input;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod utils;

pub use config::{Config, HubConfig, LlmConfig, PipelineConfig, RetryConfig};
pub use error::{PipelineError, Result};
pub use exporter::{DatasetExporter, ExportFormat, load_table};
pub use hub::{DatasetPublisher, DatasetSplit, HuggingFaceHub, SplitDataset};
pub use input::{InputFilter, InputScanner};
pub use llm::{CompletionBackend, OpenAiCompatibleBackend, PromptBuilder, QaClient, RetryPolicy};
pub use models::{ExtractedDocument, QaCandidate, QaPair, Table};
pub use pipeline::{PipelineOrchestrator, PipelineStats, RunRequest};
pub use utils::Validator;
