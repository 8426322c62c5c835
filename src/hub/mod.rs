// file: src/hub/mod.rs
// description: dataset split model and the publishing seam for dataset hubs
// reference: https://huggingface.co/docs/datasets/upload_dataset

pub mod huggingface;

use crate::error::{PipelineError, Result};
use crate::models::Table;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

pub use huggingface::HuggingFaceHub;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatasetSplit {
    #[default]
    Train,
    Validation,
    Test,
}

impl DatasetSplit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Validation => "validation",
            Self::Test => "test",
        }
    }
}

impl FromStr for DatasetSplit {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "train" => Ok(Self::Train),
            "validation" => Ok(Self::Validation),
            "test" => Ok(Self::Test),
            other => Err(PipelineError::Validation(format!(
                "unknown split '{}' (expected train, validation or test)",
                other
            ))),
        }
    }
}

impl fmt::Display for DatasetSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loaded table tagged with the split it is published as.
#[derive(Debug, Clone)]
pub struct SplitDataset {
    pub split: DatasetSplit,
    pub table: Table,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishReceipt {
    pub repo_url: String,
    pub commit_url: Option<String>,
}

#[async_trait]
pub trait DatasetPublisher: Send + Sync {
    async fn publish(&self, dataset: &SplitDataset, repo_id: &str) -> Result<PublishReceipt>;
}
