// file: src/hub/huggingface.rs
// description: publishes dataset splits to the hugging face hub over its http api
// reference: https://huggingface.co/docs/hub/api

use crate::config::HubConfig;
use crate::error::{PipelineError, Result};
use crate::exporter::jsonl;
use crate::hub::{DatasetPublisher, PublishReceipt, SplitDataset};
use crate::utils::Validator;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::env;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

const TOKEN_ENV_VARS: [&str; 2] = ["HF_TOKEN", "HUGGING_FACE_HUB_TOKEN"];

pub struct HuggingFaceHub {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HuggingFaceHub {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn from_config(config: &HubConfig) -> Self {
        let token = resolve_token(config.token.as_deref(), |name| env::var(name).ok());
        Self::new(config.endpoint.clone(), token)
    }

    fn token(&self) -> Result<&str> {
        self.token.as_deref().ok_or_else(|| {
            PipelineError::MissingCredential(
                "no Hugging Face token found; set hub.token or HF_TOKEN, or run `huggingface-cli login`"
                    .to_string(),
            )
        })
    }

    async fn create_repo(&self, token: &str, repo_id: &str) -> Result<()> {
        let (organization, name) = repo_id
            .split_once('/')
            .ok_or_else(|| PipelineError::Validation(format!("Invalid repository id '{}'", repo_id)))?;

        let response = self
            .client
            .post(format!("{}/api/repos/create", self.endpoint))
            .bearer_auth(token)
            .json(&json!({
                "type": "dataset",
                "name": name,
                "organization": organization,
            }))
            .send()
            .await
            .map_err(|e| PipelineError::Publish(format!("Failed to create repository: {}", e)))?;

        match response.status() {
            status if status.is_success() => {
                info!("Created dataset repository {}", repo_id);
                Ok(())
            }
            StatusCode::CONFLICT => {
                debug!("Dataset repository {} already exists", repo_id);
                Ok(())
            }
            status => Err(error_from_response(status, response, "create repository").await),
        }
    }

    async fn commit(&self, token: &str, dataset: &SplitDataset, repo_id: &str) -> Result<Option<String>> {
        let payload = commit_payload(dataset)?;

        let response = self
            .client
            .post(format!("{}/api/datasets/{}/commit/main", self.endpoint, repo_id))
            .bearer_auth(token)
            .header("Content-Type", "application/x-ndjson")
            .body(payload)
            .send()
            .await
            .map_err(|e| PipelineError::Publish(format!("Failed to commit dataset: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(status, response, "commit dataset").await);
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        Ok(body
            .get("commitUrl")
            .and_then(Value::as_str)
            .map(str::to_string))
    }
}

#[async_trait]
impl DatasetPublisher for HuggingFaceHub {
    async fn publish(&self, dataset: &SplitDataset, repo_id: &str) -> Result<PublishReceipt> {
        Validator::validate_repo_id(repo_id)?;
        let token = self.token()?;

        info!(
            "Publishing {} row(s) to {} (split: {})",
            dataset.table.len(),
            repo_id,
            dataset.split
        );

        self.create_repo(token, repo_id).await?;
        let commit_url = self.commit(token, dataset, repo_id).await?;

        Ok(PublishReceipt {
            repo_url: format!("{}/datasets/{}", self.endpoint, repo_id),
            commit_url,
        })
    }
}

async fn error_from_response(status: StatusCode, response: reqwest::Response, action: &str) -> PipelineError {
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    PipelineError::Publish(format!(
        "Failed to {} ({}): {}",
        action,
        status,
        Validator::truncate_text(&body, 300)
    ))
}

/// Path of the split file inside the dataset repository.
pub fn split_path(dataset: &SplitDataset) -> String {
    format!("data/{}.jsonl", dataset.split)
}

/// NDJSON commit body: a header line, then the split as a base64 file line.
pub fn commit_payload(dataset: &SplitDataset) -> Result<String> {
    let content = STANDARD.encode(jsonl::to_bytes(&dataset.table)?);

    let header = json!({
        "key": "header",
        "value": {
            "summary": format!("Upload {} split ({} rows)", dataset.split, dataset.table.len()),
            "description": "",
        },
    });
    let file = json!({
        "key": "file",
        "value": {
            "path": split_path(dataset),
            "content": content,
            "encoding": "base64",
        },
    });

    Ok(format!("{}\n{}\n", header, file))
}

/// First token found in: the configured value, `HF_TOKEN`,
/// `HUGGING_FACE_HUB_TOKEN`, `$HF_HOME/token`, `~/.cache/huggingface/token`.
pub fn resolve_token(configured: Option<&str>, env_var: impl Fn(&str) -> Option<String>) -> Option<String> {
    let non_empty = |value: String| {
        let trimmed = value.trim().to_string();
        (!trimmed.is_empty()).then_some(trimmed)
    };

    if let Some(token) = configured.map(str::to_string).and_then(non_empty) {
        return Some(token);
    }

    for name in TOKEN_ENV_VARS {
        if let Some(token) = env_var(name).and_then(non_empty) {
            return Some(token);
        }
    }

    let token_files = [
        env_var("HF_HOME").map(|home| PathBuf::from(home).join("token")),
        env_var("HOME").map(|home| PathBuf::from(home).join(".cache/huggingface/token")),
    ];

    token_files
        .into_iter()
        .flatten()
        .find_map(|path| fs::read_to_string(path).ok().and_then(non_empty))
}
