// file: src/llm/client.rs
// description: resilient qa extraction client with response validation
// reference: https://platform.openai.com/docs/guides/structured-outputs#json-mode

use crate::error::{PipelineError, Result};
use crate::llm::backend::{CompletionBackend, CompletionRequest, ResponseFormat};
use crate::llm::prompt::PromptBuilder;
use crate::llm::retry::RetryPolicy;
use crate::models::QaCandidate;
use crate::utils::Validator;
use serde_json::{Map, Value};
use tracing::{debug, warn};

const REQUIRED_KEYS: [&str; 3] = ["question", "thought", "answer"];

pub struct QaClient<B> {
    backend: B,
    retry: RetryPolicy,
    prompt: PromptBuilder,
}

impl<B: CompletionBackend> QaClient<B> {
    pub fn new(backend: B, retry: RetryPolicy) -> Self {
        Self {
            backend,
            retry,
            prompt: PromptBuilder::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Asks `model` for QA pairs grounded in `text`. Each attempt re-sends the
    /// request and re-parses the reply; malformed elements are dropped.
    pub async fn complete(
        &self,
        model: &str,
        text: &str,
        source_id: &str,
        requested: Option<usize>,
    ) -> Result<Vec<QaCandidate>> {
        let request = CompletionRequest {
            model: model.to_string(),
            messages: self.prompt.build(text, source_id, requested),
            response_format: ResponseFormat::json_object(),
        };

        debug!("Calling completion backend with model: {}", model);

        self.retry
            .run(&format!("Completion for {}", source_id), || async {
                let content = self.backend.complete(&request).await?;
                debug!(
                    "Raw completion response: {}",
                    Validator::truncate_text(&content, 500)
                );
                parse_candidates(&content, model)
            })
            .await
    }
}

/// Parses a completion body into validated candidates.
pub fn parse_candidates(content: &str, model: &str) -> Result<Vec<QaCandidate>> {
    let parsed: Value = serde_json::from_str(content.trim()).map_err(|e| {
        PipelineError::InvalidResponse(format!(
            "not valid JSON ({}): {}",
            e,
            Validator::truncate_text(content, 200)
        ))
    })?;

    let elements = locate_pairs(parsed)?;
    let total = elements.len();

    let candidates: Vec<QaCandidate> = elements
        .into_iter()
        .filter_map(|element| match validate_element(&element, model) {
            Some(candidate) => Some(candidate),
            None => {
                warn!("Skipping malformed QA pair from LLM: {}", element);
                None
            }
        })
        .collect();

    if candidates.len() < total {
        debug!("Accepted {} of {} QA pairs", candidates.len(), total);
    }
    Ok(candidates)
}

/// JSON mode forces an object at the top level, so the array is often wrapped
/// (`{"qa_pairs": [...]}`) or a single pair is returned bare.
fn locate_pairs(parsed: Value) -> Result<Vec<Value>> {
    match parsed {
        Value::Array(items) => Ok(items),
        Value::Object(map) if has_required_keys(&map) => Ok(vec![Value::Object(map)]),
        Value::Object(map) => map
            .into_iter()
            .find_map(|(_, value)| match value {
                Value::Array(items) => Some(items),
                _ => None,
            })
            .ok_or_else(|| {
                PipelineError::InvalidResponse("JSON object contains no array of QA pairs".into())
            }),
        other => Err(PipelineError::InvalidResponse(format!(
            "expected a JSON array of QA pairs, got {}",
            Validator::truncate_text(&other.to_string(), 200)
        ))),
    }
}

fn has_required_keys(map: &Map<String, Value>) -> bool {
    REQUIRED_KEYS
        .iter()
        .all(|key| map.get(*key).is_some_and(|v| !v.is_null()))
}

fn validate_element(element: &Value, model: &str) -> Option<QaCandidate> {
    let map = element.as_object()?;
    if !has_required_keys(map) {
        return None;
    }

    Some(QaCandidate {
        question: field_text(&map["question"]),
        thought: field_text(&map["thought"]),
        answer: field_text(&map["answer"]),
        model: model.to_string(),
    })
}

fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
