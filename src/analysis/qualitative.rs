//! Qualitative scorer: sampled source code sent to a language model
//!
//! The model is asked for a strict JSON object. Whatever comes back, the
//! scorer always yields a structurally valid `gemini_scores` section.

use super::Analysis;
use crate::config::QualitativeConfig;
use crate::constants;
use crate::record::{GeminiScores, QualitativeScores};
use anyhow::{Context, Result};
use async_trait::async_trait;
use minijinja::{Environment, context};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const PROMPT_TEMPLATE: &str = "sustainability_prompt";

fn template_env() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(|| {
        let mut env = Environment::new();
        env.add_template(
            PROMPT_TEMPLATE,
            include_str!("../templates/sustainability_prompt.md"),
        )
        .expect("Failed to add sustainability_prompt template");
        env
    })
}

/// Render the instruction template around an aggregated payload
pub fn render_prompt(code: &str) -> Result<String> {
    let template = template_env()
        .get_template(PROMPT_TEMPLATE)
        .context("Prompt template missing")?;
    template
        .render(context! { code => code })
        .context("Failed to render prompt")
}

/// A text-in, text-out language model service
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Google Generative Language `generateContent` client
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl GeminiClient {
    pub fn new(config: &QualitativeConfig, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(constants::qualitative::DEFAULT_USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            api_key_env: config.api_key_env.clone(),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            anyhow::bail!("No API key found in ${}", self.api_key_env);
        };

        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to reach model {}", self.model))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Model API error ({}): {}", status, error_text.trim());
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse model response")?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .context("Model response has no candidates")?;

        Ok(candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default())
    }
}

/// Stand-in used when qualitative scoring is turned off
pub struct DisabledModel;

#[async_trait]
impl LanguageModel for DisabledModel {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        anyhow::bail!("qualitative scoring disabled")
    }
}

/// Source content selected for one model request
#[derive(Debug, Default, Clone)]
pub struct Payload {
    pub text: String,
    /// Characters of file content included, path headers excluded
    pub total_chars: usize,
    pub included: Vec<PathBuf>,
    pub omitted: usize,
}

/// Keys of the nine numeric scores the model is asked for
const SCORE_KEYS: [&str; 9] = [
    "overall_sustainability",
    "documentation_quality",
    "testing_robustness",
    "modularity_and_design",
    "error_handling",
    "security_best_practices",
    "scalability_potential",
    "environmental_efficiency",
    "social_inclusiveness",
];

/// The JSON object in a model reply, bare or surrounded by prose
fn extract_object(text: &str) -> std::result::Result<Map<String, Value>, String> {
    let value = match serde_json::from_str::<Value>(text.trim()) {
        Ok(value) => value,
        Err(direct) => match (text.find('{'), text.rfind('}')) {
            (Some(start), Some(end)) if end > start => {
                serde_json::from_str::<Value>(&text[start..=end]).map_err(|e| e.to_string())?
            }
            _ if text.trim().is_empty() => return Err("empty model response".to_string()),
            _ => return Err(format!("no JSON object in model response: {}", direct)),
        },
    };

    match value {
        Value::Object(map) => Ok(map),
        other => Err(format!("model response is not a JSON object: {}", other)),
    }
}

/// A number or a numeric string
fn lenient_score(key: &str, value: Option<&Value>) -> std::result::Result<f64, String> {
    match value {
        None => Err(format!("missing score {}", key)),
        Some(Value::Null) => Err(format!("score {} is null", key)),
        Some(Value::Number(number)) => number
            .as_f64()
            .ok_or_else(|| format!("score {} is out of range", key)),
        Some(Value::String(text)) => text
            .trim()
            .parse()
            .map_err(|_| format!("score {} is not numeric: {:?}", key, text)),
        Some(other) => Err(format!("score {} is not a number: {}", key, other)),
    }
}

/// List items as strings, other JSON values in their compact form
fn lenient_list(key: &str, value: Option<&Value>) -> std::result::Result<Vec<String>, String> {
    let stringify = |item: &Value| match item {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };

    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.iter().map(stringify).collect()),
        Some(Value::String(text)) => Ok(vec![text.clone()]),
        Some(other) => Err(format!("{} is not a list: {}", key, other)),
    }
}

/// Parse model output into scores, falling back to diagnostic shapes
///
/// Each field is taken on its own, so one malformed value costs only that
/// value. A reply without any score key keeps the raw text.
pub fn parse_response(text: &str) -> Analysis<GeminiScores> {
    let raw = |reason: String| Analysis::Degraded {
        section: GeminiScores::RawResponse {
            raw_response: text.to_string(),
        },
        reasons: vec![reason],
    };

    let object = match extract_object(text) {
        Ok(object) => object,
        Err(reason) => return raw(reason),
    };
    if !SCORE_KEYS.iter().any(|key| object.contains_key(*key)) {
        return raw("no score keys in model response".to_string());
    }

    let mut scores = QualitativeScores::default();
    let mut reasons = Vec::new();

    let slots = [
        &mut scores.overall_sustainability,
        &mut scores.documentation_quality,
        &mut scores.testing_robustness,
        &mut scores.modularity_and_design,
        &mut scores.error_handling,
        &mut scores.security_best_practices,
        &mut scores.scalability_potential,
        &mut scores.environmental_efficiency,
        &mut scores.social_inclusiveness,
    ];
    for (key, slot) in SCORE_KEYS.iter().zip(slots) {
        match lenient_score(key, object.get(*key)) {
            Ok(value) => *slot = value,
            Err(reason) => reasons.push(reason),
        }
    }

    for (key, list) in [
        ("critical_issues", &mut scores.critical_issues),
        ("improvement_suggestions", &mut scores.improvement_suggestions),
    ] {
        match lenient_list(key, object.get(key)) {
            Ok(items) => *list = items,
            Err(reason) => reasons.push(reason),
        }
    }

    Analysis::from_parts(GeminiScores::Scores(scores.clamped()), reasons)
}

pub struct QualitativeScorer<'a> {
    model: &'a dyn LanguageModel,
    max_total_chars: usize,
    max_attempts: u32,
}

impl<'a> QualitativeScorer<'a> {
    pub fn new(model: &'a dyn LanguageModel, max_total_chars: usize, max_attempts: u32) -> Self {
        Self {
            model,
            max_total_chars,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn from_config(model: &'a dyn LanguageModel, config: &QualitativeConfig) -> Self {
        Self::new(model, config.max_total_chars, config.max_attempts)
    }

    /// Whole files in order, stopping at the first that would reach the budget
    pub fn build_payload(&self, root: &Path, files: &[PathBuf]) -> (Payload, Vec<String>) {
        let mut payload = Payload::default();
        let mut samples = Vec::new();
        let mut reasons = Vec::new();

        for (index, path) in files.iter().enumerate() {
            let code = match fs::read(path) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) => {
                    reasons.push(format!("skipped {}: {}", path.display(), e));
                    continue;
                }
            };

            let chars = code.chars().count();
            if payload.total_chars + chars >= self.max_total_chars {
                payload.omitted = files.len() - index;
                break;
            }

            let relative = path.strip_prefix(root).unwrap_or(path);
            samples.push(format!("File: {}\n{}\n", relative.display(), code));
            payload.total_chars += chars;
            payload.included.push(path.clone());
        }

        payload.text = samples.join("\n");
        (payload, reasons)
    }

    async fn generate_with_retry(&self, prompt: &str) -> Result<String> {
        let mut attempt = 1;
        loop {
            match self.model.generate(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt >= self.max_attempts => return Err(e),
                Err(_) => attempt += 1,
            }
        }
    }

    pub async fn score(&self, root: &Path, files: &[PathBuf]) -> Analysis<GeminiScores> {
        let (payload, mut reasons) = self.build_payload(root, files);

        let response = match render_prompt(&payload.text) {
            Ok(prompt) => self.generate_with_retry(&prompt).await,
            Err(e) => Err(e),
        };

        match response {
            Ok(text) => {
                let parsed = parse_response(&text);
                let section = parsed.section().clone();
                reasons.extend(parsed.reasons().iter().cloned());
                Analysis::from_parts(section, reasons)
            }
            Err(e) => {
                let message = format!("{:#}", e);
                reasons.push(message.clone());
                Analysis::Degraded {
                    section: GeminiScores::error(message),
                    reasons,
                }
            }
        }
    }
}
