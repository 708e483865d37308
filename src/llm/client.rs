use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::env;
use std::time::Duration;
use tracing::{debug, info};

use crate::types::message::{GroundingSource, Role};

/// 生成式文本服务的抽象，便于在测试中替换
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub contents: Vec<Turn>,
    pub system_instruction: String,
    pub search_grounding: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub text: Option<String>,
    pub sources: Vec<GroundingSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    pub timeout_seconds: u64,
    pub api_key_env: String,
    pub search_grounding: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_seconds: 30,
            api_key_env: "GEMINI_API_KEY".to_string(),
            search_grounding: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    config: LlmConfig,
}

impl GeminiClient {
    pub fn new() -> Result<Self> {
        Self::new_with_config(LlmConfig::default())
    }

    pub fn new_with_config(config: LlmConfig) -> Result<Self> {
        let api_key = env::var(&config.api_key_env)
            .with_context(|| format!("{} environment variable not found", config.api_key_env))?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: LlmConfig, api_key: String) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, api_key, config })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request_body(&self, request: &GenerateRequest) -> Value {
        let contents: Vec<Value> = request
            .contents
            .iter()
            .map(|turn| {
                json!({
                    "role": turn.role.wire_name(),
                    "parts": [{ "text": turn.text }]
                })
            })
            .collect();

        let mut body = json!({
            "contents": contents,
            "systemInstruction": {
                "parts": [{ "text": request.system_instruction }]
            }
        });

        // 开启搜索增强
        if request.search_grounding {
            body["tools"] = json!([{ "google_search": {} }]);
        }

        body
    }

    fn parse_response(&self, response_json: Value) -> Result<GenerateResponse> {
        let candidate = match response_json["candidates"].as_array().and_then(|c| c.first()) {
            Some(candidate) => candidate,
            None => return Ok(GenerateResponse::default()),
        };

        // 与 SDK 的 response.text 一致：拼接第一个候选的全部文本片段
        let text: String = candidate["content"]["parts"]
            .as_array()
            .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
            .unwrap_or_default();

        let sources: Vec<GroundingSource> = candidate["groundingMetadata"]["groundingChunks"]
            .as_array()
            .map(|chunks| {
                chunks
                    .iter()
                    .filter_map(|chunk| chunk.get("web"))
                    .map(|web| GroundingSource {
                        title: web["title"].as_str().unwrap_or_default().to_string(),
                        uri: web["uri"].as_str().unwrap_or_default().to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(GenerateResponse {
            text: if text.is_empty() { None } else { Some(text) },
            sources,
        })
    }
}

#[async_trait]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        if request.contents.is_empty() {
            return Err(anyhow::anyhow!("Contents cannot be empty"));
        }

        let body = self.build_request_body(&request);
        debug!(model = %self.config.model, turns = request.contents.len(), "sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .context("Failed to send request to generative API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("API request failed with status {}: {}", status, error_text));
        }

        let response_json: Value = response.json().await.context("Failed to parse JSON response")?;
        let parsed = self.parse_response(response_json)?;
        info!(sources = parsed.sources.len(), has_text = parsed.text.is_some(), "generateContent completed");
        Ok(parsed)
    }
}
