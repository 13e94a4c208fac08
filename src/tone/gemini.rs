// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Client for the Gemini `generateContent` API

use super::{parse_model_output, ToneAnalysis, ToneAnalyzer, ToneRequest};
use crate::config::ToneConfig;
use crate::error::{BrandguardError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Keys are sent as a header, never in the URL
const API_KEY_HEADER: &str = "x-goog-api-key";

const RUBRIC: &str = "\
You are a Brand Voice Auditor analyzing text for alignment with luxury brand standards.

Scoring Rubric:
- 90-100%: Elegant, minimalist, sophisticated language with zero sales jargon
- 60-80%: Clear and professional, but slightly too casual or informal
- Below 40%: Aggressive sales language, 'cheap' adjectives, excessive exclamation marks, or overly promotional tone

Your task:
1. Analyze the provided text for brand voice alignment
2. Assign a score from 0-100 based on the rubric
3. Provide a complete, user-friendly suggestion that explains the score and offers specific, actionable improvements

The suggestion should:
- Be written in a clear, professional tone
- Explain why the score was given (2-3 sentences)
- Provide specific recommendations for improvement
- Be complete and self-contained (do not cut off mid-sentence)

Return ONLY a raw JSON object with no markdown formatting, no code blocks, just the JSON:
{\"score\": <number 0-100>, \"suggestion\": \"<complete suggestion text explaining the score and providing actionable feedback>\"}";

/// A named API key, tried in the order given
#[derive(Debug, Clone)]
pub struct ApiKey {
    pub label: String,
    pub value: String,
}

impl ApiKey {
    pub fn new(label: &str, value: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    keys: Vec<ApiKey>,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiClient {
    /// Client with explicit keys, primary first
    pub fn new(config: &ToneConfig, keys: Vec<ApiKey>) -> Result<Self> {
        if keys.is_empty() {
            return Err(BrandguardError::Config(format!(
                "No API key configured (set {} or {})",
                config.api_key_env, config.backup_api_key_env
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            keys,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    /// Client with keys read from the environment variables named in `config`
    pub fn from_env(config: &ToneConfig) -> Result<Self> {
        let keys = [
            ("primary", &config.api_key_env),
            ("backup", &config.backup_api_key_env),
        ]
        .into_iter()
        .filter_map(|(label, var)| {
            std::env::var(var)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| ApiKey::new(label, v))
        })
        .collect();

        Self::new(config, keys)
    }

    fn url(&self) -> String {
        format!(
            "{}/v1/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    async fn generate(&self, request: &ToneRequest, key: &ApiKey) -> Result<ToneAnalysis> {
        let prompt = format!(
            "{}\n\nText to analyze: {}\n\nRemember: The suggestion must be complete and end with a proper sentence. Do not truncate.",
            RUBRIC,
            request.text()
        );
        let payload = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(self.url())
            .header(API_KEY_HEADER, key.value.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(|e| e.without_url())?;

        if !response.status().is_success() {
            return Err(BrandguardError::ToneService(format!(
                "Gemini returned status {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| e.without_url())?;
        if let Some(error) = body.error {
            return Err(BrandguardError::ToneService(format!(
                "Gemini API error: {}",
                error.message.unwrap_or_else(|| "Unknown error".to_string())
            )));
        }

        let content = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .unwrap_or_else(|| "{}".to_string());

        let verdict = parse_model_output(&content);
        Ok(ToneAnalysis {
            score: verdict.score,
            suggestion: verdict.suggestion,
            original_text: request.text().to_string(),
        })
    }
}

#[async_trait]
impl ToneAnalyzer for GeminiClient {
    async fn analyze(&self, request: &ToneRequest) -> Result<ToneAnalysis> {
        let mut last_error = None;

        for key in &self.keys {
            info!(key = %key.label, model = %self.model, "Requesting tone analysis");
            match self.generate(request, key).await {
                Ok(analysis) => {
                    info!(key = %key.label, score = analysis.score, "Tone analysis succeeded");
                    return Ok(analysis);
                }
                Err(err) => {
                    warn!(key = %key.label, error = %err, "Tone analysis failed, trying next key");
                    last_error = Some(err);
                }
            }
        }

        Err(BrandguardError::ToneService(match last_error {
            Some(err) => format!("All API keys failed, last error: {}", err),
            None => "All API keys failed".to_string(),
        }))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_a_key() {
        let err = GeminiClient::new(&ToneConfig::default(), Vec::new())
            .err()
            .unwrap();
        assert!(matches!(err, BrandguardError::Config(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_url() {
        let config = ToneConfig {
            endpoint: "http://localhost:9000/".to_string(),
            ..ToneConfig::default()
        };
        let client = GeminiClient::new(&config, vec![ApiKey::new("primary", "k")]).unwrap();
        assert_eq!(
            client.url(),
            "http://localhost:9000/v1/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_payload_shape() {
        let payload = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hi".to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.5,
                max_output_tokens: 1000,
            },
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 1000);
        assert_eq!(json["generationConfig"]["temperature"], 0.5);
    }
}
