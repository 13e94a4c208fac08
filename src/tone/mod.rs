// SPDX-License-Identifier: PMPL-1.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Brand voice analysis
//!
//! Copy is scored 0-100 against a luxury brand voice by a remote generative
//! model. Models do not reliably return bare JSON, so [`parse_model_output`]
//! tolerates code fences and surrounding prose, and degrades to a zero score
//! carrying the raw output rather than failing.

pub mod gemini;

pub use gemini::{ApiKey, GeminiClient};

use crate::error::{BrandguardError, Result};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Longest accepted input, in characters
pub const MAX_TEXT_LENGTH: usize = 5000;

/// Validated text to analyze
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneRequest {
    text: String,
}

impl ToneRequest {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        Self::with_limit(text, MAX_TEXT_LENGTH)
    }

    pub fn with_limit(text: impl Into<String>, max_chars: usize) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(BrandguardError::InvalidInput(
                "text to analyze must not be empty".to_string(),
            ));
        }
        let len = text.chars().count();
        if len > max_chars {
            return Err(BrandguardError::InvalidInput(format!(
                "text exceeds maximum length of {} characters (got {})",
                max_chars, len
            )));
        }
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Score and advice for one piece of copy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneAnalysis {
    pub score: f64,
    pub suggestion: String,
    pub original_text: String,
}

/// The `{score, suggestion}` pair a model returns
#[derive(Debug, Clone, PartialEq)]
pub struct ModelVerdict {
    pub score: f64,
    pub suggestion: String,
}

#[async_trait]
pub trait ToneAnalyzer: Send + Sync {
    async fn analyze(&self, request: &ToneRequest) -> Result<ToneAnalysis>;
}

/// Extract a verdict from free-form model output
pub fn parse_model_output(content: &str) -> ModelVerdict {
    let unfenced = strip_code_fence(content.trim());
    let candidate = first_object(&unfenced).unwrap_or(unfenced.as_str());

    match serde_json::from_str::<serde_json::Value>(candidate) {
        Ok(serde_json::Value::Object(map)) => ModelVerdict {
            score: map.get("score").and_then(|s| s.as_f64()).unwrap_or(0.0),
            suggestion: map
                .get("suggestion")
                .and_then(|s| s.as_str())
                .unwrap_or_default()
                .to_string(),
        },
        parsed => {
            let preview: String = candidate.chars().take(200).collect();
            match parsed {
                Err(e) => warn!(error = %e, content = %preview, "Model output is not JSON"),
                Ok(_) => warn!(content = %preview, "Model output is not a JSON object"),
            }
            ModelVerdict {
                score: 0.0,
                suggestion: candidate.to_string(),
            }
        }
    }
}

/// Drop a Markdown code fence wrapped around the content
fn strip_code_fence(content: &str) -> String {
    let Some(re) = Regex::new(r"(?s)\A```[^\n]*\n?(.*?)(?:\n?```)?\s*\z").ok() else {
        return content.to_string();
    };
    match re.captures(content).and_then(|c| c.get(1)) {
        Some(body) => body.as_str().trim().to_string(),
        None => content.to_string(),
    }
}

/// The first balanced `{...}` in the content
fn first_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let mut depth = 0usize;
    for (i, ch) in content[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&content[start..=start + i]);
                }
            }
            _ => {}
        }
    }
    None
}
