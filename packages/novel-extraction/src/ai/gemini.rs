//! Gemini implementation of the ExtractionClient trait.
//!
//! A reference implementation speaking the Gemini generateContent API.
//!
//! # Example
//!
//! ```rust,ignore
//! use novel_extraction::ai::GeminiClient;
//!
//! let client = GeminiClient::from_env()?.with_model("gemini-2.0-flash");
//! let run = ExtractionRun::new(client);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::traits::client::{ClientError, ExtractionClient, SegmentRequest};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini-based extraction client.
pub struct GeminiClient {
    http: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    /// Create a client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: SecretString::from(api_key.into()),
            model: "gemini-2.0-flash".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Create from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, ClientError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| ClientError::other("GEMINI_API_KEY not set"))?;
        Ok(Self::new(api_key))
    }

    /// Set the model (default: gemini-2.0-flash).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for proxies).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ExtractionClient for GeminiClient {
    async fn extract(&self, request: SegmentRequest) -> Result<String, ClientError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url,
            self.model,
            self.api_key.expose_secret()
        );

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.0,
                response_mime_type: "application/json".to_string(),
            },
        };

        let send = self.http.post(&url).json(&body).send();
        let response = tokio::select! {
            biased;
            _ = request.cancel.cancelled() => return Err(ClientError::cancelled()),
            response = send => response.map_err(|e| ClientError::other(e.to_string()))?,
        };

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let error = ClientError::other(format!("Gemini API error: {}", text))
                .with_status(status.as_u16());
            // 429 and quota signatures classify as rate limits downstream.
            return Err(error);
        }

        let decoded: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ClientError::other(format!("invalid Gemini response: {}", e)))?;

        decoded
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| ClientError::other("empty Gemini response"))
    }
}
