use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::{debug, error};

use crate::errors::CoreError;
use crate::models::settings::AnalystSettings;
use super::traits::{GenerationParams, TextGenerator};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Upper bound the API accepts for `maxOutputTokens`.
const MAX_OUTPUT_TOKENS: u32 = 8192;

const PROVIDER: &str = "Gemini";

/// Google Gemini `generateContent` provider.
///
/// - **Auth**: API key in the `key` query parameter.
/// - **Endpoint**: `POST /models/{model}:generateContent`
/// - **Rate limits**: HTTP 429 is surfaced as `CoreError::RateLimited`.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(settings: &AnalystSettings) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different host (proxies, regional endpoints).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

// ── Gemini API request/response types ───────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Extract the generated text from a raw `generateContent` response body.
///
/// Text parts of the first candidate are concatenated.
pub fn parse_generate_response(body: &str) -> Result<String, CoreError> {
    let resp: GenerateResponse = serde_json::from_str(body).map_err(|e| CoreError::Api {
        provider: PROVIDER.into(),
        message: format!("Failed to parse response: {e}"),
    })?;

    let text: String = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(CoreError::Api {
            provider: PROVIDER.into(),
            message: "Response contained no text".into(),
        });
    }
    Ok(text)
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TextGenerator for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate_text(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, CoreError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_output_tokens.min(MAX_OUTPUT_TOKENS),
            },
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "sending generateContent request");

        let resp = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CoreError::RateLimited(PROVIDER.into()));
        }
        if !status.is_success() {
            error!(%status, model = %self.model, "generateContent request failed");
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("HTTP {status}"),
            });
        }

        let body = resp.text().await?;
        parse_generate_response(&body)
    }
}
