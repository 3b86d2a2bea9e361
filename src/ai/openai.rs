//! OpenAI-compatible chat completion and image generation client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{
    prompts, AiError, ContentGenerator, CopyRequest, GeneratedCopy, HashtagAnalysis,
    HashtagRequest, HashtagSuggestion, ImageRequest,
};
use crate::config::AiConfig;

const MAX_ERROR_BODY: usize = 300;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
    response_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
}

pub struct OpenAiGenerator {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    chat_model: String,
    image_model: String,
}

impl OpenAiGenerator {
    /// `Ok(None)` when no API key is configured.
    pub fn from_config(config: &AiConfig) -> Result<Option<Self>, AiError> {
        let Some(api_key) = config.api_key.clone() else {
            return Ok(None);
        };

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()?;

        Ok(Some(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            chat_model: config.chat_model.clone(),
            image_model: config.image_model.clone(),
        }))
    }

    async fn chat(
        &self,
        system: Option<&str>,
        user: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, AiError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: user,
        });

        let body = ChatRequest {
            model: &self.chat_model,
            messages,
            max_tokens,
            temperature,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AiError::InvalidResponse("empty completion".to_string()))
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut message = response.text().await.unwrap_or_default();
    if message.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|&i| message.is_char_boundary(i))
            .unwrap_or(0);
        message.truncate(cut);
    }

    Err(AiError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ContentGenerator for OpenAiGenerator {
    async fn regenerate_copy(&self, request: &CopyRequest) -> Result<GeneratedCopy, AiError> {
        let content = self
            .chat(
                Some(prompts::COPY_SYSTEM_PROMPT),
                &prompts::copy_prompt(request),
                300,
                0.7,
            )
            .await?;

        let hashtags = self
            .chat(
                None,
                &prompts::copy_hashtags_prompt(request.platform, &content),
                100,
                0.5,
            )
            .await?;

        Ok(GeneratedCopy { content, hashtags })
    }

    async fn suggest_hashtags(
        &self,
        request: &HashtagRequest,
    ) -> Result<HashtagSuggestion, AiError> {
        let hashtags = self
            .chat(
                Some(prompts::HASHTAG_SYSTEM_PROMPT),
                &prompts::hashtag_prompt(request),
                150,
                0.7,
            )
            .await?;

        // The analysis is a nice-to-have; a failed call keeps the hashtags.
        let analysis = match self
            .chat(
                None,
                &prompts::hashtag_analysis_prompt(request.platform, &hashtags),
                200,
                0.3,
            )
            .await
        {
            Ok(raw) => HashtagAnalysis::parse_or_default(&raw),
            Err(e) => {
                tracing::warn!(error = %e, "hashtag analysis failed, using default");
                HashtagAnalysis::default()
            }
        };

        Ok(HashtagSuggestion { hashtags, analysis })
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<Vec<u8>, AiError> {
        let prompt = request.prompt();
        let body = ImageGenerationRequest {
            model: &self.image_model,
            prompt: &prompt,
            n: 1,
            size: "1024x1024",
            response_format: "url",
        };

        let response = self
            .http
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;

        let parsed: ImageGenerationResponse = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;

        let url = parsed
            .data
            .into_iter()
            .find_map(|d| d.url)
            .ok_or_else(|| AiError::InvalidResponse("no image url".to_string()))?;

        let image = check_status(self.http.get(&url).send().await?).await?;
        let bytes = image.bytes().await?;
        if bytes.is_empty() {
            return Err(AiError::InvalidResponse("empty image".to_string()));
        }

        Ok(bytes.to_vec())
    }
}
