use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::config::StylistConfig;
use crate::error::{Result, StyleError};
use crate::models::{StyleProfile, StyleRecommendation};

const CHAT_SYSTEM_PROMPT: &str = "You are StyleAI, a friendly and professional \
personal fashion assistant.\n\nGive short, helpful fashion advice.\nBe practical \
and modern.\nKeep responses under 4 sentences.";

const CHAT_BUSY_REPLY: &str = "StyleAI is busy. Please wait a few seconds and try again.";

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Client for the text-generation stylist provider: structured outfit
/// recommendations and a conversational assistant.
///
/// Unlike the image pipeline, failures here propagate as errors. There is no
/// safe default recommendation, and downstream image prompts depend on it.
#[derive(Clone)]
pub struct StylistClient {
    http: Client,
    config: StylistConfig,
}

impl StylistClient {
    pub fn new(config: StylistConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Request a personalized recommendation for `profile`.
    pub async fn recommend(&self, profile: &StyleProfile) -> Result<StyleRecommendation> {
        let prompt = build_recommendation_prompt(profile);
        let text = self.generate(&prompt).await?;
        let object = extract_json_object(&text)?;
        serde_json::from_str(object)
            .map_err(|e| StyleError::InvalidResponse(format!("recommendation JSON: {}", e)))
    }

    /// Answer an ad-hoc fashion question with a short reply. On rate-limit
    /// exhaustion this degrades to a canned busy message instead of an error.
    pub async fn chat(&self, message: &str) -> Result<String> {
        let prompt = format!("{}\n\nUser: {}\nStyleAI:", CHAT_SYSTEM_PROMPT, message);
        match self.generate(&prompt).await {
            Ok(reply) => Ok(reply.trim().to_string()),
            Err(StyleError::RateLimited(_)) => Ok(CHAT_BUSY_REPLY.to_string()),
            Err(e) => Err(e),
        }
    }

    /// One text completion with rate-limit retries. 429 sleeps a fixed
    /// backoff and retries up to the ceiling; every other failure propagates.
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| StyleError::ConfigError("stylist API key is required".into()))?;
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            api_key
        );
        let payload = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        });

        for attempt in 1..=self.config.max_retries {
            let response = self
                .http
                .post(&url)
                .timeout(self.config.timeout)
                .json(&payload)
                .send()
                .await
                .map_err(|e| StyleError::RequestError(format!("stylist request failed: {}", e)))?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                log::warn!(
                    "[stylist] rate limited (attempt {}), waiting {:?}",
                    attempt,
                    self.config.retry_backoff
                );
                tokio::time::sleep(self.config.retry_backoff).await;
                continue;
            }

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                let snippet: String = body.chars().take(200).collect();
                return Err(StyleError::RequestError(format!(
                    "stylist status {}: {}",
                    status, snippet
                )));
            }

            let parsed = response
                .json::<GenerateResponse>()
                .await
                .map_err(|e| StyleError::ResponseError(format!("stylist response: {}", e)))?;
            let text = collect_text(parsed);
            if text.trim().is_empty() {
                return Err(StyleError::InvalidResponse("empty completion".into()));
            }
            return Ok(text);
        }

        Err(StyleError::RateLimited(format!(
            "gave up after {} attempts",
            self.config.max_retries
        )))
    }
}

fn collect_text(response: GenerateResponse) -> String {
    let mut parts_text = Vec::new();
    for candidate in response.candidates.unwrap_or_default() {
        let Some(content) = candidate.content else {
            continue;
        };
        for part in content.parts.unwrap_or_default() {
            if let Some(text) = part.text {
                if !text.trim().is_empty() {
                    parts_text.push(text);
                }
            }
        }
    }
    parts_text.join("\n")
}

fn build_recommendation_prompt(profile: &StyleProfile) -> String {
    fn field(value: &Option<String>) -> &str {
        value.as_deref().unwrap_or("not specified")
    }
    fn num(value: Option<u32>) -> String {
        value.map_or_else(|| "not specified".to_string(), |v| v.to_string())
    }

    format!(
        "You are StyleAI, a professional fashion stylist.\n\n\
         User details:\n\
         Age: {}\n\
         Gender: {}\n\
         Skin tone: {}\n\
         Body type: {}\n\
         Hair type: {}\n\
         Occasion: {}\n\
         Style preference: {}\n\
         Priority: {}\n\
         Budget: {} to {}\n\
         Country: {}\n\
         State: {}\n\
         Color preference: {}\n\n\
         Give highly personalized fashion recommendations.\n\n\
         Return ONLY JSON in this format:\n\
         {{\n\
         \"outfit\": \"\",\n\
         \"makeup\": \"\",\n\
         \"hairstyle\": \"\",\n\
         \"why\": \"\",\n\
         \"trend\": \"\",\n\
         \"image_prompts\": [\"\", \"\", \"\"]\n\
         }}",
        num(profile.age),
        field(&profile.gender),
        field(&profile.skin_tone),
        field(&profile.body_type),
        field(&profile.hair),
        field(&profile.occasion),
        field(&profile.style),
        field(&profile.priority),
        num(profile.budget_min),
        num(profile.budget_max),
        field(&profile.country),
        field(&profile.state),
        field(&profile.colors),
    )
}

/// Extract the first balanced `{...}` object from free text.
///
/// Models wrap JSON in prose or markdown fences; this scans for the first
/// opening brace and returns the slice up to its matching close, tracking
/// string literals and escapes so braces inside values do not miscount.
pub fn extract_json_object(text: &str) -> Result<&str> {
    let mut start = None;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        let Some(s) = start else {
            if c == '{' {
                start = Some(i);
                depth = 1;
            }
            continue;
        };
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[s..i + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    Err(StyleError::InvalidResponse(
        "no balanced JSON object in response".into(),
    ))
}
