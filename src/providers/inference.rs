use std::time::Duration;

use async_trait::async_trait;
use image::DynamicImage;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use crate::config::InferenceConfig;
use crate::providers::ImageGenerator;
use crate::raster;

/// Resolution the edit model expects for init images. Normalizing up front
/// respects provider constraints and keeps payload size bounded.
const INIT_IMAGE_SIDE: u32 = 512;

/// Client for a hosted inference router serving text-to-image and
/// image-to-image models over plain HTTP.
#[derive(Clone)]
pub struct InferenceClient {
    http: Client,
    config: InferenceConfig,
}

impl InferenceClient {
    pub fn new(config: InferenceConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), model)
    }

    /// Generate an image from a prompt using the configured fast model.
    pub async fn text_to_image(&self, prompt: &str) -> Option<DynamicImage> {
        if prompt.trim().is_empty() {
            log::warn!("[inference] empty prompt, skipping");
            return None;
        }
        let payload = json!({
            "inputs": prompt,
            "parameters": {
                "num_inference_steps": self.config.num_inference_steps,
                "guidance_scale": self.config.guidance_scale,
            },
            "options": { "wait_for_model": true },
        });
        self.dispatch(
            &self.config.generate_model,
            payload,
            self.config.generate_timeout,
        )
        .await
    }

    /// Transform `init` guided by `prompt`. The init image is resized to a
    /// fixed square and sent base64-encoded.
    pub async fn image_to_image(
        &self,
        prompt: &str,
        init: &DynamicImage,
        strength: f64,
    ) -> Option<DynamicImage> {
        if prompt.trim().is_empty() {
            log::warn!("[inference] empty prompt, skipping");
            return None;
        }
        let normalized = raster::resize_square(init, INIT_IMAGE_SIDE);
        let encoded = raster::to_base64_png(&normalized)?;
        let payload = json!({
            "inputs": prompt,
            "parameters": {
                "init_image": encoded,
                "strength": strength,
                "num_inference_steps": 20,
                "guidance_scale": 7.5,
            },
            "options": { "wait_for_model": true },
        });
        self.dispatch(&self.config.edit_model, payload, self.config.edit_timeout)
            .await
    }

    /// POST the payload with bounded retries. Transient failures (provider
    /// warming up, rate limit, timeout, unexpected status) are retried up to
    /// the ceiling and then degrade to `None`; a credential failure returns
    /// `None` immediately.
    async fn dispatch(
        &self,
        model: &str,
        payload: Value,
        timeout: Duration,
    ) -> Option<DynamicImage> {
        let token = match &self.config.api_token {
            Some(token) => token.clone(),
            None => {
                log::error!("[inference] no API token configured");
                return None;
            }
        };
        let url = self.model_url(model);
        let backoff = self.config.retry_backoff;

        for attempt in 1..=self.config.max_retries {
            log::info!("[inference] attempt {} | {}", attempt, model);
            let response = self
                .http
                .post(&url)
                .bearer_auth(&token)
                .timeout(timeout)
                .json(&payload)
                .send()
                .await;

            let response = match response {
                Ok(response) => response,
                Err(e) if e.is_timeout() => {
                    log::warn!("[inference] timeout on attempt {}", attempt);
                    continue;
                }
                Err(e) => {
                    log::error!("[inference] request failed: {}", e);
                    return None;
                }
            };

            match response.status() {
                StatusCode::OK => match response.bytes().await {
                    Ok(bytes) => match image::load_from_memory(&bytes) {
                        Ok(img) => {
                            log::info!("[inference] success | {}", model);
                            return Some(img);
                        }
                        Err(e) => {
                            log::error!("[inference] undecodable image body: {}", e);
                            tokio::time::sleep(backoff).await;
                        }
                    },
                    Err(e) => {
                        log::error!("[inference] failed reading body: {}", e);
                        tokio::time::sleep(backoff).await;
                    }
                },
                StatusCode::SERVICE_UNAVAILABLE => {
                    log::warn!("[inference] model warming up, waiting {:?}", backoff);
                    tokio::time::sleep(backoff).await;
                }
                StatusCode::UNAUTHORIZED => {
                    log::error!("[inference] invalid API token");
                    return None;
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    log::warn!("[inference] rate limited, waiting {:?}", backoff * 2);
                    tokio::time::sleep(backoff * 2).await;
                }
                status => {
                    let body = response.text().await.unwrap_or_default();
                    let snippet: String = body.chars().take(200).collect();
                    log::error!("[inference] status {}: {}", status, snippet);
                    tokio::time::sleep(backoff).await;
                }
            }
        }

        None
    }
}

#[async_trait]
impl ImageGenerator for InferenceClient {
    async fn text_to_image(&self, prompt: &str) -> Option<DynamicImage> {
        InferenceClient::text_to_image(self, prompt).await
    }

    async fn image_to_image(
        &self,
        prompt: &str,
        init: &DynamicImage,
        strength: f64,
    ) -> Option<DynamicImage> {
        InferenceClient::image_to_image(self, prompt, init, strength).await
    }

    fn is_configured(&self) -> bool {
        self.config.api_token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::time::Duration;

    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn png_bytes(w: u32, h: u32, value: u8) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            w,
            h,
            image::Rgb([value, value, value]),
        ));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn test_config(base_url: &str) -> InferenceConfig {
        InferenceConfig::new()
            .with_token("test-token")
            .with_base_url(base_url)
            .with_models("fast-model", "edit-model")
            .with_retry_policy(2, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn retries_exactly_to_ceiling_on_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/fast-model"))
            .respond_with(ResponseTemplate::new(503))
            .expect(2)
            .mount(&server)
            .await;

        let client = InferenceClient::new(test_config(&server.uri()));
        let result = client.text_to_image("red dress").await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn bad_credentials_fail_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/fast-model"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let client = InferenceClient::new(test_config(&server.uri()));
        assert!(client.text_to_image("red dress").await.is_none());
    }

    #[tokio::test]
    async fn missing_token_short_circuits_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = test_config(&server.uri());
        config.api_token = None;
        let client = InferenceClient::new(config);
        assert!(client.text_to_image("red dress").await.is_none());
        assert!(!client.is_configured());
    }

    #[tokio::test]
    async fn empty_prompt_short_circuits_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = InferenceClient::new(test_config(&server.uri()));
        assert!(client.text_to_image("  ").await.is_none());
    }

    #[tokio::test]
    async fn identical_requests_decode_identically() {
        let server = MockServer::start().await;
        let bytes = png_bytes(4, 4, 99);
        Mock::given(method("POST"))
            .and(path("/fast-model"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(serde_json::json!({
                "inputs": "red dress",
                "options": { "wait_for_model": true },
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
            .expect(2)
            .mount(&server)
            .await;

        let client = InferenceClient::new(test_config(&server.uri()));
        let first = client.text_to_image("red dress").await.unwrap().to_rgb8();
        let second = client.text_to_image("red dress").await.unwrap().to_rgb8();
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[tokio::test]
    async fn recovers_after_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/fast-model"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/fast-model"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(4, 4, 7)))
            .expect(1)
            .mount(&server)
            .await;

        let client = InferenceClient::new(test_config(&server.uri()));
        assert!(client.text_to_image("red dress").await.is_some());
    }

    #[tokio::test]
    async fn image_to_image_sends_normalized_init_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/edit-model"))
            .and(body_partial_json(serde_json::json!({
                "parameters": { "strength": 0.55, "num_inference_steps": 20 },
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes(4, 4, 7)))
            .expect(1)
            .mount(&server)
            .await;

        let client = InferenceClient::new(test_config(&server.uri()));
        let init = DynamicImage::ImageRgb8(image::RgbImage::new(300, 400));
        let result = client.image_to_image("denim jacket", &init, 0.55).await;
        assert!(result.is_some());
    }
}
