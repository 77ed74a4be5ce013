use async_trait::async_trait;
use image::DynamicImage;
use serde::Deserialize;

use crate::config::PhotoConfig;
use crate::providers::PhotoSource;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    urls: PhotoUrls,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    // small renditions download faster than regular
    small: Option<String>,
}

/// Client for a stock photo search API.
///
/// Deliberately asymmetric with the inference client: every failure, missing
/// credential, or non-200 yields a silent empty vec. Real photos are a
/// nice-to-have fill source and their absence must never block the pipeline.
#[derive(Clone)]
pub struct PhotoClient {
    http: reqwest::Client,
    config: PhotoConfig,
}

impl PhotoClient {
    pub fn new(config: PhotoConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub async fn search(&self, query: &str, count: usize) -> Vec<DynamicImage> {
        let Some(access_key) = &self.config.access_key else {
            log::debug!("[photos] no access key configured, skipping '{}'", query);
            return Vec::new();
        };

        let per_page = count.to_string();
        let response = self
            .http
            .get(format!(
                "{}/search/photos",
                self.config.base_url.trim_end_matches('/')
            ))
            .query(&[
                ("query", query),
                ("per_page", per_page.as_str()),
                ("orientation", "portrait"),
                ("client_id", access_key.as_str()),
            ])
            .timeout(self.config.timeout)
            .send()
            .await;

        let response = match response {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                log::warn!("[photos] search status {} for '{}'", response.status(), query);
                return Vec::new();
            }
            Err(e) => {
                log::warn!("[photos] search failed for '{}': {}", query, e);
                return Vec::new();
            }
        };

        let parsed = match response.json::<SearchResponse>().await {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("[photos] unparsable search response: {}", e);
                return Vec::new();
            }
        };

        let mut images = Vec::new();
        for result in parsed.results.into_iter().take(count) {
            let Some(url) = result.urls.small else {
                continue;
            };
            if let Some(img) = self.download(&url).await {
                images.push(img);
            }
        }
        log::info!("[photos] {} photos for '{}'", images.len(), query);
        images
    }

    async fn download(&self, url: &str) -> Option<DynamicImage> {
        let response = self
            .http
            .get(url)
            .timeout(self.config.timeout)
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let bytes = response.bytes().await.ok()?;
        match image::load_from_memory(&bytes) {
            Ok(img) => Some(img),
            Err(e) => {
                log::warn!("[photos] undecodable photo from {}: {}", url, e);
                None
            }
        }
    }
}

#[async_trait]
impl PhotoSource for PhotoClient {
    async fn search(&self, query: &str, count: usize) -> Vec<DynamicImage> {
        PhotoClient::search(self, query, count).await
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(4, 4));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn test_config(base_url: &str) -> PhotoConfig {
        PhotoConfig::new()
            .with_access_key("test-key")
            .with_base_url(base_url)
    }

    #[tokio::test]
    async fn missing_key_returns_empty_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = PhotoClient::new(PhotoConfig::new().with_base_url(server.uri()));
        assert!(client.search("boho", 2).await.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_returns_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = PhotoClient::new(test_config(&server.uri()));
        assert!(client.search("boho", 2).await.is_empty());
    }

    #[tokio::test]
    async fn downloads_each_result_and_caps_at_count() {
        let server = MockServer::start().await;
        let photo_url = format!("{}/photo.png", server.uri());
        let body = serde_json::json!({
            "results": [
                { "urls": { "small": photo_url } },
                { "urls": { "small": photo_url } },
                { "urls": { "small": photo_url } },
            ]
        });
        Mock::given(method("GET"))
            .and(path("/search/photos"))
            .and(query_param("query", "boho fashion outfit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/photo.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(png_bytes()))
            .expect(2)
            .mount(&server)
            .await;

        let client = PhotoClient::new(test_config(&server.uri()));
        let images = client.search("boho fashion outfit", 2).await;
        assert_eq!(images.len(), 2);
    }
}
