use std::sync::Arc;

use crate::models::ImageResult;
use crate::providers::ImageGenerator;
use crate::raster;

/// Fans out one text-to-image request per outfit description and collects
/// the results index-aligned with the input.
pub struct OutfitImageGenerator {
    generator: Arc<dyn ImageGenerator>,
}

impl OutfitImageGenerator {
    pub fn new(generator: Arc<dyn ImageGenerator>) -> Self {
        Self { generator }
    }

    /// Generate one image per description, all dispatched concurrently.
    ///
    /// The returned vec has exactly `descriptions.len()` entries and
    /// `result[i]` corresponds to `descriptions[i]` regardless of which
    /// request finishes first. A failed generation leaves `image: None` in
    /// its slot and never aborts the sibling requests.
    pub async fn generate(&self, descriptions: &[String], style_context: &str) -> Vec<ImageResult> {
        let tasks = descriptions.iter().map(|description| {
            let prompt = build_outfit_prompt(description, style_context);
            async move {
                let image = self.generator.text_to_image(&prompt).await;
                let encoding = image.as_ref().and_then(raster::to_base64_png);
                ImageResult {
                    prompt: description.clone(),
                    image,
                    encoding,
                }
            }
        });
        // join_all polls every request concurrently and yields results in
        // input order, so no index bookkeeping is needed.
        futures::future::join_all(tasks).await
    }
}

fn build_outfit_prompt(description: &str, style_context: &str) -> String {
    let context = style_context.trim();
    if context.is_empty() {
        format!(
            "fashion model wearing {}, full body, white background, front view, fashion photography",
            description
        )
    } else {
        format!(
            "fashion model wearing {}, {}, full body, white background, front view, fashion photography",
            description, context
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use image::DynamicImage;

    use super::*;

    /// Stub generator that answers after a per-prompt delay, to exercise
    /// out-of-order completion.
    struct DelayedStub {
        calls: AtomicUsize,
        fail_all: bool,
    }

    impl DelayedStub {
        fn new(fail_all: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail_all,
            })
        }
    }

    #[async_trait]
    impl ImageGenerator for DelayedStub {
        async fn text_to_image(&self, prompt: &str) -> Option<DynamicImage> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            // First-dispatched prompts finish last.
            let delay = Duration::from_millis(30u64.saturating_sub(call as u64 * 10));
            tokio::time::sleep(delay).await;
            if self.fail_all {
                return None;
            }
            // Encode the prompt length into the image width so tests can
            // verify which prompt produced which slot.
            Some(DynamicImage::ImageRgb8(image::RgbImage::new(
                prompt.len() as u32,
                1,
            )))
        }

        async fn image_to_image(
            &self,
            _prompt: &str,
            _init: &DynamicImage,
            _strength: f64,
        ) -> Option<DynamicImage> {
            None
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn results_align_with_input_order() {
        let stub = DelayedStub::new(false);
        let generator = OutfitImageGenerator::new(stub.clone());
        let descriptions = vec![
            "red maxi dress".to_string(),
            "denim jacket".to_string(),
            "linen suit".to_string(),
        ];

        let results = generator.generate(&descriptions, "casual chic").await;

        assert_eq!(results.len(), 3);
        for (result, description) in results.iter().zip(&descriptions) {
            assert_eq!(&result.prompt, description);
            let expected = build_outfit_prompt(description, "casual chic");
            assert_eq!(result.image.as_ref().unwrap().width(), expected.len() as u32);
        }
        assert_eq!(stub.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn failed_slots_are_none_without_error() {
        let stub = DelayedStub::new(true);
        let generator = OutfitImageGenerator::new(stub);
        let descriptions = vec!["a".to_string(), "b".to_string()];

        let results = generator.generate(&descriptions, "").await;

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.image.is_none() && r.encoding.is_none()));
        assert_eq!(results[0].prompt, "a");
        assert_eq!(results[1].prompt, "b");
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let generator = OutfitImageGenerator::new(DelayedStub::new(false));
        assert!(generator.generate(&[], "anything").await.is_empty());
    }
}
