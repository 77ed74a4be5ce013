use std::sync::Arc;

use crate::models::{ImageSource, InspirationItem};
use crate::providers::{ImageGenerator, PhotoSource};
use crate::raster;

/// Builds an inspiration board per style keyword: real photographs first,
/// AI-generated fill for whatever the photo provider could not supply.
pub struct InspirationBoard {
    photos: Arc<dyn PhotoSource>,
    generator: Arc<dyn ImageGenerator>,
}

impl InspirationBoard {
    pub fn new(photos: Arc<dyn PhotoSource>, generator: Arc<dyn ImageGenerator>) -> Self {
        Self { photos, generator }
    }

    /// For each keyword, fetch up to `n_real` stock photos and fill any
    /// deficit toward `n_real + n_generated` with one generated image.
    ///
    /// Keywords are processed sequentially in input order: stock lookups are
    /// fast, and serializing the generation fill keeps pressure off the
    /// rate-limited inference provider. Within a keyword, real items always
    /// precede generated ones. A keyword where both sources come up short
    /// simply contributes fewer items; that is never an error.
    pub async fn build(
        &self,
        keywords: &[String],
        n_real: usize,
        n_generated: usize,
    ) -> Vec<InspirationItem> {
        let mut items = Vec::new();

        for keyword in keywords {
            let query = format!("{} fashion outfit", keyword);
            let real = self.photos.search(&query, n_real).await;
            let real_count = real.len().min(n_real);
            for image in real.into_iter().take(n_real) {
                items.push(InspirationItem {
                    source: ImageSource::Real,
                    keyword: keyword.clone(),
                    encoding: raster::to_base64_png(&image),
                    image: Some(image),
                });
            }

            let deficit = (n_real + n_generated).saturating_sub(real_count);
            if deficit > 0 {
                let prompt = format!(
                    "Pinterest fashion inspo, {}, editorial aesthetic, studio",
                    keyword
                );
                if let Some(image) = self.generator.text_to_image(&prompt).await {
                    items.push(InspirationItem {
                        source: ImageSource::Generated,
                        keyword: keyword.clone(),
                        encoding: raster::to_base64_png(&image),
                        image: Some(image),
                    });
                }
            }
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use image::DynamicImage;

    use super::*;

    struct StubPhotos {
        per_query: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PhotoSource for StubPhotos {
        async fn search(&self, _query: &str, count: usize) -> Vec<DynamicImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (0..self.per_query.min(count))
                .map(|_| DynamicImage::ImageRgb8(image::RgbImage::new(2, 2)))
                .collect()
        }
    }

    struct StubGenerator {
        succeed: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ImageGenerator for StubGenerator {
        async fn text_to_image(&self, _prompt: &str) -> Option<DynamicImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.succeed
                .then(|| DynamicImage::ImageRgb8(image::RgbImage::new(2, 2)))
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

    fn board(per_query: usize, generator_succeeds: bool) -> (InspirationBoard, Arc<StubPhotos>, Arc<StubGenerator>) {
        let photos = Arc::new(StubPhotos {
            per_query,
            calls: AtomicUsize::new(0),
        });
        let generator = Arc::new(StubGenerator {
            succeed: generator_succeeds,
            calls: AtomicUsize::new(0),
        });
        (
            InspirationBoard::new(photos.clone(), generator.clone()),
            photos,
            generator,
        )
    }

    #[tokio::test]
    async fn full_real_quota_skips_generation() {
        let (board, _, generator) = board(2, true);
        let items = board.build(&["boho".to_string()], 2, 1).await;

        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.source == ImageSource::Real));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_real_results_attempt_one_generation() {
        let (board, _, generator) = board(0, true);
        let items = board.build(&["boho".to_string()], 2, 1).await;

        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source, ImageSource::Generated);
        assert_eq!(items[0].keyword, "boho");
    }

    #[tokio::test]
    async fn failed_generation_contributes_nothing() {
        let (board, _, generator) = board(0, false);
        let items = board.build(&["boho".to_string()], 2, 1).await;

        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn real_items_precede_generated_per_keyword() {
        let (board, photos, _) = board(1, true);
        let keywords = vec!["boho".to_string(), "minimal".to_string()];
        let items = board.build(&keywords, 2, 1).await;

        assert_eq!(photos.calls.load(Ordering::SeqCst), 2);
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].keyword, "boho");
        assert_eq!(items[0].source, ImageSource::Real);
        assert_eq!(items[1].keyword, "boho");
        assert_eq!(items[1].source, ImageSource::Generated);
        assert_eq!(items[2].keyword, "minimal");
        assert_eq!(items[2].source, ImageSource::Real);
        assert_eq!(items[3].source, ImageSource::Generated);
    }
}
