pub mod inference;
pub mod photos;
pub mod stylist;

pub use inference::InferenceClient;
pub use photos::PhotoClient;
pub use stylist::StylistClient;

use async_trait::async_trait;
use image::DynamicImage;

/// A remote image-generation provider.
///
/// Every failure path converges to `None` so downstream code never has to
/// catch provider-specific errors; absence is a valid terminal state.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate a raster image from a natural-language prompt alone.
    async fn text_to_image(&self, prompt: &str) -> Option<DynamicImage>;

    /// Transform an existing raster image guided by a prompt. `strength`
    /// controls how much of the input structure is preserved.
    async fn image_to_image(
        &self,
        prompt: &str,
        init: &DynamicImage,
        strength: f64,
    ) -> Option<DynamicImage>;

    /// Whether credentials are present. Gates optional AI paths so callers
    /// can skip a doomed attempt without issuing a request.
    fn is_configured(&self) -> bool;
}

/// A remote source of real photographs matching a keyword.
///
/// Never fails loudly: any error yields an empty vec, because stock photos
/// are a fill source whose absence must not block the pipeline.
#[async_trait]
pub trait PhotoSource: Send + Sync {
    async fn search(&self, query: &str, count: usize) -> Vec<DynamicImage>;
}
