use std::sync::Arc;

use image::DynamicImage;

use crate::models::{TryOnMethod, TryOnResult};
use crate::providers::ImageGenerator;
use crate::raster;

/// Long side the user photo is normalized to before any provider call.
/// Caps payload size and keeps image-to-image latency bounded.
const MAX_PHOTO_SIDE: u32 = 512;

/// Transformation strength for the AI attempt. Balances fidelity to the
/// original photo against a visible outfit change.
const AI_STRENGTH: f64 = 0.55;

/// Fraction of the photo height the fallback outfit render covers.
const OVERLAY_COVER: f32 = 0.70;

/// Blend weight of the fallback overlay.
const OVERLAY_WEIGHT: f32 = 0.45;

/// Produces a virtual try-on preview: AI image-to-image first, then a
/// blend-compositing fallback. Never mutates the caller's photo; all work
/// happens on a resized copy.
pub struct TryOnCompositor {
    generator: Arc<dyn ImageGenerator>,
}

impl TryOnCompositor {
    pub fn new(generator: Arc<dyn ImageGenerator>) -> Self {
        Self { generator }
    }

    /// Render `user_photo` wearing the recommended look.
    ///
    /// The state machine is linear: validate, normalize, compose the style
    /// string, attempt AI compositing (only when enabled and the provider is
    /// configured), then fall back to blending a standalone outfit render
    /// onto the lower portion of the photo. Both attempts failing yields
    /// `{ success: false, method: None }`, not an error.
    pub async fn try_on(
        &self,
        user_photo: &DynamicImage,
        outfit_description: &str,
        hair_makeup_description: &str,
        accessories: &str,
        use_ai_compositing: bool,
    ) -> TryOnResult {
        if user_photo.width() == 0 || user_photo.height() == 0 {
            log::warn!("[tryon] invalid user photo, skipping");
            return TryOnResult::failed();
        }

        let normalized = raster::resize_keep_aspect(user_photo, MAX_PHOTO_SIDE);
        let full_style = [outfit_description, hair_makeup_description, accessories]
            .iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        if use_ai_compositing && self.generator.is_configured() {
            let prompt = format!(
                "person wearing {}, full body, fashion editorial, realistic",
                full_style
            );
            if let Some(image) = self
                .generator
                .image_to_image(&prompt, &normalized, AI_STRENGTH)
                .await
            {
                log::info!("[tryon] AI composite succeeded");
                return finished(image, TryOnMethod::AiComposite);
            }
        }

        let fallback_prompt = format!(
            "fashion model wearing {}, white background, full body",
            full_style
        );
        if let Some(outfit_image) = self.generator.text_to_image(&fallback_prompt).await {
            log::info!("[tryon] blend fallback succeeded");
            let blended =
                raster::blend_overlay(&normalized, &outfit_image, OVERLAY_COVER, OVERLAY_WEIGHT);
            return finished(blended, TryOnMethod::BlendFallback);
        }

        log::warn!("[tryon] all attempts failed");
        TryOnResult::failed()
    }
}

fn finished(image: DynamicImage, method: TryOnMethod) -> TryOnResult {
    TryOnResult {
        encoding: raster::to_base64_png(&image),
        image: Some(image),
        method,
        success: true,
    }
}
