use image::DynamicImage;

/// One slot of an outfit-image generation run.
///
/// `image` is `None` when generation failed after exhausting retries. That is
/// a valid terminal state, not an exceptional one: callers render a
/// placeholder for empty slots.
#[derive(Debug, Clone)]
pub struct ImageResult {
    /// The outfit description this slot was generated for.
    pub prompt: String,
    pub image: Option<DynamicImage>,
    /// Base64-encoded PNG of `image`, when present.
    pub encoding: Option<String>,
}
