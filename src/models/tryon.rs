use image::DynamicImage;

/// How a try-on preview was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryOnMethod {
    /// AI image-to-image transformation of the user photo.
    AiComposite,
    /// Standalone outfit render alpha-blended onto the user photo.
    BlendFallback,
    /// No preview could be produced.
    None,
}

#[derive(Debug, Clone)]
pub struct TryOnResult {
    pub image: Option<DynamicImage>,
    pub encoding: Option<String>,
    pub method: TryOnMethod,
    /// `true` iff `image` is present.
    pub success: bool,
}

impl TryOnResult {
    pub fn failed() -> Self {
        TryOnResult {
            image: None,
            encoding: None,
            method: TryOnMethod::None,
            success: false,
        }
    }
}
