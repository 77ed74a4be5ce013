use image::DynamicImage;

/// Where an inspiration-board image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// A real photograph from the stock photo provider.
    Real,
    /// An AI-generated fill image.
    Generated,
}

/// One tile of an inspiration board. Within a keyword group, all `Real`
/// items precede the `Generated` ones.
#[derive(Debug, Clone)]
pub struct InspirationItem {
    pub source: ImageSource,
    pub keyword: String,
    pub image: Option<DynamicImage>,
    pub encoding: Option<String>,
}
