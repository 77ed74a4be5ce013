pub mod board;
pub mod outfits;
pub mod tryon;

pub use board::InspirationBoard;
pub use outfits::OutfitImageGenerator;
pub use tryon::TryOnCompositor;

use std::sync::Arc;

use crate::config::StyleConfig;
use crate::providers::{InferenceClient, PhotoClient, StylistClient};

/// The assembled styling pipeline: outfit image generation, inspiration
/// boards, virtual try-on, and the stylist provider, all sharing one set of
/// provider clients built from a [`StyleConfig`].
///
/// The three image operations are independent and may run concurrently
/// relative to each other.
pub struct StyleStudio {
    outfits: OutfitImageGenerator,
    board: InspirationBoard,
    tryon: TryOnCompositor,
    stylist: StylistClient,
}

impl StyleStudio {
    pub fn new(config: StyleConfig) -> Self {
        let inference = Arc::new(InferenceClient::new(config.inference));
        let photos = Arc::new(PhotoClient::new(config.photos));

        Self {
            outfits: OutfitImageGenerator::new(inference.clone()),
            board: InspirationBoard::new(photos, inference.clone()),
            tryon: TryOnCompositor::new(inference),
            stylist: StylistClient::new(config.stylist),
        }
    }

    pub fn outfits(&self) -> &OutfitImageGenerator {
        &self.outfits
    }

    pub fn board(&self) -> &InspirationBoard {
        &self.board
    }

    pub fn tryon(&self) -> &TryOnCompositor {
        &self.tryon
    }

    pub fn stylist(&self) -> &StylistClient {
        &self.stylist
    }
}
