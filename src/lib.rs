pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod providers;
pub mod raster;
pub mod studio;

pub use config::{InferenceConfig, PhotoConfig, StyleConfig, StylistConfig};
pub use error::{Result, StyleError};
pub use models::{
    ImageResult, ImageSource, InspirationItem, StyleProfile, StyleRecommendation, TryOnMethod,
    TryOnResult,
};
pub use providers::{
    ImageGenerator, InferenceClient, PhotoClient, PhotoSource, StylistClient,
};
pub use studio::{InspirationBoard, OutfitImageGenerator, StyleStudio, TryOnCompositor};
