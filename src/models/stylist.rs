use serde::{Deserialize, Serialize};

/// The user attributes the stylist provider personalizes against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleProfile {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub skin_tone: Option<String>,
    pub body_type: Option<String>,
    pub hair: Option<String>,
    pub occasion: Option<String>,
    pub style: Option<String>,
    pub priority: Option<String>,
    pub budget_min: Option<u32>,
    pub budget_max: Option<u32>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub colors: Option<String>,
}

/// A structured recommendation from the stylist provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleRecommendation {
    pub outfit: String,
    #[serde(default)]
    pub makeup: String,
    #[serde(default)]
    pub hairstyle: String,
    #[serde(default)]
    pub why: String,
    #[serde(default)]
    pub trend: String,
    /// Up to 3 text-to-image prompts derived from the recommendation.
    #[serde(default)]
    pub image_prompts: Vec<String>,
}
