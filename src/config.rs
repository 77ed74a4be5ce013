use std::env;
use std::time::Duration;

/// Settings for the text-to-image / image-to-image inference provider.
///
/// Defaults trade quality for latency: few inference steps and low guidance
/// keep per-image latency in the single-digit-seconds range.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub api_token: Option<String>,
    pub base_url: String,
    pub generate_model: String,
    pub edit_model: String,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
    pub max_retries: usize,
    pub retry_backoff: Duration,
    pub generate_timeout: Duration,
    pub edit_timeout: Duration,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        InferenceConfig {
            api_token: None,
            base_url: "https://router.huggingface.co/hf-inference/models".to_string(),
            // FLUX.1-schnell generates in ~3-5s vs 60s+ for SD 2.1
            generate_model: "black-forest-labs/FLUX.1-schnell".to_string(),
            edit_model: "stabilityai/stable-diffusion-2-inpainting".to_string(),
            num_inference_steps: 4,
            guidance_scale: 3.5,
            max_retries: 2,
            retry_backoff: Duration::from_secs(8),
            generate_timeout: Duration::from_secs(30),
            edit_timeout: Duration::from_secs(60),
        }
    }
}

impl InferenceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        InferenceConfig {
            api_token: env::var("HF_TOKEN").ok(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_models(
        mut self,
        generate_model: impl Into<String>,
        edit_model: impl Into<String>,
    ) -> Self {
        self.generate_model = generate_model.into();
        self.edit_model = edit_model.into();
        self
    }

    pub fn with_retry_policy(mut self, max_retries: usize, retry_backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff = retry_backoff;
        self
    }
}

/// Settings for the stock photo search provider.
#[derive(Debug, Clone)]
pub struct PhotoConfig {
    pub access_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        PhotoConfig {
            access_key: None,
            base_url: "https://api.unsplash.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl PhotoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        PhotoConfig {
            access_key: env::var("UNSPLASH_ACCESS_KEY").ok(),
            ..Self::default()
        }
    }

    pub fn with_access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Settings for the text-generation stylist provider (recommendations + chat).
#[derive(Debug, Clone)]
pub struct StylistConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_retries: usize,
    pub retry_backoff: Duration,
    pub timeout: Duration,
}

impl Default for StylistConfig {
    fn default() -> Self {
        StylistConfig {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            max_retries: 3,
            retry_backoff: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
        }
    }
}

impl StylistConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        StylistConfig {
            api_key: env::var("GOOGLE_API_KEY").ok(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_retry_policy(mut self, max_retries: usize, retry_backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff = retry_backoff;
        self
    }
}

/// Top-level configuration, constructed once and passed down.
///
/// A missing credential degrades the corresponding feature to its
/// no-op/empty-result path rather than raising.
#[derive(Debug, Clone, Default)]
pub struct StyleConfig {
    pub inference: InferenceConfig,
    pub photos: PhotoConfig,
    pub stylist: StylistConfig,
}

impl StyleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        StyleConfig {
            inference: InferenceConfig::from_env(),
            photos: PhotoConfig::from_env(),
            stylist: StylistConfig::from_env(),
        }
    }

    pub fn with_inference(mut self, config: InferenceConfig) -> Self {
        self.inference = config;
        self
    }

    pub fn with_photos(mut self, config: PhotoConfig) -> Self {
        self.photos = config;
        self
    }

    pub fn with_stylist(mut self, config: StylistConfig) -> Self {
        self.stylist = config;
        self
    }
}
