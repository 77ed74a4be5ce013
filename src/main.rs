use styleai::{logger, StyleConfig, StyleProfile, StyleStudio};
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init_with_config(
        logger::LoggerConfig::development().with_level(logger::LogLevel::Debug),
    )?;

    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    let session = Uuid::new_v4();
    log::info!("🚀 StyleAI demo session {}", session);

    let config = StyleConfig::from_env();
    if config.inference.api_token.is_none() {
        log::warn!("No HF_TOKEN set - image generation will degrade to empty results");
    }
    if config.photos.access_key.is_none() {
        log::warn!("No UNSPLASH_ACCESS_KEY set - boards will use generated fill only");
    }

    let studio = StyleStudio::new(config);

    // A recommendation drives the image prompts; this is the one call that
    // can fail hard.
    let profile = StyleProfile {
        age: Some(28),
        gender: Some("female".to_string()),
        skin_tone: Some("Olive".to_string()),
        body_type: Some("hourglass".to_string()),
        occasion: Some("evening wedding".to_string()),
        style: Some("modern classic".to_string()),
        budget_min: Some(100),
        budget_max: Some(400),
        ..Default::default()
    };

    let recommendation = match studio.stylist().recommend(&profile).await {
        Ok(recommendation) => {
            log::info!("👗 Outfit: {}", recommendation.outfit);
            log::info!("💄 Makeup: {}", recommendation.makeup);
            log::info!("💇 Hairstyle: {}", recommendation.hairstyle);
            recommendation
        }
        Err(e) => {
            log::error!("❌ Recommendation failed: {}", e);
            return Err(e.into());
        }
    };

    let t = logger::timer("outfit images");
    let results = studio
        .outfits()
        .generate(&recommendation.image_prompts, &recommendation.trend)
        .await;
    t.stop();
    for result in &results {
        match &result.image {
            Some(img) => log::info!("🖼️  '{}' -> {}x{}", result.prompt, img.width(), img.height()),
            None => log::warn!("🖼️  '{}' -> placeholder", result.prompt),
        }
    }

    let t = logger::timer("inspiration board");
    let keywords = vec![recommendation.trend.clone()];
    let board = studio.board().build(&keywords, 2, 1).await;
    t.stop();
    log::info!("📌 Board items: {}", board.len());

    if let Ok(photo_path) = std::env::var("USER_PHOTO") {
        let user_photo = image::open(&photo_path)?;
        let t = logger::timer("virtual try-on");
        let tryon = studio
            .tryon()
            .try_on(&user_photo, &recommendation.outfit, &recommendation.hairstyle, "", true)
            .await;
        t.stop();
        log::info!("🪞 Try-on method: {:?}, success: {}", tryon.method, tryon.success);
    } else {
        log::info!("Set USER_PHOTO to a local image path to run the try-on demo");
    }

    log::info!("🎉 Demo complete");
    Ok(())
}
