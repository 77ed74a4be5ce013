use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use image::{imageops::FilterType, DynamicImage, GenericImageView};

/// Encode an image as a base64 PNG string for transport to the presentation
/// layer. Returns `None` if encoding fails.
pub fn to_base64_png(img: &DynamicImage) -> Option<String> {
    let mut buf = Cursor::new(Vec::new());
    if let Err(e) = img.write_to(&mut buf, image::ImageFormat::Png) {
        log::error!("PNG encode failed: {}", e);
        return None;
    }
    Some(general_purpose::STANDARD.encode(buf.into_inner()))
}

/// Downscale so the long side is at most `max_side`, preserving aspect
/// ratio. Images already within bounds are returned unchanged.
pub fn resize_keep_aspect(img: &DynamicImage, max_side: u32) -> DynamicImage {
    let (w, h) = img.dimensions();
    if w.max(h) <= max_side {
        return img.clone();
    }
    img.resize(max_side, max_side, FilterType::Lanczos3)
}

/// Resize to an exact square, ignoring aspect ratio. Inference providers
/// expect a fixed square init image.
pub fn resize_square(img: &DynamicImage, side: u32) -> DynamicImage {
    img.resize_exact(side, side, FilterType::Lanczos3)
}

/// Blend an outfit render onto the lower portion of a user photo.
///
/// The outfit is stretched across the bottom `cover` fraction of the photo
/// and the whole frame is linearly blended at `weight` (the region above the
/// outfit blends against transparent black, matching a flat overlay blend).
/// This is an approximation, not segmentation-aware compositing.
pub fn blend_overlay(
    user: &DynamicImage,
    outfit: &DynamicImage,
    cover: f32,
    weight: f32,
) -> DynamicImage {
    let (w, h) = user.dimensions();
    let outfit_h = ((h as f32 * cover) as u32).max(1);
    let offset = h - outfit_h;
    let outfit_resized = outfit
        .resize_exact(w, outfit_h, FilterType::Lanczos3)
        .to_rgb8();
    let user_rgb = user.to_rgb8();

    let mut out = image::RgbImage::new(w, h);
    for (x, y, px) in out.enumerate_pixels_mut() {
        let u = user_rgb.get_pixel(x, y);
        let o = if y >= offset {
            *outfit_resized.get_pixel(x, y - offset)
        } else {
            image::Rgb([0, 0, 0])
        };
        for c in 0..3 {
            px[c] = (u[c] as f32 * (1.0 - weight) + o[c] as f32 * weight).round() as u8;
        }
    }
    DynamicImage::ImageRgb8(out)
}
