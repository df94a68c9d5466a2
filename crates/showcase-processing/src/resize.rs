//! Aspect-preserving resize constrained to a maximum long edge.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Resize so the long edge is at most `max_dimension`, preserving aspect
/// ratio. Sources already within the bound pass through unresized: the
/// pipeline never upscales past native resolution.
pub fn fit_within(img: DynamicImage, max_dimension: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    let long_edge = width.max(height);
    if long_edge <= max_dimension || max_dimension == 0 {
        return img;
    }

    let scale = max_dimension as f32 / long_edge as f32;
    let new_width = ((width as f32 * scale).round() as u32).max(1);
    let new_height = ((height as f32 * scale).round() as u32).max(1);

    let filter = select_filter(width, height, new_width, new_height);
    img.resize(new_width, new_height, filter)
}

/// Select a filter based on the downscale ratio: cheap filters for heavy
/// reductions, Lanczos for near-1:1 work.
pub fn select_filter(
    orig_width: u32,
    orig_height: u32,
    new_width: u32,
    new_height: u32,
) -> FilterType {
    let width_ratio = orig_width as f32 / new_width as f32;
    let height_ratio = orig_height as f32 / new_height as f32;
    let max_ratio = width_ratio.max(height_ratio);

    if max_ratio > 2.0 {
        FilterType::Triangle
    } else if max_ratio > 1.5 {
        FilterType::CatmullRom
    } else {
        FilterType::Lanczos3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
    }

    #[test]
    fn downscales_long_edge() {
        let out = fit_within(test_image(3200, 2400), 1600);
        assert_eq!(out.dimensions(), (1600, 1200));
    }

    #[test]
    fn portrait_constrained_on_height() {
        let out = fit_within(test_image(600, 2400), 1200);
        assert_eq!(out.dimensions(), (300, 1200));
    }

    #[test]
    fn never_upscales() {
        let out = fit_within(test_image(200, 150), 1600);
        assert_eq!(out.dimensions(), (200, 150));
    }

    #[test]
    fn exact_fit_passes_through() {
        let out = fit_within(test_image(1600, 900), 1600);
        assert_eq!(out.dimensions(), (1600, 900));
    }

    #[test]
    fn filter_matches_ratio() {
        assert_eq!(select_filter(4000, 3000, 1000, 750), FilterType::Triangle);
        assert_eq!(select_filter(1800, 1200, 1000, 667), FilterType::CatmullRom);
        assert_eq!(select_filter(1100, 700, 1000, 636), FilterType::Lanczos3);
    }
}
