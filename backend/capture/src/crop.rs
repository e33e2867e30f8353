//! Crop a viewport screenshot down to a selected region.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use tracing::debug;

use truthlens_core::{data_url, TruthLensError};

use crate::region::Rect;

/// Decode a screenshot data URL into an image.
pub fn decode_screenshot(screenshot: &str) -> Result<DynamicImage, TruthLensError> {
    let (_, bytes) = data_url::decode(screenshot)?;
    image::load_from_memory(&bytes)
        .map_err(|e| TruthLensError::Capture(format!("image decode failed: {e}")))
}

/// Crop `rect` (CSS pixels) out of a screenshot taken at `device_pixel_ratio`
/// and return it as a PNG data URL sized in CSS pixels.
pub fn crop_to_data_url(
    screenshot: &str,
    rect: Rect,
    device_pixel_ratio: f64,
) -> Result<String, TruthLensError> {
    let image = decode_screenshot(screenshot)?;
    let cropped = crop_region(&image, rect, device_pixel_ratio)?;

    let mut buf = Cursor::new(Vec::new());
    cropped
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| TruthLensError::Capture(format!("PNG encode failed: {e}")))?;
    Ok(data_url::encode(data_url::PNG_MIME, buf.get_ref()))
}

pub fn crop_region(
    image: &DynamicImage,
    rect: Rect,
    device_pixel_ratio: f64,
) -> Result<DynamicImage, TruthLensError> {
    if rect.is_degenerate() {
        return Err(TruthLensError::Capture("empty selection".into()));
    }
    let scale = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };

    let (img_w, img_h) = image.dimensions();
    let x = ((rect.left * scale).round().max(0.0) as u32).min(img_w);
    let y = ((rect.top * scale).round().max(0.0) as u32).min(img_h);
    let w = ((rect.width * scale).round() as u32).min(img_w - x);
    let h = ((rect.height * scale).round() as u32).min(img_h - y);
    if w == 0 || h == 0 {
        return Err(TruthLensError::Capture(
            "selection lies outside the screenshot".into(),
        ));
    }

    let out_w = (rect.width.round() as u32).max(1);
    let out_h = (rect.height.round() as u32).max(1);
    debug!(x, y, w, h, out_w, out_h, "Cropping screenshot");

    let cropped = image.crop_imm(x, y, w, h);
    if (w, h) == (out_w, out_h) {
        Ok(cropped)
    } else {
        Ok(cropped.resize_exact(out_w, out_h, FilterType::Triangle))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    /// 200x100 screenshot: left half blue, right half red.
    pub(crate) fn split_screenshot() -> String {
        let img = RgbaImage::from_fn(200, 100, |x, _| if x >= 100 { RED } else { BLUE });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        data_url::encode("image/png", buf.get_ref())
    }

    #[test]
    fn crop_scales_by_device_pixel_ratio() {
        let rect = Rect {
            left: 50.0,
            top: 0.0,
            width: 50.0,
            height: 50.0,
        };
        let url = crop_to_data_url(&split_screenshot(), rect, 2.0).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));

        let out = decode_screenshot(&url).unwrap();
        assert_eq!(out.dimensions(), (50, 50));
        assert_eq!(out.get_pixel(25, 25), RED);
    }

    #[test]
    fn crop_at_unit_ratio_keeps_pixels() {
        let rect = Rect {
            left: 10.0,
            top: 10.0,
            width: 40.0,
            height: 20.0,
        };
        let out = crop_region(&decode_screenshot(&split_screenshot()).unwrap(), rect, 1.0).unwrap();
        assert_eq!(out.dimensions(), (40, 20));
        assert_eq!(out.get_pixel(0, 0), BLUE);
    }

    #[test]
    fn selection_outside_image_fails() {
        let rect = Rect {
            left: 500.0,
            top: 500.0,
            width: 10.0,
            height: 10.0,
        };
        let image = decode_screenshot(&split_screenshot()).unwrap();
        assert!(crop_region(&image, rect, 1.0).is_err());
    }

    #[test]
    fn undecodable_screenshot_fails() {
        let err = crop_to_data_url(
            "data:image/png;base64,AAAA",
            Rect {
                left: 0.0,
                top: 0.0,
                width: 1.0,
                height: 1.0,
            },
            1.0,
        )
        .unwrap_err();
        assert!(matches!(err, TruthLensError::Capture(_)));
    }
}
