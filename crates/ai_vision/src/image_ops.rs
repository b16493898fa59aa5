//! Local image operations
//!
//! Decoding, exact resizing and alpha flattening. Everything that leaves this
//! module is a baseline JPEG, since that is what WhatsApp and the ASCII-art
//! service accept.

use std::io::Cursor;

use image::{
    DynamicImage, ImageFormat, ImageReader, Rgb, RgbImage, RgbaImage,
    imageops::{self, FilterType},
};
use tracing::debug;

use crate::error::VisionError;

/// Transparent margin kept around the visible content when flattening
pub const FLATTEN_BORDER: u32 = 10;

/// Largest width or height [`resize_to_jpeg`] produces
pub const MAX_TARGET_SIDE: u32 = 4096;

fn reader(data: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, VisionError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| VisionError::Image(format!("failed to guess image format: {e}")))
}

fn decode(data: &[u8]) -> Result<DynamicImage, VisionError> {
    Ok(reader(data)?.decode()?)
}

fn encode_jpeg(image: RgbImage) -> Result<Vec<u8>, VisionError> {
    let mut output = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image).write_to(&mut output, ImageFormat::Jpeg)?;
    Ok(output.into_inner())
}

/// Width and height of an encoded image, read from its header
pub fn dimensions(data: &[u8]) -> Result<(u32, u32), VisionError> {
    Ok(reader(data)?.into_dimensions()?)
}

/// Resize to exactly `width` x `height`, ignoring the aspect ratio
///
/// Sides outside `1..=MAX_TARGET_SIDE` are refused before decoding.
pub fn resize_to_jpeg(data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, VisionError> {
    if width == 0 || height == 0 || width > MAX_TARGET_SIDE || height > MAX_TARGET_SIDE {
        return Err(VisionError::Image(format!(
            "invalid target size {width}x{height}"
        )));
    }
    let image = decode(data)?;
    debug!(
        from_width = image.width(),
        from_height = image.height(),
        width,
        height,
        "Resizing image"
    );
    let resized = image.resize_exact(width, height, FilterType::Lanczos3);
    encode_jpeg(resized.to_rgb8())
}

/// Re-encode as JPEG, compositing transparency onto `background`
///
/// Images with an alpha channel are cropped to their non-transparent
/// content, padded by [`FLATTEN_BORDER`] pixels and laid over the
/// background colour. Opaque images are converted as they are.
pub fn flatten_to_jpeg(data: &[u8], background: [u8; 3]) -> Result<Vec<u8>, VisionError> {
    let image = decode(data)?;
    let rgb = if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        let content = match visible_bounds(&rgba) {
            Some((x, y, width, height)) => imageops::crop_imm(&rgba, x, y, width, height).to_image(),
            None => rgba,
        };
        composite(&content, background, FLATTEN_BORDER)
    } else {
        image.to_rgb8()
    };
    debug!(width = rgb.width(), height = rgb.height(), "Flattened image");
    encode_jpeg(rgb)
}

/// Bounding box `(x, y, width, height)` of pixels with non-zero alpha
fn visible_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            },
        });
    }
    bounds.map(|(min_x, min_y, max_x, max_y)| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

fn composite(content: &RgbaImage, background: [u8; 3], border: u32) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(
        content.width() + border * 2,
        content.height() + border * 2,
        Rgb(background),
    );
    for (x, y, pixel) in content.enumerate_pixels() {
        let alpha = u16::from(pixel[3]);
        let blend = |fg: u8, bg: u8| {
            let value = (u16::from(fg) * alpha + u16::from(bg) * (255 - alpha) + 127) / 255;
            u8::try_from(value).unwrap_or(u8::MAX)
        };
        canvas.put_pixel(
            x + border,
            y + border,
            Rgb([
                blend(pixel[0], background[0]),
                blend(pixel[1], background[1]),
                blend(pixel[2], background[2]),
            ]),
        );
    }
    canvas
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    fn png(image: RgbaImage) -> Vec<u8> {
        let mut output = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut output, ImageFormat::Png)
            .unwrap();
        output.into_inner()
    }

    fn jpeg_pixel(data: &[u8], x: u32, y: u32) -> [u8; 3] {
        let image = image::load_from_memory_with_format(data, ImageFormat::Jpeg)
            .unwrap()
            .to_rgb8();
        image.get_pixel(x, y).0
    }

    fn close(a: [u8; 3], b: [u8; 3]) -> bool {
        a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 12)
    }

    #[test]
    fn dimensions_read_from_header() {
        let data = png(RgbaImage::from_pixel(40, 25, Rgba([0, 0, 0, 255])));
        assert_eq!(dimensions(&data).unwrap(), (40, 25));
    }

    #[test]
    fn garbage_is_an_image_error() {
        assert!(matches!(dimensions(b"nope"), Err(VisionError::Image(_))));
    }

    #[test]
    fn resize_ignores_aspect_ratio() {
        let data = png(RgbaImage::from_pixel(100, 100, Rgba([10, 20, 30, 255])));
        let resized = resize_to_jpeg(&data, 64, 32).unwrap();
        assert_eq!(dimensions(&resized).unwrap(), (64, 32));
        assert!(resized.starts_with(&[0xFF, 0xD8]));
    }

    #[test]
    fn resize_rejects_zero_size() {
        let data = png(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])));
        assert!(resize_to_jpeg(&data, 0, 10).is_err());
    }

    #[test]
    fn resize_refuses_huge_targets_before_allocating() {
        let data = png(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])));
        let err = resize_to_jpeg(&data, 60_000, 60_000).unwrap_err();
        assert!(matches!(err, VisionError::Image(ref m) if m.contains("60000x60000")));
        assert!(resize_to_jpeg(&data, 128, MAX_TARGET_SIDE + 1).is_err());
    }

    #[test]
    fn transparent_image_is_cropped_bordered_and_filled() {
        let mut image = RgbaImage::from_pixel(100, 80, Rgba([0, 0, 0, 0]));
        for x in 30..50 {
            for y in 20..35 {
                image.put_pixel(x, y, Rgba([0, 0, 255, 255]));
            }
        }

        let flattened = flatten_to_jpeg(&png(image), [255, 0, 0]).unwrap();

        assert_eq!(dimensions(&flattened).unwrap(), (20 + 20, 15 + 20));
        assert!(close(jpeg_pixel(&flattened, 1, 1), [255, 0, 0]));
        assert!(close(jpeg_pixel(&flattened, 20, 17), [0, 0, 255]));
    }

    #[test]
    fn fully_transparent_image_keeps_its_size() {
        let image = RgbaImage::from_pixel(8, 6, Rgba([0, 0, 0, 0]));
        let flattened = flatten_to_jpeg(&png(image), [255, 255, 255]).unwrap();
        assert_eq!(dimensions(&flattened).unwrap(), (8 + 20, 6 + 20));
        assert!(close(jpeg_pixel(&flattened, 14, 13), [255, 255, 255]));
    }

    #[test]
    fn opaque_image_is_not_cropped() {
        let data = encode_jpeg(RgbImage::from_pixel(30, 20, Rgb([0, 128, 0]))).unwrap();
        let flattened = flatten_to_jpeg(&data, [255, 255, 255]).unwrap();
        assert_eq!(dimensions(&flattened).unwrap(), (30, 20));
    }

    #[test]
    fn visible_bounds_of_single_pixel() {
        let mut image = RgbaImage::new(5, 5);
        image.put_pixel(3, 1, Rgba([1, 1, 1, 1]));
        assert_eq!(visible_bounds(&image), Some((3, 1, 1, 1)));
        assert_eq!(visible_bounds(&RgbaImage::new(2, 2)), None);
    }

    #[test]
    fn half_transparent_pixels_blend() {
        let mut content = RgbaImage::new(1, 1);
        content.put_pixel(0, 0, Rgba([0, 0, 0, 128]));
        let canvas = composite(&content, [255, 255, 255], 0);
        assert_eq!(canvas.get_pixel(0, 0).0, [127, 127, 127]);
    }
}
