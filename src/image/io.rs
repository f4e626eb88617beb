//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{ImageView, OwnedImage};
use crate::util::{HdrAlignError, HdrAlignResult};
use std::path::Path;

/// Creates a borrowed 3-channel view from an 8-bit RGB buffer.
pub fn view_from_rgb8(img: &image::RgbImage) -> HdrAlignResult<ImageView<'_, u8>> {
    ImageView::from_slice(img.as_raw(), img.width() as usize, img.height() as usize, 3)
}

/// Creates a borrowed 3-channel view from a 16-bit RGB buffer.
pub fn view_from_rgb16(
    img: &image::ImageBuffer<image::Rgb<u16>, Vec<u16>>,
) -> HdrAlignResult<ImageView<'_, u16>> {
    ImageView::from_slice(img.as_raw(), img.width() as usize, img.height() as usize, 3)
}

/// Creates an owned 8-bit RGB image from a dynamic image.
pub fn owned_from_rgb8(img: &image::DynamicImage) -> HdrAlignResult<OwnedImage<u8>> {
    let rgb = img.to_rgb8();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    OwnedImage::new(rgb.into_raw(), width, height, 3)
}

/// Creates an owned 16-bit RGB image from a dynamic image.
///
/// 8-bit sources are widened by the `image` crate (`v * 257`), which leaves
/// correlation scores unchanged.
pub fn owned_from_rgb16(img: &image::DynamicImage) -> HdrAlignResult<OwnedImage<u16>> {
    let rgb = img.to_rgb16();
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    OwnedImage::new(rgb.into_raw(), width, height, 3)
}

/// Loads an image from disk as 8-bit RGB.
pub fn load_rgb8_image<P: AsRef<Path>>(path: P) -> HdrAlignResult<OwnedImage<u8>> {
    owned_from_rgb8(&open(path)?)
}

/// Loads an image from disk as 16-bit RGB.
pub fn load_rgb16_image<P: AsRef<Path>>(path: P) -> HdrAlignResult<OwnedImage<u16>> {
    owned_from_rgb16(&open(path)?)
}

fn open<P: AsRef<Path>>(path: P) -> HdrAlignResult<image::DynamicImage> {
    image::open(path).map_err(|err| HdrAlignError::ImageIo {
        reason: err.to_string(),
    })
}
