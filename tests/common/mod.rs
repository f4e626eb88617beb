//! Synthetic scenes shared by the integration tests.

#![allow(dead_code)]

use hdralign::OwnedImage;

fn clamp(v: i64, len: usize) -> usize {
    v.clamp(0, len as i64 - 1) as usize
}

/// Small repeating texture that keeps every patch distinguishable.
pub fn texture(x: usize, y: usize, c: usize) -> usize {
    ((x * 13 + c * 29) ^ (y * 7) ^ (x * y)) & 0x3F
}

/// Per-channel ramps with texture on top.
pub fn textured_gradient(x: usize, y: usize, c: usize) -> u8 {
    let t = texture(x, y, c);
    let v = match c {
        0 => (x * 3) / 2 + t,
        1 => (y * 3) / 2 + t,
        _ => (x + y) / 2 + 2 * t,
    };
    v as u8
}

/// Integer hash noise in `0..=255`.
pub fn hash_noise(x: usize, y: usize, c: usize) -> u8 {
    let mut h = ((x as u64).wrapping_mul(73856093)
        ^ (y as u64).wrapping_mul(19349663)
        ^ (c as u64).wrapping_mul(83492791))
        & 0xFFFF_FFFF;
    h = ((h ^ (h >> 13)).wrapping_mul(0x5bd1_e995)) & 0xFFFF_FFFF;
    ((h ^ (h >> 15)) & 0xFF) as u8
}

/// Smooth periodic pattern used to probe the correlation surface.
pub fn smooth(x: usize, y: usize, c: usize) -> u8 {
    let (x, y, c) = (x as f64, y as f64, c as f64);
    let v = 128.0
        + 50.0 * (x * 0.3 + c).sin()
        + 50.0 * (y * 0.25 - c * 0.5).cos()
        + 10.0 * ((x + y) * 0.11).sin();
    (v + 0.5).floor() as u8
}

/// Renders `scene` and a copy whose content moved by `(dx, dy)`.
///
/// `B(x, y) = A(x - dx, y - dy)` with edge pixels repeated.
pub fn shifted_pair<F>(
    width: usize,
    height: usize,
    dx: i64,
    dy: i64,
    scene: F,
) -> (OwnedImage<u8>, OwnedImage<u8>)
where
    F: Fn(usize, usize, usize) -> u8,
{
    let a = OwnedImage::from_fn(width, height, 3, &scene).unwrap();
    let b = OwnedImage::from_fn(width, height, 3, |x, y, c| {
        scene(
            clamp(x as i64 - dx, width),
            clamp(y as i64 - dy, height),
            c,
        )
    })
    .unwrap();
    (a, b)
}

/// Scene with a flat band of `sky_rows` rows above hash noise.
pub fn sky_scene(
    width: usize,
    height: usize,
    sky_rows: usize,
    sky: u8,
) -> impl Fn(usize, usize, usize) -> u8 {
    move |x, y, c| {
        let x = x.min(width - 1);
        let y = y.min(height - 1);
        if y < sky_rows {
            sky
        } else {
            hash_noise(x, y, c)
        }
    }
}

/// Applies an exposure change `v * num / den + offset` to every sample.
pub fn expose(img: &OwnedImage<u8>, num: u32, den: u32, offset: u32) -> OwnedImage<u8> {
    let data = img
        .data()
        .iter()
        .map(|&v| (u32::from(v) * num / den + offset).min(255) as u8)
        .collect();
    OwnedImage::new(data, img.width(), img.height(), img.channels()).unwrap()
}
