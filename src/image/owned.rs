use crate::image::ImageView;
use crate::util::{HdrAlignError, HdrAlignResult};

/// Owned contiguous image buffer with interleaved channels.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedImage<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
    channels: usize,
}

impl<T: Copy> OwnedImage<T> {
    /// Wraps an interleaved buffer of exactly `width * height * channels` samples.
    pub fn new(data: Vec<T>, width: usize, height: usize, channels: usize) -> HdrAlignResult<Self> {
        if width == 0 || height == 0 {
            return Err(HdrAlignError::InvalidDimensions { width, height });
        }
        if channels == 0 {
            return Err(HdrAlignError::InvalidChannels { channels });
        }
        let needed = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(channels))
            .ok_or(HdrAlignError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(HdrAlignError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(HdrAlignError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Builds an image by evaluating `f(x, y, channel)` for every sample.
    pub fn from_fn<F>(width: usize, height: usize, channels: usize, mut f: F) -> HdrAlignResult<Self>
    where
        F: FnMut(usize, usize, usize) -> T,
    {
        let mut data = Vec::with_capacity(width * height * channels);
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    data.push(f(x, y, c));
                }
            }
        }
        Self::new(data, width, height, channels)
    }

    /// Returns a borrowed view of the whole image.
    pub fn view(&self) -> ImageView<'_, T> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            channels: self.channels,
            stride: self.width * self.channels,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of interleaved samples per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the contiguous sample buffer.
    pub fn data(&self) -> &[T] {
        &self.data
    }
}
