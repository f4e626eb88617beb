//! Image views over interleaved multi-channel pixel buffers.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! Pixels store `channels` interleaved samples. The stride counts elements
//! between the starts of consecutive rows, so a stride larger than
//! `width * channels` represents padded rows. ROI slices are zero-copy views
//! into the same backing slice and retain the original stride.

use crate::util::{HdrAlignError, HdrAlignResult, Vec2};

#[cfg(feature = "image-io")]
pub mod io;
mod owned;
mod sample;

pub use owned::OwnedImage;
pub use sample::Sample;

/// Borrowed 2D image view with interleaved channels and an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width * channels`.
    pub fn from_slice(
        data: &'a [T],
        width: usize,
        height: usize,
        channels: usize,
    ) -> HdrAlignResult<Self> {
        let stride = width
            .checked_mul(channels)
            .ok_or(HdrAlignError::InvalidDimensions { width, height })?;
        Self::new(data, width, height, channels, stride)
    }

    /// Creates a view with an explicit stride (in elements).
    pub fn new(
        data: &'a [T],
        width: usize,
        height: usize,
        channels: usize,
        stride: usize,
    ) -> HdrAlignResult<Self> {
        let needed = required_len(width, height, channels, stride)?;
        if data.len() < needed {
            return Err(HdrAlignError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)` as a vector.
    pub fn size(&self) -> Vec2<usize> {
        Vec2::new(self.width, self.height)
    }

    /// Returns the number of interleaved samples per pixel.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the channel samples of pixel `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&'a [T]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = y
            .checked_mul(self.stride)?
            .checked_add(x.checked_mul(self.channels)?)?;
        let end = start.checked_add(self.channels)?;
        self.data.get(start..end)
    }

    /// Returns the interleaved samples of row `y` (`width * channels` long).
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width * self.channels)?;
        self.data.get(start..end)
    }

    /// Row `y` for hot loops that already validated `y < height`.
    #[inline]
    pub(crate) fn row_slice(&self, y: usize) -> &'a [T] {
        let start = y * self.stride;
        &self.data[start..start + self.width * self.channels]
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> HdrAlignResult<ImageView<'a, T>> {
        if width == 0 || height == 0 {
            return Err(HdrAlignError::InvalidDimensions { width, height });
        }

        let out_of_bounds = HdrAlignError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width).ok_or_else(|| out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or_else(|| out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let start = y * self.stride + x * self.channels;
        let data = self
            .data
            .get(start..)
            .ok_or(HdrAlignError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;

        ImageView::new(data, width, height, self.channels, self.stride)
    }
}

fn required_len(
    width: usize,
    height: usize,
    channels: usize,
    stride: usize,
) -> HdrAlignResult<usize> {
    if width == 0 || height == 0 {
        return Err(HdrAlignError::InvalidDimensions { width, height });
    }
    if channels == 0 {
        return Err(HdrAlignError::InvalidChannels { channels });
    }
    let row_len = width
        .checked_mul(channels)
        .ok_or(HdrAlignError::InvalidDimensions { width, height })?;
    if stride < row_len {
        return Err(HdrAlignError::InvalidStride {
            width,
            channels,
            stride,
        });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(row_len))
        .ok_or(HdrAlignError::InvalidDimensions { width, height })?;
    Ok(needed)
}
