//! Error types for hdralign.

use thiserror::Error;

/// Result alias for hdralign operations.
pub type HdrAlignResult<T> = std::result::Result<T, HdrAlignError>;

/// Errors that can occur when registering bracketed exposures.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum HdrAlignError {
    /// Width or height is zero, or their product overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// A pixel must carry at least one channel.
    #[error("invalid channel count: {channels}")]
    InvalidChannels { channels: usize },
    /// Row stride is shorter than one row of interleaved samples.
    #[error("invalid stride {stride} for width {width} with {channels} channels")]
    InvalidStride {
        width: usize,
        channels: usize,
        stride: usize,
    },
    /// Backing buffer is shorter than the view requires.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Requested sub-window does not fit inside the image.
    #[error("roi ({x}, {y}, {width}x{height}) exceeds image {img_width}x{img_height}")]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Template and search window have a different channel layout.
    #[error("channel mismatch: template has {template}, window has {window}")]
    ChannelMismatch { template: usize, window: usize },
    /// Search window is smaller than the template in at least one axis.
    #[error(
        "search window {window_width}x{window_height} smaller than template {template_width}x{template_height}"
    )]
    WindowTooSmall {
        template_width: usize,
        template_height: usize,
        window_width: usize,
        window_height: usize,
    },
    /// The correlation template collapsed to a single pixel or less.
    #[error("degenerate correlation template: {width}x{height}")]
    DegenerateTemplate { width: usize, height: usize },
    /// Every region was dismissed, or there were no regions at all.
    #[error("no usable region (out of {total})")]
    NoUsableRegion { total: usize },
    /// Usable regions exist but their summed confidence weight is zero.
    #[error("zero total weight over {used} usable regions")]
    ZeroWeight { used: usize },
    /// No displacement links the image at `index` to its predecessor.
    #[error("offset chain broken at image {index}")]
    BrokenChain { index: usize },
    /// Image decoding or loading failed.
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}
