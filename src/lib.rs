//! hdralign registers bracketed exposures of the same scene.
//!
//! The core is a block-correlation displacement finder: a grid of regions is
//! matched between two images with a normalized cross-correlation search whose
//! windows shrink over several passes, and the per-region estimates are
//! combined into one robust integer displacement. A sequence helper chains
//! pairwise results across a whole bracket series.
//!
//! Parallel region search is available through the `rayon` feature, image
//! loading through `image-io` and instrumentation through `tracing`.
//!
//! ```no_run
//! use hdralign::{DisplacementFinder, ImageView};
//!
//! # fn main() -> hdralign::HdrAlignResult<()> {
//! let (w, h) = (640, 480);
//! let a = vec![0u16; w * h * 3];
//! let b = vec![0u16; w * h * 3];
//! let a = ImageView::from_slice(&a, w, h, 3)?;
//! let b = ImageView::from_slice(&b, w, h, 3)?;
//! let registration = DisplacementFinder::new().find(a, b)?;
//! println!("offset {}", registration.displacement);
//! # Ok(())
//! # }
//! ```

pub mod image;
pub mod kernel;
pub mod layout;
pub mod lowlevel;
pub mod search;
pub mod sequence;
mod trace;
pub mod util;

pub use image::{ImageView, OwnedImage, Sample};
pub use kernel::{Kernel, NccDirect, NccIncremental, SearchResult};
pub use search::{
    aggregate, Aggregate, DisplacementFinder, Params, RegionReport, RegionStatus, Registration,
    WeightedDisplacement,
};
pub use sequence::{intersection, register_sequence, Rect, SequenceRegistration};
pub use util::{HdrAlignError, HdrAlignResult, Vec2};

#[cfg(feature = "image-io")]
pub use image::io::{load_rgb16_image, load_rgb8_image};
