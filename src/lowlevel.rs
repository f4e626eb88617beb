//! Building blocks for custom registration pipelines.
//!
//! Most users only need [`crate::DisplacementFinder`]. These re-exports give
//! direct access to the correlation kernels, their surfaces and the grid
//! layout helpers.

pub use crate::kernel::{
    search_centered, CenteredMatch, CorrelationSurface, Kernel, NccDirect, NccIncremental,
    SearchOutcome, SearchResult,
};
pub use crate::layout::{justify_1d, justify_1d_centered, justify_grid, region_count};
pub use crate::sequence::PairRegistration;
