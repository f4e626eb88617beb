use crate::util::Vec2;

/// Configuration of the displacement finder.
///
/// Sizes are in pixels. The defaults are tuned for full-resolution bracket
/// sequences from consumer cameras.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Params {
    /// Search window size of the first pass.
    pub start_search_size: Vec2<usize>,
    /// Template size of the first pass.
    pub start_correl_size: Vec2<usize>,
    /// Upper bound on regions along each image axis.
    pub max_regions_per_axis: usize,
    /// Search window shrink per pass.
    pub search_shrink_step: usize,
    /// Template growth per pass.
    pub correl_grow_step: usize,
    /// Regions whose peak correlation falls below this are dismissed.
    pub min_accepted_rho: f32,
    /// Search the regions of a pass in parallel (requires the `rayon` feature;
    /// ignored otherwise).
    pub parallel: bool,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            start_search_size: Vec2::new(101, 101),
            start_correl_size: Vec2::new(21, 21),
            max_regions_per_axis: 5,
            search_shrink_step: 20,
            correl_grow_step: 20,
            min_accepted_rho: 0.7,
            parallel: false,
        }
    }
}
