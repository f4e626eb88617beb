//! Region-based displacement search between two images.
//!
//! [`DisplacementFinder`] lays a grid of search windows over B, places a
//! template at the centre of each window in A, and refines every region over
//! several passes: after each search the window shrinks around the match and
//! the template grows. Regions whose peak lands on the window border or whose
//! correlation is too weak are dismissed. The surviving estimates are combined
//! by [`aggregate`].

mod aggregate;
mod params;
mod refine;
mod region;

pub use aggregate::{aggregate, Aggregate, WeightedDisplacement};
pub use params::Params;
pub use region::{RegionReport, RegionStatus};

use crate::image::{ImageView, Sample};
use crate::kernel::{Kernel, NccIncremental};
use crate::layout::{justify_grid, region_count};
use crate::trace::{trace_event, trace_span};
use crate::util::{HdrAlignError, HdrAlignResult, Vec2};
use region::RegionState;

/// Result of registering B against A.
#[derive(Clone, Debug, PartialEq)]
pub struct Registration {
    /// Offset of B's content relative to A: a scene point at `p` in A is at
    /// `p + displacement` in B.
    pub displacement: Vec2<i32>,
    /// Number of refinement passes run.
    pub passes: usize,
    /// Final state of every grid region, in row-major order.
    pub regions: Vec<RegionReport>,
    pub aggregate: Aggregate,
}

/// Finds the integer displacement between two exposures of the same scene.
#[derive(Clone, Debug, Default)]
pub struct DisplacementFinder {
    params: Params,
}

impl DisplacementFinder {
    /// Creates a finder with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the parameters.
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Registers `b` against `a` with the incremental correlation kernel.
    pub fn find<T: Sample>(
        &self,
        a: ImageView<'_, T>,
        b: ImageView<'_, T>,
    ) -> HdrAlignResult<Registration> {
        self.find_with::<NccIncremental, T>(a, b)
    }

    /// Registers `b` against `a` with an explicit kernel.
    pub fn find_with<K: Kernel, T: Sample>(
        &self,
        a: ImageView<'_, T>,
        b: ImageView<'_, T>,
    ) -> HdrAlignResult<Registration> {
        if a.channels() != b.channels() {
            return Err(HdrAlignError::ChannelMismatch {
                template: a.channels(),
                window: b.channels(),
            });
        }

        let (window, template) = self.start_sizes(a.size(), b.size())?;
        let p = region_count(b.width(), window.x, self.params.max_regions_per_axis);
        let q = region_count(b.height(), window.y, self.params.max_regions_per_axis);

        let _span = trace_span!(
            "find",
            a_width = a.width(),
            a_height = a.height(),
            b_width = b.width(),
            b_height = b.height(),
            cols = p,
            rows = q
        )
        .entered();

        let mut regions: Vec<RegionState> = justify_grid(b.size(), window, p, q)
            .into_iter()
            .enumerate()
            .map(|(index, origin_b)| RegionState::new(index, origin_b, window, template, a.size()))
            .collect();

        let passes = refine::run_passes::<K, T>(a, b, &mut regions, &self.params)?;

        let usable: Vec<WeightedDisplacement> = regions
            .iter()
            .filter(|r| r.status != RegionStatus::Dismissed)
            .map(|r| {
                let d = Vec2::new(r.displacement.x as f64, r.displacement.y as f64);
                WeightedDisplacement::new(d, r.rho)
            })
            .collect();
        trace_event!(
            "regions_done",
            total = regions.len(),
            usable = usable.len(),
            passes = passes
        );
        if usable.is_empty() {
            return Err(HdrAlignError::NoUsableRegion {
                total: regions.len(),
            });
        }

        let aggregate = aggregate(&usable).map_err(|err| match err {
            HdrAlignError::NoUsableRegion { .. } => HdrAlignError::NoUsableRegion {
                total: regions.len(),
            },
            other => other,
        })?;
        Ok(Registration {
            displacement: aggregate.displacement,
            passes,
            regions: regions.iter().map(RegionState::report).collect(),
            aggregate,
        })
    }

    /// First-pass `(window, template)` sizes clamped to the images.
    ///
    /// The template is kept strictly smaller than the window on both axes.
    fn start_sizes(
        &self,
        size_a: Vec2<usize>,
        size_b: Vec2<usize>,
    ) -> HdrAlignResult<(Vec2<usize>, Vec2<usize>)> {
        let start_window = self.params.start_search_size;
        let start_template = self.params.start_correl_size;
        let window = Vec2::new(start_window.x.min(size_b.x), start_window.y.min(size_b.y));
        let mut template = Vec2::new(
            start_template.x.min(size_a.x),
            start_template.y.min(size_a.y),
        );
        if template.x >= window.x {
            template.x = window.x.saturating_sub(1);
        }
        if template.y >= window.y {
            template.y = window.y.saturating_sub(1);
        }
        if template.x == 0 || template.y == 0 || (template.x == 1 && template.y == 1) {
            return Err(HdrAlignError::DegenerateTemplate {
                width: template.x,
                height: template.y,
            });
        }
        Ok((window, template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_sizes_keep_template_inside_window() {
        let finder = DisplacementFinder::new().with_params(Params {
            start_search_size: Vec2::new(30, 50),
            start_correl_size: Vec2::new(30, 80),
            ..Params::default()
        });
        let (window, template) = finder
            .start_sizes(Vec2::new(64, 40), Vec2::new(64, 48))
            .unwrap();
        assert_eq!(window, Vec2::new(30, 48));
        assert_eq!(template, Vec2::new(29, 40));
    }

    #[test]
    fn one_pixel_template_is_degenerate() {
        let finder = DisplacementFinder::new().with_params(Params {
            start_search_size: Vec2::new(2, 2),
            start_correl_size: Vec2::new(2, 2),
            ..Params::default()
        });
        assert_eq!(
            finder.start_sizes(Vec2::new(8, 8), Vec2::new(8, 8)),
            Err(HdrAlignError::DegenerateTemplate {
                width: 1,
                height: 1
            })
        );
    }
}
