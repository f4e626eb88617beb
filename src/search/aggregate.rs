//! Robust combination of per-region displacements.
//!
//! Weights are correlation coefficients clipped to `[0, 1]`. An unweighted
//! mean and per-axis standard deviation are computed over every region, any
//! region further than one sigma from the mean on either axis is rejected,
//! and the weighted mean of the rest is rounded to the final displacement.

use crate::trace::trace_event;
use crate::util::{HdrAlignError, HdrAlignResult, Vec2};

/// One region's displacement estimate and its confidence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightedDisplacement {
    pub displacement: Vec2<f64>,
    pub weight: f32,
}

impl WeightedDisplacement {
    pub fn new(displacement: Vec2<f64>, weight: f32) -> Self {
        Self {
            displacement,
            weight,
        }
    }

    fn clipped_weight(&self) -> f64 {
        if self.weight.is_nan() {
            return 0.0;
        }
        f64::from(self.weight.clamp(0.0, 1.0))
    }
}

/// Outcome of [`aggregate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aggregate {
    /// Rounded weighted mean of the accepted regions.
    pub displacement: Vec2<i32>,
    pub weighted_mean: Vec2<f64>,
    /// Unweighted mean over all input regions.
    pub raw_mean: Vec2<f64>,
    /// Per-axis standard deviation over all input regions.
    pub sigma: Vec2<f64>,
    /// Regions within one sigma of the raw mean.
    pub used: usize,
    pub rejected: usize,
    /// Mean clipped weight of the accepted regions.
    pub mean_weight: f64,
}

/// Combines region estimates into one integer displacement.
///
/// Fails with `NoUsableRegion` for an empty input or when the sigma filter
/// rejects every estimate, and with `ZeroWeight` when the input or the
/// accepted subset carries no weight.
pub fn aggregate(regions: &[WeightedDisplacement]) -> HdrAlignResult<Aggregate> {
    if regions.is_empty() {
        return Err(HdrAlignError::NoUsableRegion { total: 0 });
    }
    let total_weight: f64 = regions.iter().map(WeightedDisplacement::clipped_weight).sum();
    if total_weight <= 0.0 {
        return Err(HdrAlignError::ZeroWeight {
            used: regions.len(),
        });
    }

    let n = regions.len() as f64;
    let mut sum = Vec2::new(0.0, 0.0);
    let mut sum_sq = Vec2::new(0.0, 0.0);
    for r in regions {
        sum += r.displacement;
        sum_sq += r.displacement.mul_elem(r.displacement);
    }
    let raw_mean = sum / n;
    let variance = sum_sq / n - raw_mean.mul_elem(raw_mean);
    let sigma = variance.map(|v| v.max(0.0).sqrt());

    let mut weight_sum = 0.0;
    let mut weighted = Vec2::new(0.0, 0.0);
    let mut used = 0usize;
    for r in regions {
        let dev = r.displacement - raw_mean;
        if dev.x.abs() > sigma.x || dev.y.abs() > sigma.y {
            continue;
        }
        let w = r.clipped_weight();
        weight_sum += w;
        weighted += r.displacement * w;
        used += 1;
    }
    let rejected = regions.len() - used;

    if used == 0 {
        return Err(HdrAlignError::NoUsableRegion {
            total: regions.len(),
        });
    }
    if weight_sum <= 0.0 {
        return Err(HdrAlignError::ZeroWeight { used });
    }

    let weighted_mean = weighted / weight_sum;
    let displacement = weighted_mean.round_to_i32();
    trace_event!(
        "aggregate",
        used = used,
        rejected = rejected,
        raw_x = raw_mean.x,
        raw_y = raw_mean.y,
        sigma_x = sigma.x,
        sigma_y = sigma.y,
        dx = displacement.x,
        dy = displacement.y,
    );

    Ok(Aggregate {
        displacement,
        weighted_mean,
        raw_mean,
        sigma,
        used,
        rejected,
        mean_weight: weight_sum / used as f64,
    })
}
