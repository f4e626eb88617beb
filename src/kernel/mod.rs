//! Block-correlation kernels.
//!
//! A kernel slides a template view over every integer offset inside a search
//! window view and scores each placement with the Pearson correlation of the
//! two patches, treating each pixel as a vector over its channels. Both
//! kernels accumulate in `f64` and produce the same surface.

use crate::image::{ImageView, Sample};
use crate::util::{HdrAlignError, HdrAlignResult, Vec2};

mod direct;
mod incremental;
mod surface;

pub use direct::NccDirect;
pub use incremental::NccIncremental;
pub use surface::CorrelationSurface;

/// Peak of one block-correlation search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchResult {
    /// Template top-left offset inside the search window with the highest rho.
    pub best_offset: Vec2<usize>,
    /// Correlation at `best_offset`.
    pub rho_max: f32,
    /// Smallest `neighbour - rho_max` over the axis neighbours; never positive.
    pub min_gradient: f32,
    /// The peak sits on an edge of the offset range.
    pub border_reached: bool,
}

impl SearchResult {
    /// Returns true when the peak is strictly higher than at least one neighbour.
    pub fn has_gradient(&self) -> bool {
        self.min_gradient != 0.0
    }
}

/// Surface and peak produced by a kernel.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    pub surface: CorrelationSurface,
    pub result: SearchResult,
}

/// Kernel trait for block-correlation search.
pub trait Kernel {
    /// Scores every offset of `template` inside `window`.
    ///
    /// `window` must be at least as large as `template` on both axes and both
    /// views must have the same channel count.
    fn search<T: Sample>(
        template: ImageView<'_, T>,
        window: ImageView<'_, T>,
    ) -> HdrAlignResult<SearchOutcome>;

    /// Scores a single offset; `None` when the placement leaves the window or
    /// the views are incompatible.
    fn score_at<T: Sample>(
        template: ImageView<'_, T>,
        window: ImageView<'_, T>,
        dx: usize,
        dy: usize,
    ) -> Option<f32>;
}

/// Result of a search expressed around template and window centres.
#[derive(Clone, Debug, PartialEq)]
pub struct CenteredMatch {
    /// Displacement of the template centre in the window image.
    pub displacement: Vec2<i32>,
    pub outcome: SearchOutcome,
}

/// Searches a `(2n+1)`-sized template centred at `centre_a` in `a` inside a
/// `(2(n+m)+1)`-sized window centred at `centre_b` in `b`.
///
/// The returned displacement is `best_offset - m`, so zero means the two
/// centres correspond.
pub fn search_centered<K: Kernel, T: Sample>(
    a: ImageView<'_, T>,
    centre_a: Vec2<usize>,
    half_template: Vec2<usize>,
    b: ImageView<'_, T>,
    centre_b: Vec2<usize>,
    half_search: Vec2<usize>,
) -> HdrAlignResult<CenteredMatch> {
    let template = centred_roi(a, centre_a, half_template)?;
    let window = centred_roi(b, centre_b, half_template + half_search)?;
    let outcome = K::search(template, window)?;
    let best = outcome.result.best_offset;
    let displacement = Vec2::new(
        best.x as i32 - half_search.x as i32,
        best.y as i32 - half_search.y as i32,
    );
    Ok(CenteredMatch {
        displacement,
        outcome,
    })
}

fn centred_roi<T>(
    view: ImageView<'_, T>,
    centre: Vec2<usize>,
    half: Vec2<usize>,
) -> HdrAlignResult<ImageView<'_, T>> {
    let width = 2 * half.x + 1;
    let height = 2 * half.y + 1;
    match (centre.x.checked_sub(half.x), centre.y.checked_sub(half.y)) {
        (Some(x), Some(y)) => view.roi(x, y, width, height),
        _ => Err(HdrAlignError::RoiOutOfBounds {
            x: centre.x.saturating_sub(half.x),
            y: centre.y.saturating_sub(half.y),
            width,
            height,
            img_width: view.width(),
            img_height: view.height(),
        }),
    }
}

/// Checks the shared preconditions of every kernel.
pub(crate) fn check_views<T>(
    template: &ImageView<'_, T>,
    window: &ImageView<'_, T>,
) -> HdrAlignResult<()> {
    if template.channels() != window.channels() {
        return Err(HdrAlignError::ChannelMismatch {
            template: template.channels(),
            window: window.channels(),
        });
    }
    if window.width() < template.width() || window.height() < template.height() {
        return Err(HdrAlignError::WindowTooSmall {
            template_width: template.width(),
            template_height: template.height(),
            window_width: window.width(),
            window_height: window.height(),
        });
    }
    Ok(())
}

/// Marginal sums of a patch: per-channel sum and total sum of squares.
#[derive(Clone, Debug)]
pub(crate) struct PatchSums {
    pub sum: Vec<f64>,
    pub sum_sq: f64,
}

impl PatchSums {
    pub(crate) fn zeroed(channels: usize) -> Self {
        Self {
            sum: vec![0.0; channels],
            sum_sq: 0.0,
        }
    }

    /// Sums over the `width x height` block of `view` starting at `(x, y)`.
    pub(crate) fn of_block<T: Sample>(
        view: &ImageView<'_, T>,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Self {
        let channels = view.channels();
        let mut sums = Self::zeroed(channels);
        for row in y..y + height {
            let samples = &view.row_slice(row)[x * channels..(x + width) * channels];
            for px in samples.chunks_exact(channels) {
                for (c, &v) in px.iter().enumerate() {
                    let v = v.to_f64();
                    sums.sum[c] += v;
                    sums.sum_sq += v * v;
                }
            }
        }
        sums
    }

    /// `sum_sq - |sum|^2 / n`, i.e. `n` times the total channel variance.
    fn spread(&self, n: f64) -> f64 {
        self.sum_sq - self.sum.iter().map(|s| s * s).sum::<f64>() / n
    }
}

/// Sum of channel-wise products between the template and the window block
/// at `(dx, dy)`.
pub(crate) fn cross_sum<T: Sample>(
    template: &ImageView<'_, T>,
    window: &ImageView<'_, T>,
    dx: usize,
    dy: usize,
) -> f64 {
    let channels = template.channels();
    let row_len = template.width() * channels;
    let x0 = dx * channels;
    let mut acc = 0.0f64;
    for ty in 0..template.height() {
        let a = template.row_slice(ty);
        let b = &window.row_slice(dy + ty)[x0..x0 + row_len];
        acc += a
            .iter()
            .zip(b)
            .map(|(&va, &vb)| va.to_f64() * vb.to_f64())
            .sum::<f64>();
    }
    acc
}

/// Pearson coefficient for vector-valued samples.
///
/// Returns 0 when the covariance vanishes or either patch has no spread.
pub(crate) fn pearson(a: &PatchSums, b: &PatchSums, sum_ab: f64, n: f64) -> f32 {
    let dot: f64 = a.sum.iter().zip(&b.sum).map(|(sa, sb)| sa * sb).sum();
    let cov = sum_ab - dot / n;
    if cov == 0.0 {
        return 0.0;
    }
    let denom = a.spread(n) * b.spread(n);
    if denom <= 0.0 || !denom.is_finite() {
        return 0.0;
    }
    (cov / denom.sqrt()) as f32
}

/// Locates the peak of a filled surface and derives its shape.
pub(crate) fn finish(surface: CorrelationSurface) -> SearchOutcome {
    let (best_offset, rho_max) = surface.argmax().unwrap_or((Vec2::new(0, 0), 0.0));
    let (min_gradient, border_reached) = surface.peak_shape(best_offset);
    SearchOutcome {
        surface,
        result: SearchResult {
            best_offset,
            rho_max,
            min_gradient,
            border_reached,
        },
    }
}

/// Scores one placement from scratch.
pub(crate) fn score_direct<T: Sample>(
    template: &ImageView<'_, T>,
    window: &ImageView<'_, T>,
    dx: usize,
    dy: usize,
) -> Option<f32> {
    check_views(template, window).ok()?;
    if dx > window.width() - template.width() || dy > window.height() - template.height() {
        return None;
    }
    let (w, h) = (template.width(), template.height());
    let a = PatchSums::of_block(template, 0, 0, w, h);
    let b = PatchSums::of_block(window, dx, dy, w, h);
    let ab = cross_sum(template, window, dx, dy);
    Some(pearson(&a, &b, ab, (w * h) as f64))
}
