//! Reference kernel that recomputes every sum per offset.

use crate::image::{ImageView, Sample};
use crate::kernel::{
    check_views, cross_sum, finish, pearson, score_direct, CorrelationSurface, Kernel, PatchSums,
    SearchOutcome,
};
use crate::util::HdrAlignResult;

/// Direct block correlation: `O(Nx * Ny)` work per offset for every sum.
///
/// Slow but obviously correct; used to cross-check [`super::NccIncremental`].
pub struct NccDirect;

impl Kernel for NccDirect {
    fn search<T: Sample>(
        template: ImageView<'_, T>,
        window: ImageView<'_, T>,
    ) -> HdrAlignResult<SearchOutcome> {
        check_views(&template, &window)?;

        let (tw, th) = (template.width(), template.height());
        let out_w = window.width() - tw + 1;
        let out_h = window.height() - th + 1;
        let n = (tw * th) as f64;
        let a = PatchSums::of_block(&template, 0, 0, tw, th);

        let mut values = Vec::with_capacity(out_w * out_h);
        for dy in 0..out_h {
            for dx in 0..out_w {
                let b = PatchSums::of_block(&window, dx, dy, tw, th);
                let ab = cross_sum(&template, &window, dx, dy);
                values.push(pearson(&a, &b, ab, n));
            }
        }

        Ok(finish(CorrelationSurface::from_values(out_w, out_h, values)))
    }

    fn score_at<T: Sample>(
        template: ImageView<'_, T>,
        window: ImageView<'_, T>,
        dx: usize,
        dy: usize,
    ) -> Option<f32> {
        score_direct(&template, &window, dx, dy)
    }
}
