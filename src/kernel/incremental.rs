//! Block correlation with running window sums.
//!
//! The window's marginal sums (per-channel sum and sum of squares) are kept
//! as per-column totals over the current band of `Ny` rows. Moving one step
//! right adds one column and drops another; moving one row down adds one row
//! to every column total and drops another. Only the cross term is rescanned
//! per offset.

use crate::image::{ImageView, Sample};
use crate::kernel::{
    check_views, cross_sum, finish, pearson, score_direct, CorrelationSurface, Kernel, PatchSums,
    SearchOutcome,
};
use crate::util::HdrAlignResult;

/// Incremental normalized cross-correlation kernel.
pub struct NccIncremental;

/// Per-column band totals of the search window. Lives for one search call.
struct ColumnSums {
    channels: usize,
    sum: Vec<f64>,
    sum_sq: Vec<f64>,
}

impl ColumnSums {
    fn new(width: usize, channels: usize) -> Self {
        Self {
            channels,
            sum: vec![0.0; width * channels],
            sum_sq: vec![0.0; width],
        }
    }

    fn add_row<T: Sample>(&mut self, view: &ImageView<'_, T>, y: usize, sign: f64) {
        let ch = self.channels;
        for (x, px) in view.row_slice(y).chunks_exact(ch).enumerate() {
            for (c, &v) in px.iter().enumerate() {
                let v = v.to_f64();
                self.sum[x * ch + c] += sign * v;
                self.sum_sq[x] += sign * v * v;
            }
        }
    }

    fn apply_column(&self, x: usize, sign: f64, out: &mut PatchSums) {
        let ch = self.channels;
        for (acc, &s) in out.sum.iter_mut().zip(&self.sum[x * ch..(x + 1) * ch]) {
            *acc += sign * s;
        }
        out.sum_sq += sign * self.sum_sq[x];
    }
}

impl Kernel for NccIncremental {
    fn search<T: Sample>(
        template: ImageView<'_, T>,
        window: ImageView<'_, T>,
    ) -> HdrAlignResult<SearchOutcome> {
        check_views(&template, &window)?;

        let channels = template.channels();
        let (tw, th) = (template.width(), template.height());
        let out_w = window.width() - tw + 1;
        let out_h = window.height() - th + 1;
        let n = (tw * th) as f64;
        let a = PatchSums::of_block(&template, 0, 0, tw, th);

        let mut columns = ColumnSums::new(window.width(), channels);
        for y in 0..th {
            columns.add_row(&window, y, 1.0);
        }

        let mut values = Vec::with_capacity(out_w * out_h);
        let mut b = PatchSums::zeroed(channels);
        for dy in 0..out_h {
            if dy > 0 {
                columns.add_row(&window, dy - 1, -1.0);
                columns.add_row(&window, dy + th - 1, 1.0);
            }

            b.sum.iter_mut().for_each(|s| *s = 0.0);
            b.sum_sq = 0.0;
            for x in 0..tw {
                columns.apply_column(x, 1.0, &mut b);
            }

            for dx in 0..out_w {
                if dx > 0 {
                    columns.apply_column(dx - 1, -1.0, &mut b);
                    columns.apply_column(dx + tw - 1, 1.0, &mut b);
                }
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
