//! Pass loop over the region grid.
//!
//! Every pass searches each active region once and then updates its windows.
//! Regions only read the two images and write their own state, so a pass can
//! run them in any order; the next pass starts after all of them are done.

use crate::image::{ImageView, Sample};
use crate::kernel::Kernel;
use crate::search::region::RegionState;
use crate::search::Params;
use crate::trace::{trace_debug, trace_span};
use crate::util::HdrAlignResult;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Runs passes until no region is active. Returns the number of passes.
pub(crate) fn run_passes<K: Kernel, T: Sample>(
    a: ImageView<'_, T>,
    b: ImageView<'_, T>,
    regions: &mut [RegionState],
    params: &Params,
) -> HdrAlignResult<usize> {
    let mut passes = 0usize;
    loop {
        let active = regions.iter().filter(|r| r.is_active()).count();
        if active == 0 {
            return Ok(passes);
        }
        passes += 1;
        let _span = trace_span!("refine_pass", pass = passes, active = active).entered();
        run_pass::<K, T>(a, b, regions, params)?;
    }
}

fn run_pass<K: Kernel, T: Sample>(
    a: ImageView<'_, T>,
    b: ImageView<'_, T>,
    regions: &mut [RegionState],
    params: &Params,
) -> HdrAlignResult<()> {
    #[cfg(feature = "rayon")]
    {
        if params.parallel {
            return regions
                .par_iter_mut()
                .filter(|r| r.is_active())
                .try_for_each(|r| step_region::<K, T>(a, b, r, params));
        }
    }

    for region in regions.iter_mut().filter(|r| r.is_active()) {
        step_region::<K, T>(a, b, region, params)?;
    }
    Ok(())
}

/// Searches one region and prepares its next pass.
fn step_region<K: Kernel, T: Sample>(
    a: ImageView<'_, T>,
    b: ImageView<'_, T>,
    region: &mut RegionState,
    params: &Params,
) -> HdrAlignResult<()> {
    let template = a.roi(
        region.origin_a.x,
        region.origin_a.y,
        region.template.x,
        region.template.y,
    )?;
    let window = b.roi(
        region.origin_b.x,
        region.origin_b.y,
        region.window.x,
        region.window.y,
    )?;
    let outcome = K::search(template, window)?;

    let searched_template = region.template;
    let searched_window = region.window;
    region.record(&outcome.result, params.min_accepted_rho);
    if region.is_active() {
        region.advance(
            a.size(),
            b.size(),
            params.search_shrink_step,
            params.correl_grow_step,
        );
    }

    trace_debug!(
        "region_result",
        index = region.index,
        template_w = searched_template.x,
        template_h = searched_template.y,
        window_w = searched_window.x,
        window_h = searched_window.y,
        dx = region.displacement.x,
        dy = region.displacement.y,
        rho = region.rho,
        min_gradient = region.min_gradient,
        border = region.border_reached,
        status = region.status.as_str(),
    );
    Ok(())
}
