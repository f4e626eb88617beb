//! Per-region bookkeeping carried across refinement passes.

use crate::kernel::SearchResult;
use crate::util::Vec2;

/// Search window must exceed the template by at least this many pixels per axis.
const MIN_SEARCH_MARGIN: i64 = 5;

/// Lifecycle of one grid region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionStatus {
    /// Will be searched again in the next pass.
    Active,
    /// Converged; its displacement is used for aggregation.
    Finished,
    /// Unreliable (peak on the border or too weak); excluded from aggregation.
    Dismissed,
}

impl RegionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegionStatus::Active => "active",
            RegionStatus::Finished => "finished",
            RegionStatus::Dismissed => "dismissed",
        }
    }
}

/// Final state of one region after the pass loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionReport {
    /// Row-major grid index.
    pub index: usize,
    pub status: RegionStatus,
    /// Position in B minus position in A of the region's template.
    pub displacement: Vec2<i32>,
    pub rho: f32,
    pub min_gradient: f32,
    pub border_reached: bool,
    pub rho_too_low: bool,
    /// Template size used in the last search.
    pub template_size: Vec2<usize>,
    /// Search window size used in the last search.
    pub search_size: Vec2<usize>,
}

#[derive(Clone, Debug)]
pub(crate) struct RegionState {
    pub index: usize,
    pub status: RegionStatus,
    /// Template top-left in A.
    pub origin_a: Vec2<usize>,
    /// Search window top-left in B.
    pub origin_b: Vec2<usize>,
    pub template: Vec2<usize>,
    pub window: Vec2<usize>,
    /// Invariant: the template at `origin_a` in A corresponds to
    /// `origin_a + displacement` in B.
    pub displacement: Vec2<i64>,
    pub rho: f32,
    pub min_gradient: f32,
    pub border_reached: bool,
    pub rho_too_low: bool,
}

/// One axis of the next pass' windows, before conversion back to `usize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct AxisWindows {
    origin_a: i64,
    template: i64,
    origin_b: i64,
    window: i64,
}

impl RegionState {
    /// Creates a region whose template is centred in the search window at
    /// `origin_b`, assuming zero displacement.
    pub fn new(
        index: usize,
        origin_b: Vec2<usize>,
        window: Vec2<usize>,
        template: Vec2<usize>,
        size_a: Vec2<usize>,
    ) -> Self {
        let origin_a = Vec2::new(
            origin_b.x + (window.x - template.x) / 2,
            origin_b.y + (window.y - template.y) / 2,
        );
        let fits = origin_a.x + template.x <= size_a.x && origin_a.y + template.y <= size_a.y;
        Self {
            index,
            status: if fits {
                RegionStatus::Active
            } else {
                RegionStatus::Dismissed
            },
            origin_a,
            origin_b,
            template,
            window,
            displacement: Vec2::new(0, 0),
            rho: 0.0,
            min_gradient: 0.0,
            border_reached: false,
            rho_too_low: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == RegionStatus::Active
    }

    /// Folds a search result into the region and dismisses it when unreliable.
    pub fn record(&mut self, result: &SearchResult, min_accepted_rho: f32) {
        self.displacement = Vec2::new(
            (self.origin_b.x + result.best_offset.x) as i64 - self.origin_a.x as i64,
            (self.origin_b.y + result.best_offset.y) as i64 - self.origin_a.y as i64,
        );
        self.rho = result.rho_max;
        self.min_gradient = result.min_gradient;
        self.border_reached = result.border_reached;
        self.rho_too_low = result.rho_max < min_accepted_rho;
        if self.border_reached || self.rho_too_low {
            self.status = RegionStatus::Dismissed;
        }
    }

    /// Shrinks the window around the match and grows the template for the
    /// next pass, or marks the region finished when that stops paying off.
    pub fn advance(
        &mut self,
        size_a: Vec2<usize>,
        size_b: Vec2<usize>,
        shrink: usize,
        grow: usize,
    ) {
        let shrink = shrink as i64;
        let grow = grow as i64;
        let next_window = self.window.map(|v| v as i64 - shrink);
        let next_template = self.template.map(|v| v as i64 + grow);
        if next_window.x < next_template.x + MIN_SEARCH_MARGIN
            || next_window.y < next_template.y + MIN_SEARCH_MARGIN
        {
            self.status = RegionStatus::Finished;
            return;
        }

        let x = regrow_axis(
            self.origin_a.x as i64,
            self.template.x as i64,
            self.displacement.x,
            next_template.x,
            next_window.x,
            size_a.x as i64,
            size_b.x as i64,
        );
        let y = regrow_axis(
            self.origin_a.y as i64,
            self.template.y as i64,
            self.displacement.y,
            next_template.y,
            next_window.y,
            size_a.y as i64,
            size_b.y as i64,
        );

        let grew = x.template > self.template.x as i64 && y.template > self.template.y as i64;
        let margin_ok = x.window >= x.template + MIN_SEARCH_MARGIN
            && y.window >= y.template + MIN_SEARCH_MARGIN;
        if !grew || !margin_ok {
            self.status = RegionStatus::Finished;
            return;
        }

        self.origin_a = Vec2::new(x.origin_a as usize, y.origin_a as usize);
        self.origin_b = Vec2::new(x.origin_b as usize, y.origin_b as usize);
        self.template = Vec2::new(x.template as usize, y.template as usize);
        self.window = Vec2::new(x.window as usize, y.window as usize);
    }

    pub fn report(&self) -> RegionReport {
        RegionReport {
            index: self.index,
            status: self.status,
            displacement: Vec2::new(self.displacement.x as i32, self.displacement.y as i32),
            rho: self.rho,
            min_gradient: self.min_gradient,
            border_reached: self.border_reached,
            rho_too_low: self.rho_too_low,
            template_size: self.template,
            search_size: self.window,
        }
    }
}

/// Recentres one axis: the window is centred on the matched template in B,
/// the template grows symmetrically in A. Both are clipped (not shifted)
/// against the image edges, so a clipped window ends up off-centre.
fn regrow_axis(
    origin_a: i64,
    template: i64,
    displacement: i64,
    next_template: i64,
    next_window: i64,
    extent_a: i64,
    extent_b: i64,
) -> AxisWindows {
    let centre_in_b = origin_a + displacement + template / 2;

    let mut origin_b = centre_in_b - next_window / 2;
    let mut window = next_window;
    if origin_b < 0 {
        window += origin_b;
        origin_b = 0;
    }
    if origin_b + window > extent_b {
        window = extent_b - origin_b;
    }

    let mut origin_a = origin_a - (next_template - template) / 2;
    let mut template = next_template;
    if origin_a < 0 {
        template += origin_a;
        origin_a = 0;
    }
    if origin_a + template > extent_a {
        template = extent_a - origin_a;
    }

    // The grown template must also stay inside B once displaced.
    let in_b = origin_a + displacement;
    if in_b < 0 {
        template += in_b;
        origin_a -= in_b;
    }
    let in_b = origin_a + displacement;
    if in_b + template > extent_b {
        template = extent_b - in_b;
    }

    AxisWindows {
        origin_a,
        template,
        origin_b,
        window,
    }
}
