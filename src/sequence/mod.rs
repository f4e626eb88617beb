//! Registration of a whole bracket series.
//!
//! Neighbouring exposures are the most similar pair, so each image is
//! registered against the next one and the offsets are chained back to the
//! first image.

use crate::image::{ImageView, Sample};
use crate::search::{DisplacementFinder, Registration};
use crate::trace::trace_span;
use crate::util::{HdrAlignError, HdrAlignResult, Vec2};

/// Registration of one neighbouring pair.
#[derive(Clone, Debug, PartialEq)]
pub struct PairRegistration {
    /// Index of the reference image (A).
    pub reference: usize,
    /// Index of the registered image (B), always `reference + 1`.
    pub target: usize,
    pub outcome: HdrAlignResult<Registration>,
}

impl PairRegistration {
    /// Displacement of the pair, if registration succeeded.
    pub fn displacement(&self) -> Option<Vec2<i32>> {
        self.outcome.as_ref().ok().map(|r| r.displacement)
    }
}

/// Pairwise registrations of a series, in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SequenceRegistration {
    pub pairs: Vec<PairRegistration>,
}

impl SequenceRegistration {
    /// Offset of every image relative to the first one.
    ///
    /// The first entry is `(0, 0)`; entry `k` is the sum of the pair
    /// displacements up to image `k`. Fails with `BrokenChain` at the first
    /// image whose pair could not be registered.
    pub fn cumulative_offsets(&self) -> HdrAlignResult<Vec<Vec2<i32>>> {
        let mut offsets = Vec::with_capacity(self.pairs.len() + 1);
        let mut acc = Vec2::new(0, 0);
        offsets.push(acc);
        for pair in &self.pairs {
            let d = pair
                .displacement()
                .ok_or(HdrAlignError::BrokenChain { index: pair.target })?;
            acc += d;
            offsets.push(acc);
        }
        Ok(offsets)
    }
}

/// Registers every neighbouring pair `(i, i + 1)` of `images`.
///
/// Failures are kept per pair so one bad frame does not hide the others.
pub fn register_sequence<T: Sample>(
    finder: &DisplacementFinder,
    images: &[ImageView<'_, T>],
) -> SequenceRegistration {
    let pairs = images
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let _span = trace_span!("register_pair", first = i, second = i + 1).entered();
            PairRegistration {
                reference: i,
                target: i + 1,
                outcome: finder.find(pair[0], pair[1]),
            }
        })
        .collect();
    SequenceRegistration { pairs }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// Area of the first image's frame that every image covers.
///
/// Image `k` of size `sizes[k]` sees the point `p` of the first image at
/// `p + offsets[k]`. Returns `None` when the overlap is empty or the two
/// slices differ in length.
pub fn intersection(sizes: &[Vec2<usize>], offsets: &[Vec2<i32>]) -> Option<Rect> {
    if sizes.is_empty() || sizes.len() != offsets.len() {
        return None;
    }

    let mut x0 = 0i64;
    let mut y0 = 0i64;
    let mut x1 = i64::MAX;
    let mut y1 = i64::MAX;
    for (size, offset) in sizes.iter().zip(offsets) {
        let (dx, dy) = (i64::from(offset.x), i64::from(offset.y));
        x0 = x0.max(-dx);
        y0 = y0.max(-dy);
        x1 = x1.min(size.x as i64 - dx);
        y1 = y1.min(size.y as i64 - dy);
    }

    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect {
        x: x0 as usize,
        y: y0 as usize,
        width: (x1 - x0) as usize,
        height: (y1 - y0) as usize,
    })
}
