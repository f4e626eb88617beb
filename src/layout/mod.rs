//! Even placement of regions over an image extent.
//!
//! All routines use exact integer arithmetic. Remainder space is distributed
//! over the gaps so that no region starts before zero or ends past the extent.

use crate::util::Vec2;

/// Returns `count` origins of length-`region_len` intervals inside `[0, extent)`.
///
/// When the intervals fit, the free space is split into `count + 1` gaps whose
/// sizes differ by at most one. Otherwise the first and last intervals are
/// pinned to the two edges and the rest are spread evenly between them (they
/// overlap). Returns an empty vector when `region_len` is zero or larger than
/// `extent`, or when `count` is zero.
pub fn justify_1d(extent: usize, region_len: usize, count: usize) -> Vec<usize> {
    if count == 0 || region_len == 0 || region_len > extent {
        return Vec::new();
    }

    if count * region_len <= extent {
        let free = extent - count * region_len;
        return (0..count)
            .map(|i| ((i + 1) * free) / (count + 1) + i * region_len)
            .collect();
    }

    // count >= 2 here, since a single interval always fits.
    let span = extent - region_len;
    (0..count).map(|i| (i * span) / (count - 1)).collect()
}

/// Same as [`justify_1d`] but returns the centres of symmetric intervals of
/// length `2 * half_width + 1`.
pub fn justify_1d_centered(extent: usize, half_width: usize, count: usize) -> Vec<usize> {
    justify_1d(extent, 2 * half_width + 1, count)
        .into_iter()
        .map(|origin| origin + half_width)
        .collect()
}

/// Places a `p` x `q` grid of regions (p columns, q rows) over `image_size`.
///
/// The result is row-major: the region in column `col` and row `row` sits at
/// index `row * p + col`. Empty when either axis cannot be laid out.
pub fn justify_grid(
    image_size: Vec2<usize>,
    region_size: Vec2<usize>,
    p: usize,
    q: usize,
) -> Vec<Vec2<usize>> {
    let xs = justify_1d(image_size.x, region_size.x, p);
    let ys = justify_1d(image_size.y, region_size.y, q);
    if xs.is_empty() || ys.is_empty() {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(xs.len() * ys.len());
    for &y in &ys {
        for &x in &xs {
            out.push(Vec2::new(x, y));
        }
    }
    out
}

/// Number of regions along one axis: `round(extent / window)`, capped at `max`.
pub fn region_count(extent: usize, window: usize, max: usize) -> usize {
    if window == 0 {
        return 0;
    }
    let fitted = (extent as f64 / window as f64).round() as usize;
    fitted.min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitting_regions_share_the_free_space() {
        assert_eq!(justify_1d(100, 40, 2), vec![6, 53]);
        assert_eq!(justify_1d(10, 2, 4), vec![0, 2, 5, 7]);
        assert_eq!(justify_1d(7, 7, 1), vec![0]);
    }

    #[test]
    fn overfull_regions_are_pinned_to_edges() {
        assert_eq!(justify_1d(160, 101, 2), vec![0, 59]);
        assert_eq!(justify_1d(100, 40, 3), vec![0, 30, 60]);
    }

    #[test]
    fn impossible_layouts_are_empty() {
        assert!(justify_1d(10, 11, 1).is_empty());
        assert!(justify_1d(10, 0, 3).is_empty());
        assert!(justify_1d(10, 3, 0).is_empty());
        assert!(justify_grid(Vec2::new(50, 5), Vec2::new(10, 10), 2, 2).is_empty());
    }

    #[test]
    fn centred_layout_offsets_by_half_width() {
        assert_eq!(justify_1d_centered(100, 10, 2), vec![29, 69]);
    }

    #[test]
    fn grid_is_row_major() {
        let grid = justify_grid(Vec2::new(100, 60), Vec2::new(40, 20), 2, 2);
        assert_eq!(
            grid,
            vec![
                Vec2::new(6, 6),
                Vec2::new(53, 6),
                Vec2::new(6, 33),
                Vec2::new(53, 33),
            ]
        );
    }

    #[test]
    fn region_count_rounds_and_clamps() {
        assert_eq!(region_count(160, 101, 5), 2);
        assert_eq!(region_count(140, 101, 5), 1);
        assert_eq!(region_count(1000, 101, 5), 5);
        assert_eq!(region_count(100, 40, 0), 0);
        assert_eq!(region_count(100, 0, 3), 0);
    }

    #[test]
    fn fitting_layouts_are_ordered_and_evenly_spaced() {
        for extent in 1..120 {
            for len in 1..=extent {
                for count in 1..=(extent / len).min(8) {
                    let pos = justify_1d(extent, len, count);
                    assert_eq!(pos.len(), count);
                    assert!(pos.windows(2).all(|w| w[0] < w[1]));
                    assert!(pos[count - 1] + len <= extent);

                    let mut gaps = vec![pos[0]];
                    gaps.extend(pos.windows(2).map(|w| w[1] - w[0] - len));
                    gaps.push(extent - pos[count - 1] - len);
                    let min = gaps.iter().min().copied().unwrap_or(0);
                    let max = gaps.iter().max().copied().unwrap_or(0);
                    assert!(
                        max - min <= 1,
                        "extent {extent} len {len} count {count}: {gaps:?}"
                    );
                }
            }
        }
    }
}
