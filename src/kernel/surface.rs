use crate::util::Vec2;

/// Correlation coefficients for every template offset inside a search window.
///
/// Cell `(dx, dy)` holds rho for the template's top-left corner placed at
/// `(dx, dy)` in the window. Dimensions are `(Mx - Nx + 1) x (My - Ny + 1)`.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationSurface {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl CorrelationSurface {
    pub(crate) fn from_values(width: usize, height: usize, values: Vec<f32>) -> Self {
        debug_assert_eq!(values.len(), width * height);
        Self {
            width,
            height,
            values,
        }
    }

    /// Number of horizontal offsets.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of vertical offsets.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major coefficient values.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Coefficient at offset `(dx, dy)`.
    pub fn get(&self, dx: usize, dy: usize) -> Option<f32> {
        if dx >= self.width || dy >= self.height {
            return None;
        }
        self.values.get(dy * self.width + dx).copied()
    }

    /// Offset and value of the maximum; ties resolve to the first cell in
    /// row-major order. `None` only for an empty surface.
    pub fn argmax(&self) -> Option<(Vec2<usize>, f32)> {
        let mut best: Option<(usize, f32)> = None;
        let mut best_value = -2.0f32;
        for (idx, &value) in self.values.iter().enumerate() {
            if value > best_value {
                best_value = value;
                best = Some((idx, value));
            }
        }
        best.map(|(idx, value)| (Vec2::new(idx % self.width, idx / self.width), value))
    }

    /// Shape of the surface around `best`: `(min_gradient, border_reached)`.
    ///
    /// `min_gradient` is the smallest `neighbour - peak` over the existing
    /// axis neighbours (0 when there are none). `border_reached` is set when
    /// `best` lies on any edge of the offset range.
    pub fn peak_shape(&self, best: Vec2<usize>) -> (f32, bool) {
        let Some(peak) = self.get(best.x, best.y) else {
            return (0.0, true);
        };

        let border_reached = best.x == 0
            || best.y == 0
            || best.x + 1 == self.width
            || best.y + 1 == self.height;

        let mut neighbours = [None; 4];
        if best.x > 0 {
            neighbours[0] = self.get(best.x - 1, best.y);
        }
        if best.y > 0 {
            neighbours[1] = self.get(best.x, best.y - 1);
        }
        neighbours[2] = self.get(best.x + 1, best.y);
        neighbours[3] = self.get(best.x, best.y + 1);

        let min_gradient = neighbours
            .iter()
            .flatten()
            .map(|&value| value - peak)
            .fold(None, |acc: Option<f32>, g| Some(acc.map_or(g, |a| a.min(g))))
            .unwrap_or(0.0);

        (min_gradient, border_reached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> CorrelationSurface {
        #[rustfmt::skip]
        let values = vec![
            0.1, 0.2, 0.3,
            0.4, 0.9, 0.5,
            0.2, 0.9, 0.6,
        ];
        CorrelationSurface::from_values(3, 3, values)
    }

    #[test]
    fn argmax_prefers_first_row_major_hit() {
        let (best, value) = surface().argmax().unwrap();
        assert_eq!(best, Vec2::new(1, 1));
        assert_eq!(value, 0.9);
    }

    #[test]
    fn peak_shape_reports_gradient_and_border() {
        let s = surface();
        let (min_gradient, border) = s.peak_shape(Vec2::new(1, 1));
        assert!(!border);
        assert!((min_gradient - (0.2 - 0.9)).abs() < 1e-6);

        let (min_gradient, border) = s.peak_shape(Vec2::new(1, 2));
        assert!(border);
        assert!((min_gradient - (0.2 - 0.9)).abs() < 1e-6);
    }

    #[test]
    fn single_cell_surface_is_all_border() {
        let s = CorrelationSurface::from_values(1, 1, vec![0.5]);
        assert_eq!(s.argmax(), Some((Vec2::new(0, 0), 0.5)));
        assert_eq!(s.peak_shape(Vec2::new(0, 0)), (0.0, true));
    }
}
