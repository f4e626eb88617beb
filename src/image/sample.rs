/// A pixel channel sample that widens losslessly into the `f64` accumulators.
///
/// Sums of squares over a template of 16-bit samples overflow 32-bit
/// integers quickly, so every kernel accumulates in `f64`. For integer
/// samples those sums stay exact up to 2^53.
pub trait Sample: Copy + Send + Sync + 'static {
    /// Converts the sample to the accumulator type.
    fn to_f64(self) -> f64;
}

impl Sample for u8 {
    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Sample for u16 {
    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}

impl Sample for f32 {
    #[inline]
    fn to_f64(self) -> f64 {
        f64::from(self)
    }
}
