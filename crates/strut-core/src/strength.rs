//! Constraint strengths.

use std::fmt;

/// The priority of a constraint. Larger is stronger.
///
/// Strengths are encoded from three priority bands into a single scalar:
/// each band is clamped to `[0, 1000]` and weighted by `1e6`, `1e3` and `1`
/// respectively, so raising a higher band always outranks any combination
/// of the lower two. This is an approximation of lexicographic ordering;
/// extreme custom weights can saturate a band and defeat it. The encoding
/// is kept as-is for compatibility with other Cassowary implementations.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Strength(f64);

impl Strength {
    /// The required strength. Constraints at this strength must hold
    /// exactly; it is the saturation point of the encoding and acts as the
    /// infinite sentinel.
    pub const REQUIRED: Strength = Strength(1_001_001_000.0);

    /// The strong strength, `create(1, 0, 0)`.
    pub const STRONG: Strength = Strength(1_000_000.0);

    /// The medium strength, `create(0, 1, 0)`.
    pub const MEDIUM: Strength = Strength(1_000.0);

    /// The weak strength, `create(0, 0, 1)`.
    pub const WEAK: Strength = Strength(1.0);

    /// Create a strength from three band weights.
    pub fn create(a: f64, b: f64, c: f64) -> Strength {
        Self::create_weighted(a, b, c, 1.0)
    }

    /// Create a strength from three band weights and a multiplier.
    pub fn create_weighted(a: f64, b: f64, c: f64, w: f64) -> Strength {
        let mut value = 0.0;
        value += (a * w).clamp(0.0, 1000.0) * 1_000_000.0;
        value += (b * w).clamp(0.0, 1000.0) * 1_000.0;
        value += (c * w).clamp(0.0, 1000.0);
        Strength(value)
    }

    /// The raw scalar value of the strength.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Clip the strength into the valid range `[0, REQUIRED]`.
    pub fn clip(self) -> Strength {
        Strength(self.0.clamp(0.0, Self::REQUIRED.0))
    }

    /// Whether this strength is required.
    pub fn is_required(self) -> bool {
        self.0 >= Self::REQUIRED.0
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn named_ordering() {
        assert!(Strength::WEAK < Strength::MEDIUM);
        assert!(Strength::MEDIUM < Strength::STRONG);
        assert!(Strength::STRONG < Strength::REQUIRED);
    }

    #[test]
    fn named_constants_match_create() {
        assert_eq!(Strength::create(0.0, 0.0, 1.0), Strength::WEAK);
        assert_eq!(Strength::create(0.0, 1.0, 0.0), Strength::MEDIUM);
        assert_eq!(Strength::create(1.0, 0.0, 0.0), Strength::STRONG);
        assert_eq!(Strength::create(1000.0, 1000.0, 1000.0), Strength::REQUIRED);
    }

    #[test]
    fn bands_are_clamped_not_rejected() {
        assert_eq!(Strength::create(2000.0, 0.0, 0.0), Strength::create(1000.0, 0.0, 0.0));
        assert_eq!(Strength::create(-5.0, 0.0, 0.0), Strength::create(0.0, 0.0, 0.0));
    }

    #[test]
    fn higher_band_outranks_lower_two_below_saturation() {
        let low = Strength::create(0.0, 999.0, 999.0);
        let high = Strength::create(1.0, 0.0, 0.0);
        assert!(low < high);

        // At band saturation the lexicographic approximation gives way:
        // 1000 * 1e3 + 1000 exceeds 1 * 1e6.
        let saturated = Strength::create(0.0, 1000.0, 1000.0);
        assert!(saturated > high);
    }

    #[test]
    fn clip_saturates_at_required() {
        let huge = Strength::create_weighted(1000.0, 1000.0, 1000.0, 2.0);
        assert_eq!(huge.clip(), Strength::REQUIRED);
        assert!(huge.is_required());
        assert!(!Strength::STRONG.is_required());
    }

    proptest! {
        // Away from the clamp boundaries the encoding is strictly monotonic
        // in the weight multiplier.
        #[test]
        fn weight_monotonic(
            a in 0.001_f64..1.0,
            b in 0.001_f64..1.0,
            c in 0.001_f64..1.0,
            w1 in 0.01_f64..1.0,
            bump in 0.01_f64..1.0,
        ) {
            let w2 = w1 + bump;
            prop_assert!(
                Strength::create_weighted(a, b, c, w1) < Strength::create_weighted(a, b, c, w2)
            );
        }

        #[test]
        fn clip_stays_in_range(v in -1.0e12_f64..1.0e12) {
            let clipped = Strength::create_weighted(v, v, v, 1.0).clip();
            prop_assert!(clipped.value() >= 0.0);
            prop_assert!(clipped <= Strength::REQUIRED);
        }
    }
}
