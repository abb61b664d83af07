//! Floating point comparison context.

use std::cmp::Ordering;

/// Default epsilon for floating point comparisons.
/// Values within this distance of each other are considered equal.
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// Epsilon based equivalence for `f64` values.
///
/// Geometry types carry the precision they were created with, so every
/// "are these equal" decision made while cutting, splitting and classifying
/// goes through one of these comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Precision {
    epsilon: f64,
}

impl Precision {
    /// Creates a precision context with the given epsilon.
    ///
    /// # Panics
    /// Panics if `epsilon` is negative or NaN.
    pub fn new(epsilon: f64) -> Self {
        assert!(epsilon >= 0.0, "Precision epsilon must be non-negative");
        Self { epsilon }
    }

    /// Returns the epsilon of this context.
    #[inline]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Compares two values, treating values within epsilon as equal.
    pub fn compare(&self, a: f64, b: f64) -> Ordering {
        if (a - b).abs() <= self.epsilon || a == b {
            Ordering::Equal
        } else if a < b {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    /// Returns the sign of `value` as an ordering against zero.
    #[inline]
    pub fn sign(&self, value: f64) -> Ordering {
        self.compare(value, 0.0)
    }

    #[inline]
    pub fn eq(&self, a: f64, b: f64) -> bool {
        self.compare(a, b) == Ordering::Equal
    }

    #[inline]
    pub fn eq_zero(&self, value: f64) -> bool {
        self.eq(value, 0.0)
    }

    #[inline]
    pub fn lt(&self, a: f64, b: f64) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    #[inline]
    pub fn lte(&self, a: f64, b: f64) -> bool {
        self.compare(a, b) != Ordering::Greater
    }

    #[inline]
    pub fn gt(&self, a: f64, b: f64) -> bool {
        self.compare(a, b) == Ordering::Greater
    }

    #[inline]
    pub fn gte(&self, a: f64, b: f64) -> bool {
        self.compare(a, b) != Ordering::Less
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_within_epsilon_are_equal() {
        let precision = Precision::new(1e-3);
        assert!(precision.eq(1.0, 1.0005));
        assert!(!precision.eq(1.0, 1.01));
        assert!(precision.eq_zero(-1e-4));
    }

    #[test]
    fn default_uses_default_epsilon() {
        assert_eq!(Precision::default().epsilon(), DEFAULT_EPSILON);
        assert_eq!(Precision::new(0.5).epsilon(), 0.5);
    }

    #[test]
    fn ordering_respects_epsilon() {
        let precision = Precision::new(1e-3);
        assert_eq!(precision.compare(1.0, 2.0), Ordering::Less);
        assert_eq!(precision.compare(2.0, 1.0), Ordering::Greater);
        assert!(precision.lte(1.0005, 1.0));
        assert!(!precision.lt(1.0005, 1.0));
        assert!(precision.gte(0.9995, 1.0));
        assert!(precision.gt(1.1, 1.0));
    }

    #[test]
    fn infinities_compare_equal_to_themselves() {
        let precision = Precision::default();
        assert!(precision.eq(f64::INFINITY, f64::INFINITY));
        assert!(precision.lt(f64::NEG_INFINITY, 0.0));
        assert_eq!(precision.sign(f64::INFINITY), Ordering::Greater);
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn negative_epsilon_panics() {
        Precision::new(-1.0);
    }
}
