use crate::Float;

/// A closed range of ray parameters `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: Float,
    pub max: Float,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: Float, max: Float) -> Self {
        Self { min, max }
    }

    /// The interval `[min, +inf]`.
    pub const fn from_min(min: Float) -> Self {
        Self::new(min, Float::INFINITY)
    }

    /// True when no value lies in the interval. NaN bounds count as empty.
    pub fn is_empty(&self) -> bool {
        !(self.min <= self.max)
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: Float) -> bool {
        self.min <= x && x <= self.max
    }

    /// Same lower bound, new upper bound.
    #[inline]
    pub fn with_max(&self, max: Float) -> Interval {
        Interval::new(self.min, max)
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: Float::INFINITY,
        max: Float::NEG_INFINITY,
    };

    /// A universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: Float::NEG_INFINITY,
        max: Float::INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_contains_is_inclusive() {
        let interval = Interval::new(0.0, 10.0);

        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));

        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
        assert!(!interval.contains(Float::NAN));
    }

    #[test]
    fn test_interval_is_empty() {
        assert!(Interval::EMPTY.is_empty());
        assert!(Interval::new(2.0, 1.0).is_empty());
        assert!(Interval::new(Float::NAN, 1.0).is_empty());
        assert!(!Interval::new(1.0, 1.0).is_empty());
        assert!(!Interval::UNIVERSE.is_empty());
    }

    #[test]
    fn test_interval_shrink() {
        let window = Interval::from_min(-2.0).with_max(3.0);
        assert_eq!(window, Interval::new(-2.0, 3.0));
        assert!(!window.contains(3.5));
    }
}
