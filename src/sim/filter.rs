//! Single-pole smoothing of the raw accelerometer axis

use serde::{Deserialize, Serialize};

/// Exponentially smoothed steering input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteeringFilter {
    /// Last raw sample fed in
    pub raw_sample: f32,
    /// Smoothed value (persists across game restarts)
    pub filtered: f32,
    /// Weight of the new sample, in (0, 1]
    pub alpha: f32,
}

impl SteeringFilter {
    pub fn new(alpha: f32) -> Self {
        Self {
            raw_sample: 0.0,
            filtered: 0.0,
            alpha: alpha.clamp(f32::EPSILON, 1.0),
        }
    }

    /// Blend a new raw sample into the filtered value and return it
    pub fn update(&mut self, raw: f32) -> f32 {
        let prev = self.filtered;
        let blended = self.alpha * raw + (1.0 - self.alpha) * prev;
        // Rounding must not push the result outside the two inputs
        self.filtered = blended.clamp(prev.min(raw), prev.max(raw));
        self.raw_sample = raw;
        self.filtered
    }

    pub fn value(&self) -> f32 {
        self.filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_sample_is_weighted() {
        let mut filter = SteeringFilter::new(0.2);
        let out = filter.update(5.0);
        assert!((out - 1.0).abs() < 1e-6);
        assert_eq!(filter.raw_sample, 5.0);
    }

    #[test]
    fn test_converges_to_constant_input() {
        let mut filter = SteeringFilter::new(0.2);
        for _ in 0..200 {
            filter.update(3.0);
        }
        assert!((filter.value() - 3.0).abs() < 1e-3);
    }

    #[test]
    fn test_alpha_one_passes_through() {
        let mut filter = SteeringFilter::new(1.0);
        assert_eq!(filter.update(-7.5), -7.5);
        assert_eq!(filter.update(2.25), 2.25);
    }

    proptest! {
        #[test]
        fn never_overshoots(
            alpha in 0.001f32..0.999,
            start in -20.0f32..20.0,
            samples in prop::collection::vec(-20.0f32..20.0, 1..50),
        ) {
            let mut filter = SteeringFilter::new(alpha);
            filter.update(start);
            for sample in samples {
                let prev = filter.value();
                let out = filter.update(sample);
                prop_assert!(out >= prev.min(sample));
                prop_assert!(out <= prev.max(sample));
            }
        }
    }
}
