//! Noise power tracking
//!
//! A leaky integrator of instantaneous bin power. There is no speech gating:
//! a low `alpha` follows non-stationary noise quickly but lets speech energy
//! leak into the estimate.

use rustfft::num_complex::Complex32;

/// Running per-bin noise power estimate
#[derive(Debug, Clone, PartialEq)]
pub struct NoisePowerTracker {
    power: Vec<f32>,
    alpha: f32,
}

impl NoisePowerTracker {
    /// Start from an explicit power vector
    pub fn new(power: Vec<f32>, alpha: f32) -> Self {
        Self { power, alpha }
    }

    /// Seed from the given frames as the square of the per-bin mean magnitude.
    ///
    /// With no frames the estimate starts at zero.
    pub fn from_frames<'a, I>(frames: I, num_bins: usize, alpha: f32) -> Self
    where
        I: IntoIterator<Item = &'a [Complex32]>,
    {
        let mut sum = vec![0.0f64; num_bins];
        let mut count = 0usize;

        for frame in frames {
            for (acc, bin) in sum.iter_mut().zip(frame) {
                *acc += bin.norm() as f64;
            }
            count += 1;
        }

        let scale = if count > 0 { 1.0 / count as f64 } else { 0.0 };
        let power = sum
            .into_iter()
            .map(|s| {
                let mean = s * scale;
                (mean * mean) as f32
            })
            .collect();

        Self { power, alpha }
    }

    /// Current noise power per bin
    pub fn power(&self) -> &[f32] {
        &self.power
    }

    /// Smoothing factor
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Fold in one frame of unprocessed magnitudes:
    /// `power = alpha * power + (1 - alpha) * magnitude²`
    pub fn update(&mut self, magnitude: &[f32]) {
        let alpha = self.alpha;
        for (p, &m) in self.power.iter_mut().zip(magnitude) {
            *p = alpha * *p + (1.0 - alpha) * m * m;
        }
    }

    /// Mean power over all bins
    pub fn mean_power(&self) -> f32 {
        if self.power.is_empty() {
            return 0.0;
        }
        (self.power.iter().map(|&p| p as f64).sum::<f64>() / self.power.len() as f64) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_seed_is_squared_mean_magnitude() {
        let a = [Complex32::new(3.0, 4.0), Complex32::new(1.0, 0.0)];
        let b = [Complex32::new(0.0, 1.0), Complex32::new(0.0, 3.0)];
        let tracker = NoisePowerTracker::from_frames([&a[..], &b[..]], 2, 0.9);
        // mean |X| per bin: 3 and 2
        assert_relative_eq!(tracker.power()[0], 9.0);
        assert_relative_eq!(tracker.power()[1], 4.0);
    }

    #[test]
    fn test_seed_below_mean_power_for_noise() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let frames: Vec<Vec<Complex32>> = (0..64)
            .map(|_| {
                (0..32)
                    .map(|_| Complex32::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5))
                    .collect()
            })
            .collect();
        let tracker = NoisePowerTracker::from_frames(frames.iter().map(|f| f.as_slice()), 32, 0.9);

        for (k, &seeded) in tracker.power().iter().enumerate() {
            let mean_power =
                frames.iter().map(|f| f[k].norm_sqr()).sum::<f32>() / frames.len() as f32;
            assert!(seeded > 0.0);
            assert!(seeded < mean_power, "bin {}: {} vs {}", k, seeded, mean_power);
        }
    }

    #[test]
    fn test_empty_seed_is_zero() {
        let tracker = NoisePowerTracker::from_frames(std::iter::empty(), 4, 0.9);
        assert_eq!(tracker.power(), &[0.0; 4]);
    }

    #[test]
    fn test_update_is_single_pole() {
        let mut tracker = NoisePowerTracker::new(vec![1.0, 0.0], 0.75);
        tracker.update(&[0.0, 2.0]);
        assert_relative_eq!(tracker.power()[0], 0.75);
        assert_relative_eq!(tracker.power()[1], 1.0);
    }

    #[test]
    fn test_converges_to_constant_power() {
        let mut tracker = NoisePowerTracker::new(vec![0.0; 8], 0.9);
        for _ in 0..300 {
            tracker.update(&[0.5; 8]);
        }
        assert_relative_eq!(tracker.mean_power(), 0.25, max_relative = 1e-4);
        assert!(tracker.power().iter().all(|&p| p >= 0.0));
    }
}
