//! Per-bin temporal magnitude tracker
//!
//! A bank of independent scalar Kalman filters, one per frequency bin, kept as
//! two flat arrays. Prediction uses identity dynamics; the configured AR order
//! is carried for reporting only.
//!
//! State machine: `Uninitialized -> Tracking` on the first [`KalmanBank::step`],
//! `Tracking -> Uninitialized` on [`KalmanBank::reset`].

use crate::config::UbkeConfig;

/// Tracker state
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TrackerState {
    /// No observation seen since construction or reset
    #[default]
    Uninitialized,
    /// Per-bin estimate and error variance
    Tracking {
        /// Current magnitude estimate
        estimate: Vec<f32>,
        /// Current error variance
        variance: Vec<f32>,
    },
}

/// Bank of scalar Kalman filters over magnitude bins
#[derive(Debug, Clone)]
pub struct KalmanBank {
    order: usize,
    process_var: f32,
    meas_var: f32,
    state: TrackerState,
}

impl KalmanBank {
    /// Create an uninitialized bank
    pub fn new(order: usize, process_var: f32, meas_var: f32) -> Self {
        Self {
            order,
            process_var,
            meas_var,
            state: TrackerState::Uninitialized,
        }
    }

    /// Create from the `ubke` and `kalman` sections of a configuration
    pub fn from_config(config: &UbkeConfig) -> Self {
        Self::new(
            config.ubke.ar_order_p,
            config.kalman.process_var,
            config.kalman.meas_var,
        )
    }

    /// Configured AR order (no effect on prediction)
    pub fn order(&self) -> usize {
        self.order
    }

    /// Process variance Q
    pub fn process_var(&self) -> f32 {
        self.process_var
    }

    /// Measurement variance R
    pub fn meas_var(&self) -> f32 {
        self.meas_var
    }

    /// Current state
    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// True once the first observation has been absorbed
    pub fn is_tracking(&self) -> bool {
        matches!(self.state, TrackerState::Tracking { .. })
    }

    /// Current estimate, if tracking
    pub fn estimate(&self) -> Option<&[f32]> {
        match &self.state {
            TrackerState::Tracking { estimate, .. } => Some(estimate),
            TrackerState::Uninitialized => None,
        }
    }

    /// Current error variance, if tracking
    pub fn variance(&self) -> Option<&[f32]> {
        match &self.state {
            TrackerState::Tracking { variance, .. } => Some(variance),
            TrackerState::Uninitialized => None,
        }
    }

    /// Absorb one observation frame and write the updated estimate to `out`.
    ///
    /// The first call seeds the estimate with `obs` and the variance with 1
    /// before the regular update runs. A frame of a different width restarts
    /// tracking the same way.
    pub fn step(&mut self, obs: &[f32], out: &mut [f32]) {
        let (mut estimate, mut variance) = match std::mem::take(&mut self.state) {
            TrackerState::Tracking { estimate, variance } if estimate.len() == obs.len() => {
                (estimate, variance)
            }
            _ => (obs.to_vec(), vec![1.0; obs.len()]),
        };

        let q = self.process_var;
        let r = self.meas_var;
        for ((x, p), &z) in estimate.iter_mut().zip(variance.iter_mut()).zip(obs) {
            let k = *p / (*p + r);
            *x += k * (z - *x);
            *p = (1.0 - k) * *p + q;
        }

        for (o, &x) in out.iter_mut().zip(&estimate) {
            *o = x;
        }

        self.state = TrackerState::Tracking { estimate, variance };
    }

    /// Return to the uninitialized state
    pub fn reset(&mut self) {
        self.state = TrackerState::Uninitialized;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lazy_initialization() {
        let mut bank = KalmanBank::new(2, 1e-3, 1e-2);
        assert!(!bank.is_tracking());
        assert!(bank.estimate().is_none());

        let mut out = [0.0; 3];
        bank.step(&[1.0, 2.0, 3.0], &mut out);

        // Seeded with the observation, so the first update is a no-op on the estimate
        assert_eq!(out, [1.0, 2.0, 3.0]);
        assert!(bank.is_tracking());

        // P' = (1 - K) * 1 + Q with K = 1 / (1 + R)
        let k = 1.0f32 / (1.0 + 1e-2);
        let expected = (1.0 - k) + 1e-3;
        for &p in bank.variance().unwrap() {
            assert_relative_eq!(p, expected, max_relative = 1e-6);
        }
    }

    #[test]
    fn test_update_moves_toward_observation() {
        let mut bank = KalmanBank::new(2, 1e-3, 1e-2);
        let mut out = [0.0; 1];
        bank.step(&[0.0], &mut out);
        bank.step(&[1.0], &mut out);
        assert!(out[0] > 0.0 && out[0] < 1.0);

        let p = bank.variance().unwrap()[0];
        for _ in 0..200 {
            bank.step(&[1.0], &mut out);
        }
        assert_relative_eq!(out[0], 1.0, max_relative = 1e-4);
        assert!(bank.variance().unwrap()[0] < p);
    }

    #[test]
    fn test_steady_state_variance() {
        let (q, r) = (1e-3f32, 1e-2f32);
        let mut bank = KalmanBank::new(2, q, r);
        let mut out = [0.0; 4];
        for _ in 0..500 {
            bank.step(&[0.5; 4], &mut out);
        }
        // Fixed point of P = P R / (P + R) + Q
        let p_inf = (q + (q * q + 4.0 * q * r).sqrt()) / 2.0;
        for &p in bank.variance().unwrap() {
            assert_relative_eq!(p, p_inf, max_relative = 1e-3);
        }
    }

    #[test]
    fn test_reset_returns_to_uninitialized() {
        let mut bank = KalmanBank::new(2, 1e-3, 1e-2);
        let mut out = [0.0; 2];
        bank.step(&[5.0, 5.0], &mut out);
        bank.step(&[0.0, 0.0], &mut out);
        bank.reset();
        assert_eq!(bank.state(), &TrackerState::Uninitialized);

        bank.step(&[7.0, 8.0], &mut out);
        assert_eq!(out, [7.0, 8.0]);
    }

    #[test]
    fn test_order_has_no_effect() {
        let obs: Vec<[f32; 2]> = (0..20).map(|i| [i as f32 * 0.1, 1.0 - i as f32 * 0.05]).collect();
        let mut a = KalmanBank::new(1, 1e-3, 1e-2);
        let mut b = KalmanBank::new(8, 1e-3, 1e-2);
        let (mut out_a, mut out_b) = ([0.0; 2], [0.0; 2]);
        for frame in &obs {
            a.step(frame, &mut out_a);
            b.step(frame, &mut out_b);
            assert_eq!(out_a, out_b);
        }
        assert_eq!(b.order(), 8);
    }
}
