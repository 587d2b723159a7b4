// src/smoother.rs

use crate::config::SmoothingConfig;
use crate::types::{LaneFit, SlopeIntercept};

/// Exponential moving average of each side's slope/intercept across frames.
///
/// Only used when `smoothing.enabled` is set; the default pipeline fits every
/// frame independently.
#[derive(Debug, Clone)]
pub struct LaneSmoother {
    alpha: f64,
    state: LaneFit,
}

impl LaneSmoother {
    /// Create a new smoother
    ///
    /// # Arguments
    /// * `alpha` - Weight of the newest frame, in (0, 1]. 1.0 disables smoothing.
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            state: LaneFit::default(),
        }
    }

    /// `None` unless the config turns smoothing on.
    pub fn from_config(config: &SmoothingConfig) -> Option<Self> {
        config.enabled.then(|| Self::new(config.alpha))
    }

    /// Blend the current frame's fit into the running average.
    ///
    /// A side missing from `fit` stays missing in the output; its history is
    /// kept so the average resumes when the side reappears.
    pub fn smooth(&mut self, fit: LaneFit) -> LaneFit {
        let left = fit.left.map(|l| Self::blend(self.alpha, &mut self.state.left, l));
        let right = fit.right.map(|r| Self::blend(self.alpha, &mut self.state.right, r));
        LaneFit { left, right }
    }

    fn blend(alpha: f64, slot: &mut Option<SlopeIntercept>, current: SlopeIntercept) -> SlopeIntercept {
        let next = match *slot {
            Some(prev) => SlopeIntercept {
                slope: alpha * current.slope + (1.0 - alpha) * prev.slope,
                intercept: alpha * current.intercept + (1.0 - alpha) * prev.intercept,
            },
            None => current,
        };
        *slot = Some(next);
        next
    }

    /// Forget all history (e.g. when the video changes)
    pub fn reset(&mut self) {
        self.state = LaneFit::default();
    }

    pub fn state(&self) -> &LaneFit {
        &self.state
    }
}
