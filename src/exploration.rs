use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::decay::Decay;

/// Additive Gaussian exploration noise with a time-decaying scale
///
/// At step `t` the noise standard deviation is `decay.evaluate(t) * max_action`.
/// Perturbed vectors are clipped elementwise to `[-max_action, max_action]`,
/// the range the policy's embeddings live in.
pub struct GaussianNoise<D: Decay> {
    decay: D,
    max_action: f32,
}

impl<D: Decay> GaussianNoise<D> {
    /// **Panics** if `max_action` is not strictly positive
    pub fn new(decay: D, max_action: f32) -> Self {
        assert!(max_action > 0.0, "max_action must be strictly positive");
        Self { decay, max_action }
    }

    /// The noise scale at step `t`
    pub fn epsilon(&self, t: u32) -> f32 {
        self.decay.evaluate(t as f32)
    }

    /// Add zero-mean Gaussian noise to every element of `v` and clip into
    /// `[-max_action, max_action]`
    pub fn perturb(&self, v: &mut [f32], t: u32, rng: &mut impl Rng) {
        let std = self.epsilon(t) * self.max_action;
        let normal = Normal::new(0.0, std).expect("std is finite and non-negative");
        for x in v.iter_mut() {
            *x = (*x + normal.sample(rng)).clamp(-self.max_action, self.max_action);
        }
    }
}
