use crate::codec::{ActionLayout, HybridAction};
use crate::error::Result;

/// A parameterized-action environment in which an agent can operate
///
/// Each step consumes a [`HybridAction`]: one discrete channel index plus the
/// continuous parameters for every channel (zeroed except the chosen one).
/// Failures raised by `reset` or `step` propagate unmodified and terminate the
/// run; there is no retry.
pub trait Environment {
    /// A representation of the state of the environment to be passed to an agent
    type State: Clone + AsRef<[f32]>;

    /// The length of the state vector
    fn state_dim(&self) -> usize;

    /// The per-discrete-channel parameter widths of the action space
    fn layout(&self) -> ActionLayout;

    /// The episode return that identifies a successful outcome
    fn success_return(&self) -> f32;

    /// Seed the environment's source of randomness
    fn seed(&mut self, seed: u64);

    /// Reset the environment to an initial state
    fn reset(&mut self) -> Result<Self::State>;

    /// Update the environment in response to an action taken by an agent
    ///
    /// **Returns** `(next_state, reward, terminal)`
    fn step(&mut self, action: &HybridAction) -> Result<(Self::State, f32, bool)>;
}
