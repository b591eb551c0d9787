use std::path::Path;
use std::str::FromStr;

use rand::rngs::StdRng;
use strum::{Display, EnumString};

use crate::error::{Error, Result};
use crate::memory::ReplayBuffer;

/// The closed set of supported actor-critic variants
///
/// Concrete network-backed implementations live outside this crate behind the
/// [`Policy`] trait; the enumeration exists so run configuration and result
/// file naming are keyed on a finite set rather than free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum PolicyKind {
    #[strum(serialize = "P-DDPG")]
    PDdpg,
    #[strum(serialize = "P-TD3")]
    PTd3,
    #[strum(serialize = "TD3")]
    Td3,
}

impl PolicyKind {
    /// Parse a policy selector, rejecting unknown variants before a run starts
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).map_err(|_| Error::Config(format!("unknown policy variant `{s}`")))
    }
}

/// An actor-critic policy over a parameterized action space
///
/// `select_action` emits the raw embedding pair: a discrete embedding whose
/// arg-max picks the channel, and the full flattened parameter embedding with
/// one contiguous sub-range per channel. Both are expected to lie in
/// `[-max_action, max_action]` elementwise.
pub trait Policy {
    /// Compute the embedding pair `(discrete_emb, parameter_emb)` for a state
    fn select_action(&self, state: &[f32]) -> (Vec<f32>, Vec<f32>);

    /// Perform one optimization step against a sample from the replay buffer
    fn train(&mut self, buffer: &ReplayBuffer, batch_size: usize, rng: &mut StdRng) -> Result<()>;

    /// Persist network parameters for checkpointing
    fn save(&self, path: &Path) -> Result<()>;

    /// Restore network parameters from a checkpoint
    fn load(&mut self, path: &Path) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_kind_parses_known_selectors() {
        assert_eq!(PolicyKind::parse("P-DDPG").unwrap(), PolicyKind::PDdpg);
        assert_eq!(PolicyKind::parse("P-TD3").unwrap(), PolicyKind::PTd3);
        assert_eq!(PolicyKind::parse("TD3").unwrap(), PolicyKind::Td3);
    }

    #[test]
    fn policy_kind_rejects_unknown_selector() {
        assert!(
            matches!(PolicyKind::parse("DQN"), Err(Error::Config(_))),
            "unsupported selector is a configuration error"
        );
    }

    #[test]
    fn policy_kind_display_used_for_file_naming() {
        assert_eq!(PolicyKind::PDdpg.to_string(), "P-DDPG");
    }
}
