use log::info;

use crate::codec::ActionLayout;
use crate::env::Environment;
use crate::error::Result;
use crate::policy::Policy;

/// How many trailing episodes the return and length means aggregate over
const WINDOW: usize = 100;

/// Aggregated results of one evaluation pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalStats {
    /// Mean return over the last min(100, episodes) episodes
    pub mean_return: f32,
    /// Mean episode length over the same window
    pub mean_steps: f32,
    /// Fraction of all episodes whose return hit the environment's success sentinel
    pub success_rate: f32,
}

/// Run `episodes` complete greedy episodes against a snapshot of the policy
///
/// No exploration noise is applied, so the policy output is deterministic and
/// two runs against an identically seeded environment produce identical
/// statistics. Neither the policy nor any buffer is mutated; environment
/// failures propagate unmasked.
pub fn evaluate<E: Environment, P: Policy>(
    env: &mut E,
    policy: &P,
    layout: &ActionLayout,
    episodes: usize,
) -> Result<EvalStats> {
    let mut returns = Vec::with_capacity(episodes);
    let mut lengths = Vec::with_capacity(episodes);

    for _ in 0..episodes {
        let mut state = env.reset()?;
        let mut total_reward = 0.0;
        let mut steps = 0u32;
        loop {
            let (discrete_emb, parameter_emb) = policy.select_action(state.as_ref());
            let action = layout.greedy(&discrete_emb, &parameter_emb);
            let (next_state, reward, terminal) = env.step(&action)?;
            total_reward += reward;
            steps += 1;
            state = next_state;
            if terminal {
                break;
            }
        }
        returns.push(total_reward);
        lengths.push(steps as f32);
    }

    let success = env.success_return();
    // exact match against the terminal sentinel, as the environment emits it
    let successes = returns.iter().filter(|&&r| r == success).count();

    let stats = EvalStats {
        mean_return: mean(tail(&returns)),
        mean_steps: mean(tail(&lengths)),
        success_rate: successes as f32 / returns.len() as f32,
    };
    info!(
        "evaluation over {} episodes: return {:.3} success {:.3} steps {:.3}",
        episodes, stats.mean_return, stats.success_rate, stats.mean_steps
    );
    Ok(stats)
}

fn tail(xs: &[f32]) -> &[f32] {
    &xs[xs.len().saturating_sub(WINDOW)..]
}

fn mean(xs: &[f32]) -> f32 {
    xs.iter().sum::<f32>() / xs.len() as f32
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use rand::rngs::StdRng;

    use super::*;
    use crate::gym::GoalChase;
    use crate::memory::ReplayBuffer;

    /// Emits the same embeddings for every state
    struct FixedPolicy {
        discrete_emb: Vec<f32>,
        parameter_emb: Vec<f32>,
    }

    impl Policy for FixedPolicy {
        fn select_action(&self, _state: &[f32]) -> (Vec<f32>, Vec<f32>) {
            (self.discrete_emb.clone(), self.parameter_emb.clone())
        }

        fn train(&mut self, _: &ReplayBuffer, _: usize, _: &mut StdRng) -> Result<()> {
            Ok(())
        }

        fn save(&self, _: &Path) -> Result<()> {
            Ok(())
        }

        fn load(&mut self, _: &Path) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        let mut env = GoalChase::new();
        let layout = env.layout();
        let policy = FixedPolicy {
            discrete_emb: vec![0.0, 1.0],
            parameter_emb: vec![0.0, 0.0, 0.8],
        };

        env.seed(7);
        let a = evaluate(&mut env, &policy, &layout, 5).unwrap();
        env.seed(7);
        let b = evaluate(&mut env, &policy, &layout, 5).unwrap();
        assert_eq!(a, b, "identical seeds reproduce identical statistics");
    }

    #[test]
    fn dash_policy_reaches_the_goal() {
        let mut env = GoalChase::new();
        let layout = env.layout();
        // full-strength dash shrinks the distance every step
        let policy = FixedPolicy {
            discrete_emb: vec![-0.5, 0.5],
            parameter_emb: vec![0.0, 0.0, 1.0],
        };

        env.seed(3);
        let stats = evaluate(&mut env, &policy, &layout, 10).unwrap();
        assert_eq!(stats.success_rate, 1.0, "every episode succeeds");
        assert_eq!(stats.mean_return, env.success_return(), "sparse reward only at the goal");
        assert!(stats.mean_steps < 20.0, "dashing converges quickly");
    }

    #[test]
    fn idle_policy_never_succeeds() {
        let mut env = GoalChase::new();
        let layout = env.layout();
        // zero step parameters leave the agent where it spawned
        let policy = FixedPolicy {
            discrete_emb: vec![1.0, 0.0],
            parameter_emb: vec![0.0, 0.0, 0.0],
        };

        env.seed(11);
        let stats = evaluate(&mut env, &policy, &layout, 4).unwrap();
        assert_eq!(stats.success_rate, 0.0, "stationary agent times out every episode");
        assert_eq!(stats.mean_return, 0.0);
    }
}
