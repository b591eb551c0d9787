use std::path::PathBuf;

use log::info;
use rand::{rngs::StdRng, SeedableRng};

use crate::codec::ActionLayout;
use crate::decay::LinearAnneal;
use crate::env::Environment;
use crate::error::{Error, Result};
use crate::eval::evaluate;
use crate::exploration::GaussianNoise;
use crate::memory::ReplayBuffer;
use crate::metrics::Metrics;
use crate::policy::{Policy, PolicyKind};

/// Configuration for a training run
///
/// Every option is read once at construction and fixed for the lifetime of
/// the run. `discount` and `tau` belong to the policy collaborator; they are
/// recognized here so one config value describes the whole run, and read by
/// the caller when constructing the policy.
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Which actor-critic variant the run trains
    pub policy: PolicyKind,
    /// Environment identifier, used for result file naming
    pub env_id: String,
    /// Seed threaded through the environment, the noise source, and buffer sampling
    pub seed: u64,
    /// Environment steps before learning updates begin
    pub start_timesteps: u32,
    /// Evaluation cadence in environment steps
    pub eval_freq: u32,
    /// Episodes per evaluation pass
    pub eval_episodes: usize,
    /// Total environment step budget
    pub max_timesteps: u32,
    /// Step cap per episode
    pub max_episode_steps: u32,
    /// Window over which exploration noise anneals, in environment steps
    pub epsilon_steps: u32,
    /// Initial exploration noise scale
    pub expl_noise_initial: f32,
    /// Floor exploration noise scale
    pub expl_noise: f32,
    /// Batch size for policy optimization steps
    pub batch_size: usize,
    /// Discount factor (consumed by the policy collaborator)
    pub discount: f32,
    /// Target network update rate (consumed by the policy collaborator)
    pub tau: f32,
    /// Replay buffer capacity
    pub buffer_capacity: usize,
    /// Magnitude bound of every embedding element
    pub max_action: f32,
    /// Where to persist metrics at run end; `None` skips persistence
    pub results_dir: Option<PathBuf>,
    /// Checkpoint to restore before training
    pub load_model: Option<PathBuf>,
    /// Checkpoint to write after training
    pub save_model: Option<PathBuf>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::PDdpg,
            env_id: String::from("GoalChase-v0"),
            seed: 0,
            start_timesteps: 128,
            eval_freq: 500,
            eval_episodes: 100,
            max_timesteps: 300_000,
            max_episode_steps: 250,
            epsilon_steps: 1000,
            expl_noise_initial: 1.0,
            expl_noise: 0.1,
            batch_size: 128,
            discount: 0.99,
            tau: 0.005,
            buffer_capacity: 100_000,
            max_action: 1.0,
            results_dir: None,
            load_model: None,
            save_model: None,
        }
    }
}

impl TrainerConfig {
    fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Config(String::from("batch_size must be non-zero")));
        }
        if self.eval_freq == 0 {
            return Err(Error::Config(String::from("eval_freq must be non-zero")));
        }
        if self.eval_episodes == 0 {
            return Err(Error::Config(String::from("eval_episodes must be non-zero")));
        }
        if self.max_episode_steps == 0 {
            return Err(Error::Config(String::from("max_episode_steps must be non-zero")));
        }
        if self.buffer_capacity == 0 {
            return Err(Error::Config(String::from("buffer_capacity must be non-zero")));
        }
        if self.max_action <= 0.0 {
            return Err(Error::Config(String::from("max_action must be strictly positive")));
        }
        Ok(())
    }

    fn run_id(&self) -> String {
        format!("{}_{}_{}", self.policy, self.env_id, self.seed)
    }
}

/// Drives the training loop: exploration, environment stepping, replay
/// storage, warmup-gated learning updates, and periodic deterministic
/// evaluation
///
/// Owns the environment, the replay buffer, and the single seeded RNG of the
/// run; the policy is passed into [`train`](Trainer::train) so the same
/// orchestrator works across variants.
pub struct Trainer<E: Environment> {
    config: TrainerConfig,
    env: E,
    layout: ActionLayout,
    exploration: GaussianNoise<LinearAnneal>,
    buffer: ReplayBuffer,
    rng: StdRng,
    metrics: Metrics,
}

impl<E: Environment> Trainer<E> {
    /// Validate the configuration and wire up the run
    ///
    /// Fails with [`Error::Config`] before any training step runs.
    pub fn new(config: TrainerConfig, mut env: E) -> Result<Self> {
        config.validate()?;
        let decay = LinearAnneal::new(
            config.expl_noise_initial,
            config.expl_noise,
            config.epsilon_steps,
        )?;
        let exploration = GaussianNoise::new(decay, config.max_action);

        let layout = env.layout();
        let buffer = ReplayBuffer::new(
            config.buffer_capacity,
            env.state_dim(),
            layout.num_discrete(),
            layout.param_dim(),
        );
        env.seed(config.seed);
        let rng = StdRng::seed_from_u64(config.seed);

        Ok(Self {
            config,
            env,
            layout,
            exploration,
            buffer,
            rng,
            metrics: Metrics::new(),
        })
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn buffer(&self) -> &ReplayBuffer {
        &self.buffer
    }

    /// Query the policy and apply exploration noise at step `t` to both
    /// embedding vectors
    fn explore<P: Policy>(&mut self, policy: &P, state: &[f32], t: u32) -> (Vec<f32>, Vec<f32>) {
        let (mut discrete_emb, mut parameter_emb) = policy.select_action(state);
        self.exploration.perturb(&mut discrete_emb, t, &mut self.rng);
        self.exploration.perturb(&mut parameter_emb, t, &mut self.rng);
        (discrete_emb, parameter_emb)
    }

    /// Run the full training loop until the timestep budget is exhausted,
    /// then persist metrics
    ///
    /// Returns the recorded metrics; also saves a checkpoint if the config
    /// names one.
    pub fn train<P: Policy>(&mut self, policy: &mut P) -> Result<&Metrics> {
        if let Some(path) = &self.config.load_model {
            policy.load(path)?;
        }
        info!(
            "training {} on {} with seed {}",
            self.config.policy, self.config.env_id, self.config.seed
        );

        let mut total_timesteps: u32 = 0;
        let mut episode_returns: Vec<f32> = Vec::new();

        while total_timesteps < self.config.max_timesteps {
            let mut state = self.env.reset()?;
            let (mut discrete_emb, mut parameter_emb) =
                self.explore(policy, state.as_ref(), total_timesteps);
            let mut action = self.layout.greedy(&discrete_emb, &parameter_emb);
            let mut episode_return = 0.0;

            for _ in 0..self.config.max_episode_steps {
                total_timesteps += 1;
                let (next_state, reward, mut terminal) = self.env.step(&action)?;

                // the stored action is the full noised embedding pair, not the
                // decoded action the environment executed
                self.buffer.push(
                    state.as_ref(),
                    &discrete_emb,
                    &parameter_emb,
                    next_state.as_ref(),
                    reward,
                    terminal,
                );

                let (next_discrete_emb, next_parameter_emb) =
                    self.explore(policy, next_state.as_ref(), total_timesteps);
                action = self.layout.greedy(&next_discrete_emb, &next_parameter_emb);
                discrete_emb = next_discrete_emb;
                parameter_emb = next_parameter_emb;
                state = next_state;

                if total_timesteps >= self.config.start_timesteps {
                    policy.train(&self.buffer, self.config.batch_size, &mut self.rng)?;
                }
                episode_return += reward;

                if total_timesteps % self.config.eval_freq == 0 {
                    // Finish the in-flight episode greedily before evaluating.
                    // This is cleanup, not data collection: nothing is stored
                    // and the step counter does not advance.
                    while !terminal {
                        let (d, p) = policy.select_action(state.as_ref());
                        let greedy = self.layout.greedy(&d, &p);
                        let (s, _, t) = self.env.step(&greedy)?;
                        state = s;
                        terminal = t;
                    }

                    let avg_return = if episode_returns.is_empty() {
                        episode_return
                    } else {
                        let window = &episode_returns[episode_returns.len().saturating_sub(100)..];
                        window.iter().sum::<f32>() / window.len() as f32
                    };
                    info!("t={total_timesteps} r100={avg_return:.4}");

                    self.metrics.train_return.push(avg_return);
                    let stats = evaluate(
                        &mut self.env,
                        policy,
                        &self.layout,
                        self.config.eval_episodes,
                    )?;
                    self.metrics.eval_return.push(stats.mean_return);
                    self.metrics.eval_steps.push(stats.mean_steps);
                    self.metrics.eval_success.push(stats.success_rate);
                }

                if terminal {
                    break;
                }
            }
            episode_returns.push(episode_return);
        }

        if let Some(path) = &self.config.save_model {
            policy.save(path)?;
        }
        if let Some(dir) = &self.config.results_dir {
            self.metrics.save(dir, &self.config.run_id())?;
        }
        Ok(&self.metrics)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tempdir::TempDir;

    use super::*;
    use crate::gym::GoalChase;

    /// Emits fixed in-range embeddings and counts optimization steps
    struct CountingPolicy {
        train_calls: u32,
    }

    impl CountingPolicy {
        fn new() -> Self {
            Self { train_calls: 0 }
        }
    }

    impl Policy for CountingPolicy {
        fn select_action(&self, _state: &[f32]) -> (Vec<f32>, Vec<f32>) {
            (vec![0.2, -0.1], vec![0.0, 0.0, -0.5])
        }

        fn train(&mut self, buffer: &ReplayBuffer, batch_size: usize, rng: &mut StdRng) -> Result<()> {
            let batch = buffer.sample(batch_size, rng)?;
            assert_eq!(batch.len(), batch_size, "full batch sampled");
            self.train_calls += 1;
            Ok(())
        }

        fn save(&self, _: &Path) -> Result<()> {
            Ok(())
        }

        fn load(&mut self, _: &Path) -> Result<()> {
            Ok(())
        }
    }

    fn test_config() -> TrainerConfig {
        TrainerConfig {
            seed: 0,
            start_timesteps: 5,
            eval_freq: 10,
            eval_episodes: 2,
            max_timesteps: 50,
            batch_size: 4,
            buffer_capacity: 1000,
            ..TrainerConfig::default()
        }
    }

    #[test]
    fn end_to_end_run() {
        let results = TempDir::new("parl-run").unwrap();
        let mut config = test_config();
        config.results_dir = Some(results.path().to_path_buf());

        let mut trainer = Trainer::new(config, GoalChase::new()).unwrap();
        let mut policy = CountingPolicy::new();
        trainer.train(&mut policy).unwrap();

        let metrics = trainer.metrics();
        for series in [
            &metrics.train_return,
            &metrics.eval_return,
            &metrics.eval_steps,
            &metrics.eval_success,
        ] {
            assert_eq!(series.len(), 5, "one entry per evaluation trigger");
            assert!(series.iter().all(|x| x.is_finite()), "entries are finite");
        }

        // drained episode steps are never stored, so the buffer holds exactly
        // the 50 collected transitions
        assert_eq!(trainer.buffer().len(), 50);
        // one optimization step per environment step from the warmup threshold on
        assert_eq!(policy.train_calls, 46);

        let file = results
            .path()
            .join("eval_success_rate_P-DDPG_GoalChase-v0_0.csv");
        let contents = std::fs::read_to_string(file).unwrap();
        assert_eq!(contents.lines().count(), 5, "persisted series row-aligned with triggers");
    }

    #[test]
    fn identical_seeds_reproduce_identical_runs() {
        let run = |seed| {
            let mut config = test_config();
            config.seed = seed;
            let mut trainer = Trainer::new(config, GoalChase::new()).unwrap();
            let mut policy = CountingPolicy::new();
            trainer.train(&mut policy).unwrap();
            trainer.metrics().clone()
        };

        let a = run(13);
        let b = run(13);
        assert_eq!(a.train_return, b.train_return);
        assert_eq!(a.eval_return, b.eval_return);
        assert_eq!(a.eval_success, b.eval_success);
    }

    #[test]
    fn invalid_config_is_rejected_before_training() {
        let mut config = test_config();
        config.batch_size = 0;
        assert!(
            matches!(Trainer::new(config, GoalChase::new()), Err(Error::Config(_))),
            "zero batch size rejected"
        );

        let mut config = test_config();
        config.expl_noise_initial = 0.05; // below the floor of 0.1
        assert!(
            matches!(Trainer::new(config, GoalChase::new()), Err(Error::Config(_))),
            "inverted noise schedule rejected"
        );
    }

    #[test]
    fn checkpoint_hooks_are_invoked() {
        struct SavingPolicy(CountingPolicy);

        impl Policy for SavingPolicy {
            fn select_action(&self, state: &[f32]) -> (Vec<f32>, Vec<f32>) {
                self.0.select_action(state)
            }
            fn train(&mut self, buffer: &ReplayBuffer, batch_size: usize, rng: &mut StdRng) -> Result<()> {
                self.0.train(buffer, batch_size, rng)
            }
            fn save(&self, path: &Path) -> Result<()> {
                std::fs::write(path, b"ckpt").map_err(|e| Error::Persistence(e.into()))
            }
            fn load(&mut self, _: &Path) -> Result<()> {
                Ok(())
            }
        }

        let dir = TempDir::new("parl-ckpt").unwrap();
        let ckpt = dir.path().join("model.bin");
        let mut config = test_config();
        config.save_model = Some(ckpt.clone());

        let mut trainer = Trainer::new(config, GoalChase::new()).unwrap();
        let mut policy = SavingPolicy(CountingPolicy::new());
        trainer.train(&mut policy).unwrap();
        assert!(ckpt.exists(), "checkpoint written at run end");
    }
}
