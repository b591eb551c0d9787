use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::codec::{ActionLayout, HybridAction};
use crate::env::Environment;
use crate::error::{Error, Result};

/// Movement per unit of step parameter
const STEP_SCALE: f32 = 0.1;
/// Largest fraction of the remaining distance a dash can cover
const DASH_SCALE: f32 = 0.5;
/// Radius around the origin that counts as reaching the goal
const GOAL_RADIUS: f32 = 0.05;

/// A 2D point-navigation task with a parameterized action space
///
/// The agent spawns away from the origin and must reach it. Two discrete
/// channels with parameter widths `[2, 1]`:
///
/// - `0` **step**: translate by `(dx, dy) * 0.1`
/// - `1` **dash**: move toward the origin, covering a fraction of the
///   remaining distance proportional to the parameter (mapped from `[-1, 1]`
///   to `[0, 1]`)
///
/// Rewards are sparse: `50.0` on reaching the goal (the success sentinel),
/// `0.0` otherwise. Episodes terminate on success or after the internal
/// horizon elapses.
pub struct GoalChase {
    pos: [f32; 2],
    steps: u32,
    horizon: u32,
    rng: StdRng,
}

impl GoalChase {
    /// The episode return that marks a successful episode
    pub const SUCCESS_RETURN: f32 = 50.0;

    pub fn new() -> Self {
        Self {
            pos: [0.0, 0.0],
            steps: 0,
            horizon: 100,
            rng: StdRng::seed_from_u64(0),
        }
    }

    fn dist(&self) -> f32 {
        (self.pos[0] * self.pos[0] + self.pos[1] * self.pos[1]).sqrt()
    }
}

impl Default for GoalChase {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for GoalChase {
    type State = [f32; 2];

    fn state_dim(&self) -> usize {
        2
    }

    fn layout(&self) -> ActionLayout {
        ActionLayout::new(vec![2, 1])
    }

    fn success_return(&self) -> f32 {
        Self::SUCCESS_RETURN
    }

    fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    fn reset(&mut self) -> Result<Self::State> {
        self.steps = 0;
        // spawn outside the goal radius so every episode requires movement
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let radius = self.rng.gen_range(0.3..1.0);
        self.pos = [radius * angle.cos(), radius * angle.sin()];
        Ok(self.pos)
    }

    fn step(&mut self, action: &HybridAction) -> Result<(Self::State, f32, bool)> {
        if action.params.len() != 2 {
            return Err(Error::Environment(String::from(
                "action does not match the [2, 1] parameter layout",
            )));
        }
        self.steps += 1;

        match action.discrete {
            0 => {
                self.pos[0] += action.params[0][0] * STEP_SCALE;
                self.pos[1] += action.params[0][1] * STEP_SCALE;
            }
            1 => {
                let fraction = (action.params[1][0] + 1.0) * 0.5 * DASH_SCALE;
                self.pos[0] *= 1.0 - fraction;
                self.pos[1] *= 1.0 - fraction;
            }
            i => {
                return Err(Error::Environment(format!("unknown discrete channel {i}")));
            }
        }
        self.pos[0] = self.pos[0].clamp(-1.0, 1.0);
        self.pos[1] = self.pos[1].clamp(-1.0, 1.0);

        if self.dist() <= GOAL_RADIUS {
            Ok((self.pos, Self::SUCCESS_RETURN, true))
        } else if self.steps >= self.horizon {
            Ok((self.pos, 0.0, true))
        } else {
            Ok((self.pos, 0.0, false))
        }
    }
}
