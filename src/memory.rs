use rand::Rng;

use crate::error::{Error, Result};

/// A single recorded step in a parameterized action space
///
/// The action is stored as the policy's full embedding vectors (the pre-argmax
/// discrete embedding and the full flattened parameter embedding before
/// slicing), not the decoded action the environment executed.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: Vec<f32>,
    pub discrete_emb: Vec<f32>,
    pub parameter_emb: Vec<f32>,
    pub next_state: Vec<f32>,
    pub reward: f32,
    pub done: bool,
}

/// A zipped batch of [transitions](Transition), one vector per field,
/// row-aligned by sample index
#[derive(Debug, Clone)]
pub struct TransitionBatch {
    pub states: Vec<Vec<f32>>,
    pub discrete_embs: Vec<Vec<f32>>,
    pub parameter_embs: Vec<Vec<f32>>,
    pub next_states: Vec<Vec<f32>>,
    pub rewards: Vec<f32>,
    pub dones: Vec<bool>,
}

impl TransitionBatch {
    fn with_capacity(batch_size: usize) -> Self {
        Self {
            states: Vec::with_capacity(batch_size),
            discrete_embs: Vec::with_capacity(batch_size),
            parameter_embs: Vec::with_capacity(batch_size),
            next_states: Vec::with_capacity(batch_size),
            rewards: Vec::with_capacity(batch_size),
            dones: Vec::with_capacity(batch_size),
        }
    }

    fn push(&mut self, t: &Transition) {
        self.states.push(t.state.clone());
        self.discrete_embs.push(t.discrete_emb.clone());
        self.parameter_embs.push(t.parameter_emb.clone());
        self.next_states.push(t.next_state.clone());
        self.rewards.push(t.reward);
        self.dones.push(t.done);
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }
}

/// A fixed-capacity store of [transitions](Transition)
///
/// Writes go to a circular cursor, so once the buffer is full the oldest entry
/// is overwritten (FIFO ring). Sampling draws indices uniformly at random
/// **with replacement**, so any batch size is valid as long as at least one
/// transition has been stored. The embedding dimensions are captured at
/// construction and hold for the lifetime of the buffer.
pub struct ReplayBuffer {
    buffer: Vec<Transition>,
    cursor: usize,
    capacity: usize,
    state_dim: usize,
    discrete_emb_dim: usize,
    parameter_emb_dim: usize,
}

impl ReplayBuffer {
    pub fn new(
        capacity: usize,
        state_dim: usize,
        discrete_emb_dim: usize,
        parameter_emb_dim: usize,
    ) -> Self {
        assert!(capacity > 0, "capacity must be non-zero");
        Self {
            buffer: Vec::with_capacity(capacity),
            cursor: 0,
            capacity,
            state_dim,
            discrete_emb_dim,
            parameter_emb_dim,
        }
    }

    /// The number of transitions currently stored
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Store a transition, overwriting the oldest entry once full
    ///
    /// Every field is copied into the buffer, so later mutation of the live
    /// action vectors (e.g. the next round of exploration noise) cannot alias
    /// into stored data.
    pub fn push(
        &mut self,
        state: &[f32],
        discrete_emb: &[f32],
        parameter_emb: &[f32],
        next_state: &[f32],
        reward: f32,
        done: bool,
    ) {
        debug_assert_eq!(state.len(), self.state_dim);
        debug_assert_eq!(discrete_emb.len(), self.discrete_emb_dim);
        debug_assert_eq!(parameter_emb.len(), self.parameter_emb_dim);
        debug_assert_eq!(next_state.len(), self.state_dim);

        let transition = Transition {
            state: state.to_vec(),
            discrete_emb: discrete_emb.to_vec(),
            parameter_emb: parameter_emb.to_vec(),
            next_state: next_state.to_vec(),
            reward,
            done,
        };

        if self.buffer.len() < self.capacity {
            self.buffer.push(transition);
        } else {
            self.buffer[self.cursor] = transition;
        }
        self.cursor = (self.cursor + 1) % self.capacity;
    }

    /// Sample a batch of `batch_size` transitions uniformly with replacement
    pub fn sample(&self, batch_size: usize, rng: &mut impl Rng) -> Result<TransitionBatch> {
        if self.buffer.is_empty() {
            return Err(Error::InsufficientData);
        }
        let mut batch = TransitionBatch::with_capacity(batch_size);
        for _ in 0..batch_size {
            let ix = rng.gen_range(0..self.buffer.len());
            batch.push(&self.buffer[ix]);
        }
        Ok(batch)
    }
}
