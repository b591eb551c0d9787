/// Hybrid discrete-continuous action codec
pub mod codec;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Environment
pub mod env;

/// Error types
pub mod error;

/// Deterministic policy evaluation
pub mod eval;

/// Exploration noise
pub mod exploration;

/// Testing environments
pub mod gym;

/// Experience replay
pub mod memory;

/// Training metrics
pub mod metrics;

/// Policy interface
pub mod policy;

/// Training orchestration
pub mod train;

pub use error::{Error, Result};
