use thiserror::Error;

/// Errors that can terminate a training run
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or unsupported configuration, surfaced before any training step runs
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The replay buffer was sampled before any transition was stored
    #[error("replay buffer has no transitions to sample")]
    InsufficientData,

    /// A failure raised by the environment during reset or step; never retried,
    /// since an environment fault invalidates trajectory integrity
    #[error("environment fault: {0}")]
    Environment(String),

    /// Failure writing metrics at run end; does not roll back completed training
    #[error("failed to persist metrics: {0}")]
    Persistence(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
