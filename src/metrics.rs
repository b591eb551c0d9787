use std::fs;
use std::path::Path;

use log::info;

use crate::error::Result;

/// Append-only series recorded once per evaluation trigger
///
/// Persisted at run end only; a crash mid-run loses the metrics of that run.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    /// Moving average of training episode returns (last 100 episodes)
    pub train_return: Vec<f32>,
    /// Mean evaluation return
    pub eval_return: Vec<f32>,
    /// Mean evaluation episode length
    pub eval_steps: Vec<f32>,
    /// Evaluation success rate
    pub eval_success: Vec<f32>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn series(&self) -> [(&'static str, &Vec<f32>); 4] {
        [
            ("train_return_100", &self.train_return),
            ("eval_return", &self.eval_return),
            ("eval_episode_steps", &self.eval_steps),
            ("eval_success_rate", &self.eval_success),
        ]
    }

    /// Write one single-column delimited table per series into `dir`,
    /// named `{series}_{run_id}.csv`
    pub fn save(&self, dir: &Path, run_id: &str) -> Result<()> {
        fs::create_dir_all(dir).map_err(csv::Error::from)?;
        for (name, values) in self.series() {
            let path = dir.join(format!("{name}_{run_id}.csv"));
            let mut writer = csv::Writer::from_path(&path)?;
            for value in values {
                writer.write_record([value.to_string()])?;
            }
            writer.flush().map_err(csv::Error::from)?;
        }
        info!("saved metrics for run {run_id} to {}", dir.display());
        Ok(())
    }
}
