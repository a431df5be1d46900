use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

fn default_jobs() -> usize {
    std::thread::available_parallelism().map_or(4, NonZeroUsize::get)
}

/// Scheduling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunConfig {
    /// Maximum number of subjects converted concurrently.
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
        }
    }
}
