use serde::{Deserialize, Serialize};

/// How many simulated callers run and how often each resolves.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoadConfig {
    #[serde(default = "default_vus")]
    pub vus: usize,

    #[serde(default = "default_iterations")]
    pub iterations: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            vus: default_vus(),
            iterations: default_iterations(),
        }
    }
}

fn default_vus() -> usize {
    1
}

fn default_iterations() -> usize {
    1
}
