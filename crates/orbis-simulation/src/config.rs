/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for deterministic simulation.
    pub seed: u64,
    /// Maximum action log size (oldest actions dropped when exceeded). 0 = unlimited.
    pub max_actions: usize,
    /// Upper clamp on a single tick interval in seconds. 0 = no clamp.
    pub max_interval: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_actions: 0,
            max_interval: 0.0,
        }
    }
}

impl SimConfig {
    /// Set the RNG seed for deterministic simulation.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the maximum action log size (0 = unlimited).
    pub fn with_max_actions(mut self, max: usize) -> Self {
        self.max_actions = max;
        self
    }

    /// Clamp every tick interval to at most `seconds` (0 = no clamp).
    pub fn with_max_interval(mut self, seconds: f64) -> Self {
        self.max_interval = seconds;
        self
    }

    /// The interval a tick actually advances by.
    pub fn clamp_interval(&self, interval: f64) -> f64 {
        if self.max_interval > 0.0 {
            interval.min(self.max_interval)
        } else {
            interval
        }
    }
}
