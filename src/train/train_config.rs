/// Configuration for a `train_stochastic` run.
///
/// # Fields
/// - `iterations` : number of single-example training steps
/// - `log_every`  : emit a progress line every this many steps; `0` disables
///                  progress logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainConfig {
    pub iterations: usize,
    pub log_every: usize,
}

impl TrainConfig {
    pub fn new(iterations: usize) -> Self {
        TrainConfig { iterations, log_every: 0 }
    }

    pub fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig { iterations: 50_000, log_every: 10_000 }
    }
}
