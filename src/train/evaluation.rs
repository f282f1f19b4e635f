use serde::{Serialize, Deserialize};

/// Summary of a network's performance over a set of examples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Number of examples evaluated.
    pub samples: usize,
    /// Mean of the raw per-element output loss, averaged over examples.
    pub mean_loss: f64,
    /// Mean squared error between output and desired vectors.
    pub mean_squared_error: f64,
    /// Fraction in [0, 1] of examples whose output argmax matches the
    /// desired argmax.
    pub accuracy: f64,
}
