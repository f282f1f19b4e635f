use serde::{Serialize, Deserialize};

/// Per-element loss between the network's output and the desired output.
///
/// - `Difference` : the raw signed error `desired - actual`. It is not
///   squared; combined with the output-form activation derivative it yields
///   the negative gradient of half the squared error, so weight deltas are
///   *added* to the current weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LossFunction {
    #[default]
    Difference,
}

impl LossFunction {
    pub fn loss(&self, actual: f64, desired: f64) -> f64 {
        match self {
            LossFunction::Difference => desired - actual,
        }
    }
}
