use std::fmt;

use crate::layers::dense::Layer;
use crate::math::{matrix::Matrix, vector::Vector};
use crate::network::network::Network;

/// Amounts added to one boundary's weights and biases by a training step.
#[derive(Debug, Clone, PartialEq)]
pub struct Deltas {
    pub weights: Matrix,
    pub biases: Vector,
}

/// What the backward pass computed for one trainable layer.
///
/// Only layers `1..N-1` get a result; the input layer has no weights and
/// never receives a loss. `deltas` is filled in once the weights have been
/// adjusted.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerResult {
    pub index: usize,
    pub loss: Vector,
    pub deltas: Option<Deltas>,
}

impl LayerResult {
    pub fn layer<'a>(&self, network: &'a Network) -> Option<&'a Layer> {
        network.layers().get(self.index)
    }
}

impl fmt::Display for Deltas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Weight deltas {}", self.weights)?;
        write!(f, "Bias deltas {}", self.biases)
    }
}

impl fmt::Display for LayerResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-- Layer Result ({}) --", self.index)?;
        write!(f, "Loss {}", self.loss)?;
        if let Some(deltas) = &self.deltas {
            write!(f, "\n{}", deltas)?;
        }
        Ok(())
    }
}
