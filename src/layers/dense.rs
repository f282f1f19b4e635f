use std::fmt;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::math::{matrix::Matrix, vector::Vector};

/// The parameters that transform the previous layer's activations into this
/// layer's node values.
///
/// The input layer stays `Uninitialized`; every later layer receives
/// `Weights` when the network is initialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Boundary {
    Uninitialized,
    Weights {
        /// `size × previous layer size`
        weights: Matrix,
        /// one entry per weight row
        biases: Vector,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    size: usize,
    index: usize,
    name: Option<String>,
    nodes: Vector,
    boundary: Boundary,
}

impl Layer {
    /// A layer of `size` nodes, all set to `1` until the first forward pass.
    pub fn new(size: usize, name: Option<&str>) -> Layer {
        Layer {
            size,
            index: 0,
            name: name.map(str::to_owned),
            nodes: Vector::filled(size, 1.0),
            boundary: Boundary::Uninitialized,
        }
    }

    /// Assigns the layer's position, resets its nodes to `1` and, when
    /// `weights` is given, installs them together with a fresh bias vector
    /// drawn from `[0, 1)`.
    pub fn initialize<R: Rng + ?Sized>(&mut self, index: usize, weights: Option<Matrix>, rng: &mut R) -> Result<()> {
        self.index = index;
        self.boundary = match weights {
            Some(weights) => {
                if weights.rows() != self.size {
                    return Err(NnError::mismatch(
                        "layer weights",
                        weights.shape(),
                        self.nodes.shape(),
                    ));
                }
                let mut biases = Vector::zeros(weights.rows());
                biases.randomize(rng, 1.0, false);
                Boundary::Weights { weights, biases }
            }
            None => Boundary::Uninitialized,
        };
        self.nodes = Vector::filled(self.size, 1.0);
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn nodes(&self) -> &Vector {
        &self.nodes
    }

    /// Replaces the node values. A vector of the wrong length is rejected and
    /// the current nodes are left untouched.
    pub fn set_nodes(&mut self, nodes: Vector) -> Result<()> {
        if nodes.len() != self.size {
            return Err(NnError::mismatch("layer nodes", nodes.shape(), self.nodes.shape()));
        }
        self.nodes = nodes;
        Ok(())
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn weights(&self) -> Option<&Matrix> {
        match &self.boundary {
            Boundary::Weights { weights, .. } => Some(weights),
            Boundary::Uninitialized => None,
        }
    }

    pub fn biases(&self) -> Option<&Vector> {
        match &self.boundary {
            Boundary::Weights { biases, .. } => Some(biases),
            Boundary::Uninitialized => None,
        }
    }

    pub(crate) fn parameters_mut(&mut self) -> Option<(&mut Matrix, &mut Vector)> {
        match &mut self.boundary {
            Boundary::Weights { weights, biases } => Some((weights, biases)),
            Boundary::Uninitialized => None,
        }
    }

    /// Adds `weight_delta` and `bias_delta` to this layer's parameters.
    /// Shapes are checked before anything is written.
    pub fn apply_deltas(&mut self, weight_delta: &Matrix, bias_delta: &Vector) -> Result<()> {
        let index = self.index;
        let (weights, biases) = self.parameters_mut().ok_or(NnError::Uninitialized { index })?;
        let new_weights = weights.add(weight_delta)?;
        let new_biases = biases.add(bias_delta)?;
        *weights = new_weights;
        *biases = new_biases;
        Ok(())
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => writeln!(f, "Layer {}", name)?,
            _ => writeln!(f, "Layer ({})", self.index)?,
        }
        write!(f, "Nodes (Size: {}) {}", self.size, self.nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn new_layer_has_placeholder_nodes_and_no_weights() {
        let layer = Layer::new(4, Some("Input"));
        assert_eq!(layer.nodes().as_slice(), &[1.0; 4]);
        assert_eq!(layer.boundary(), &Boundary::Uninitialized);
        assert_eq!(layer.name(), Some("Input"));
    }

    #[test]
    fn initialize_allocates_biases_per_weight_row() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut layer = Layer::new(3, None);
        layer.initialize(2, Some(Matrix::random(3, 5, &mut rng, 1.0)), &mut rng).unwrap();
        assert_eq!(layer.index(), 2);
        let biases = layer.biases().unwrap();
        assert_eq!(biases.len(), 3);
        assert!(biases.iter().all(|b| (0.0..1.0).contains(b)));
    }

    #[test]
    fn reinitialize_resets_nodes() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut layer = Layer::new(2, None);
        layer.set_nodes(Vector::new(vec![0.2, 0.7])).unwrap();
        layer.initialize(1, Some(Matrix::random(2, 2, &mut rng, 1.0)), &mut rng).unwrap();
        assert_eq!(layer.nodes().as_slice(), &[1.0, 1.0]);
    }

    #[test]
    fn initialize_rejects_weights_with_wrong_row_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut layer = Layer::new(3, None);
        let err = layer.initialize(1, Some(Matrix::zeros(2, 5)), &mut rng);
        assert!(matches!(err, Err(NnError::DimensionMismatch { .. })));
    }

    #[test]
    fn set_nodes_rejects_wrong_length_without_mutating() {
        let mut layer = Layer::new(2, None);
        layer.set_nodes(Vector::new(vec![0.25, 0.75])).unwrap();
        let err = layer.set_nodes(Vector::new(vec![1.0, 2.0, 3.0]));
        assert!(matches!(err, Err(NnError::DimensionMismatch { .. })));
        assert_eq!(layer.nodes().as_slice(), &[0.25, 0.75]);
    }

    #[test]
    fn apply_deltas_requires_weights() {
        let mut layer = Layer::new(2, None);
        let err = layer.apply_deltas(&Matrix::zeros(2, 2), &Vector::zeros(2));
        assert!(matches!(err, Err(NnError::Uninitialized { index: 0 })));
    }

    #[test]
    fn display_uses_name_or_index() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut hidden = Layer::new(2, None);
        hidden.initialize(1, Some(Matrix::zeros(2, 2)), &mut rng).unwrap();
        assert!(hidden.to_string().starts_with("Layer (1)\n"));
        assert!(Layer::new(1, Some("Output")).to_string().starts_with("Layer Output\n"));
    }
}
