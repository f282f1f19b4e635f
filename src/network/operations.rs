//! The per-boundary arithmetic behind the forward and backward passes.

use rand::Rng;

use crate::error::{NnError, Result};
use crate::layers::dense::Layer;
use crate::math::{matrix::Matrix, vector::Vector};
use crate::network::properties::Policy;
use crate::network::results::Deltas;

/// Random weights mapping `from` into `to`: shape `to.size × from.size`,
/// each element uniform in `[0, 1)`.
pub fn create_weights<R: Rng + ?Sized>(from: &Layer, to: &Layer, rng: &mut R) -> Matrix {
    Matrix::random(to.size(), from.size(), rng, 1.0)
}

/// `activation(W · a + b)` where `W` and `b` live on `to` and `a` is the
/// node vector of `from`.
pub fn calculate_values(from: &Layer, to: &Layer, policy: &Policy) -> Result<Vector> {
    let weights = to.weights().ok_or(NnError::Uninitialized { index: to.index() })?;
    let biases = to.biases().ok_or(NnError::Uninitialized { index: to.index() })?;

    let mut z = weights.mul_vector(from.nodes())?.add(biases)?;
    z.map_mut(|x| policy.activate(x));
    Ok(z)
}

/// Raw per-element loss of the output layer against `desired`.
pub fn output_loss(output: &Layer, desired: &Vector, policy: &Policy) -> Result<Vector> {
    output.nodes().zip_with(desired, "output loss", |a, d| policy.loss(a, d))
}

/// Back-projects the loss of `to` through the weights stored on `to`,
/// giving the loss of the layer that feeds it.
pub fn propagate_loss(to_loss: &Vector, to: &Layer) -> Result<Vector> {
    let weights = to.weights().ok_or(NnError::Uninitialized { index: to.index() })?;
    weights.transpose().mul_vector(to_loss)
}

/// Weight and bias deltas for the boundary `from → to`.
///
/// `ld = loss ⊙ derivative(to.nodes)`; the bias delta is `ld · rate` and the
/// weight delta is the outer product `ld · from.nodesᵀ · rate`, shaped like
/// the weights stored on `to`.
pub fn calculate_deltas(
    from: &Layer,
    to: &Layer,
    loss: &Vector,
    policy: &Policy,
    learning_rate: f64,
) -> Result<Deltas> {
    let derivative = to.nodes().map(|y| policy.activation_derivative(y));
    let ld = loss.mul(&derivative)?;

    let biases = ld.scale(learning_rate);
    let weights = ld
        .to_column()
        .matmul(&from.nodes().to_column().transpose())?
        .scale(learning_rate);

    Ok(Deltas { weights, biases })
}
