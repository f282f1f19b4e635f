use crate::error::{NnError, Result};
use crate::math::vector::Vector;

/// Scalar MSE: mean((actual - desired)²)
///
/// Used for progress reporting only; training always runs on the raw
/// per-element loss of the network's policy.
pub fn mean_squared_error(actual: &Vector, desired: &Vector) -> Result<f64> {
    let diff = actual.sub(desired).map_err(|_| {
        NnError::mismatch("mean squared error", actual.shape(), desired.shape())
    })?;
    Ok(diff.map(|x| x * x).mean())
}

/// Mean of a raw per-element loss vector. Signed errors may cancel, which
/// mirrors how the digit trainer reports its running loss.
pub fn mean_loss(loss: &Vector) -> f64 {
    loss.mean()
}
