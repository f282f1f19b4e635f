use rand::Rng;

use crate::network::network::Network;

/// Randomly perturbs a network's parameters for neuro-evolution.
///
/// Every weight and bias is independently replaced, with probability `rate`,
/// by a fresh value uniform in `[-1, 1)`.
pub fn mutate_network<R: Rng + ?Sized>(network: &mut Network, rng: &mut R, rate: f64) {
    mutate_network_with(network, rng, rate, |_, rng| rng.gen::<f64>() * 2.0 - 1.0);
}

/// Like [`mutate_network`] but the replacement value comes from `mutator`,
/// which receives the current value and the random source.
pub fn mutate_network_with<R, F>(network: &mut Network, rng: &mut R, rate: f64, mut mutator: F)
where
    R: Rng + ?Sized,
    F: FnMut(f64, &mut R) -> f64,
{
    for layer in network.layers_mut() {
        if let Some((weights, biases)) = layer.parameters_mut() {
            weights.map_mut(|v| if rng.gen::<f64>() < rate { mutator(v, rng) } else { v });
            biases.map_mut(|v| if rng.gen::<f64>() < rate { mutator(v, rng) } else { v });
        }
    }
}
