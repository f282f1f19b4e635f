use crate::math::vector::Vector;
use crate::train::trainer::TrainingPair;

/// The four XOR cases with a single output node: `[a, b] -> [a ^ b]`.
pub fn xor_pairs() -> Vec<TrainingPair> {
    [(0.0, 0.0, 0.0), (0.0, 1.0, 1.0), (1.0, 0.0, 1.0), (1.0, 1.0, 0.0)]
        .iter()
        .map(|&(a, b, out)| TrainingPair::new(Vector::new(vec![a, b]), Vector::new(vec![out])))
        .collect()
}
