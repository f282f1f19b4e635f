pub mod error;
pub mod math;
pub mod activation;
pub mod loss;
pub mod layers;
pub mod network;
pub mod train;
pub mod data;
pub mod io;
pub mod control;

// Convenience re-exports
pub use error::{NnError, Result, Shape};
pub use math::{Matrix, Vector};
pub use activation::ActivationFunction;
pub use loss::LossFunction;
pub use layers::{Boundary, Layer};
pub use network::{CustomPolicy, Deltas, LayerResult, Link, Network, NetworkProperties, Policy};
pub use train::{evaluate, train_sequential, train_stochastic, Evaluation, TrainConfig, TrainingPair};
pub use data::{xor_pairs, Dataset};
