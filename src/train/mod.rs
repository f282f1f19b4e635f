pub mod evaluation;
pub mod train_config;
pub mod trainer;

pub use evaluation::Evaluation;
pub use train_config::TrainConfig;
pub use trainer::{evaluate, train_sequential, train_stochastic, TrainingPair};
