pub mod loss_type;
pub mod mse;

pub use loss_type::LossFunction;
pub use mse::{mean_loss, mean_squared_error};
