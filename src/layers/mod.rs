pub mod dense;

pub use dense::{Boundary, Layer};
