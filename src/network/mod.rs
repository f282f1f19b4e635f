pub mod mutation;
pub mod network;
pub mod operations;
pub mod properties;
pub mod results;

pub use mutation::{mutate_network, mutate_network_with};
pub use network::{Link, Network};
pub use properties::{CustomPolicy, NetworkProperties, Policy};
pub use results::{Deltas, LayerResult};
