pub mod idx;
pub mod image;
pub mod toy;

pub use idx::{load_idx_pair, parse_idx_pair, Dataset};
pub use self::image::{image_bytes_to_input, load_image_input};
pub use toy::xor_pairs;
