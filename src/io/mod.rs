pub mod serializer;

pub use serializer::{from_json, load_json, save_json, to_json};
