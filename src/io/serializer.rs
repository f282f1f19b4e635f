use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use log::info;

use crate::error::Result;
use crate::network::network::{Network, RawNetwork};

/// Serializes a network (layer order, names, nodes, weights, biases,
/// learning rate and named policy) to pretty-printed JSON.
///
/// Fails for networks built with a custom policy, whose closures cannot be
/// written out.
pub fn to_json(network: &Network) -> Result<String> {
    Ok(serde_json::to_string_pretty(network)?)
}

/// Restores a network from JSON produced by [`to_json`], re-checking every
/// structural invariant.
pub fn from_json(json: &str) -> Result<Network> {
    let raw: RawNetwork = serde_json::from_str(json)?;
    Network::try_from(raw)
}

/// Writes the network to `path`. Nothing is written if serialization fails.
pub fn save_json(network: &Network, path: impl AsRef<Path>) -> Result<()> {
    let json = to_json(network)?;
    fs::write(path.as_ref(), json)?;
    info!("saved network {:?} to {}", network.architecture(), path.as_ref().display());
    Ok(())
}

pub fn load_json(path: impl AsRef<Path>) -> Result<Network> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let raw: RawNetwork = serde_json::from_reader(reader)?;
    let network = Network::try_from(raw)?;
    info!("loaded network {:?} from {}", network.architecture(), path.as_ref().display());
    Ok(network)
}
