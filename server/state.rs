use std::env;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rand::thread_rng;
use tiny_http::Server;

use dense_nn::io::load_json;
use dense_nn::{train_stochastic, xor_pairs, Network, NetworkProperties, Result, TrainConfig};

pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";
pub const ADDR_ENV: &str = "DENSE_NN_ADDR";

/// Start-up options. `--addr` wins over `DENSE_NN_ADDR`, which wins over the default.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub addr: String,
    /// Model to serve. Without one a fresh 2-3-1 network is trained on XOR.
    pub model: Option<PathBuf>,
    pub xor_iterations: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: DEFAULT_ADDR.to_owned(),
            model: None,
            xor_iterations: TrainConfig::default().iterations,
        }
    }
}

impl ServerConfig {
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> std::result::Result<ServerConfig, String> {
        let mut config = ServerConfig::default();
        if let Ok(addr) = env::var(ADDR_ENV) {
            config.addr = addr;
        }

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--addr" => config.addr = args.next().ok_or("--addr needs a value")?,
                "--model" => config.model = Some(PathBuf::from(args.next().ok_or("--model needs a path")?)),
                "--iterations" => {
                    let raw = args.next().ok_or("--iterations needs a value")?;
                    config.xor_iterations = raw.parse().map_err(|e| format!("--iterations {}: {}", raw, e))?;
                }
                other => return Err(format!("unknown argument '{}'", other)),
            }
        }
        Ok(config)
    }

    /// Loads the configured model, or trains the XOR network.
    pub fn build_network(&self) -> Result<Network> {
        if let Some(path) = &self.model {
            return load_json(path);
        }

        let mut rng = thread_rng();
        let mut network = Network::new(NetworkProperties::default(), &[2, 3, 1])?;
        network.initialize(&mut rng)?;
        let config = TrainConfig::new(self.xor_iterations);
        train_stochastic(&mut network, &xor_pairs(), &config, &mut rng)?;
        Ok(network)
    }
}

/// The live network plus a handle used to stop the accept loop.
pub struct ServerState {
    pub network: Mutex<Network>,
    pub server: Arc<Server>,
}

pub type SharedState = Arc<ServerState>;

impl ServerState {
    pub fn new(network: Network, server: Arc<Server>) -> SharedState {
        Arc::new(ServerState { network: Mutex::new(network), server })
    }
}
