/// dense-nn control server
///
/// Serves a single network over plain HTTP so it can be inspected and
/// trained from a browser or `curl`.
///
/// Run with:
///   cargo run --bin nn-server -- [--addr HOST:PORT] [--model model.json]
///
/// Routes (all GET):
///   /nn/get/?index=I               layer I as text
///   /nn/set/?index=I&vector=a,b,.. overwrite the nodes of layer I
///   /nn/feedforward/               run a forward pass, reply with the output
///   /nn/train/?input=..&desired=.. one training step
///   /nn/stop/                      shut the server down

mod routes;
mod state;

use std::process;
use std::sync::Arc;

use env_logger::Env;
use log::{error, info};
use tiny_http::Server;

use state::{ServerConfig, ServerState};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match ServerConfig::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(msg) => {
            error!("{}", msg);
            process::exit(2);
        }
    };

    let network = match config.build_network() {
        Ok(network) => network,
        Err(err) => {
            error!("could not prepare the network: {}", err);
            process::exit(1);
        }
    };
    info!("serving network {:?}", network.architecture());

    let server = match Server::http(&config.addr) {
        Ok(server) => Arc::new(server),
        Err(err) => {
            error!("failed to bind {}: {}", config.addr, err);
            process::exit(1);
        }
    };
    let state = ServerState::new(network, server.clone());

    info!("listening on http://{}", config.addr);

    // One thread per request; the network itself is behind a mutex.
    for request in server.incoming_requests() {
        let state = state.clone();
        std::thread::spawn(move || {
            routes::dispatch(request, state);
        });
    }

    info!("server stopped");
}
