/// XOR with a 2-3-1 sigmoid network trained by single random examples.
///
/// Run with:
///   cargo run --example xor --release [-- model.json]
///
/// Passing a path saves the trained network as JSON.
use env_logger::Env;
use rand::thread_rng;

use dense_nn::io::save_json;
use dense_nn::{evaluate, train_stochastic, xor_pairs, Network, NetworkProperties, TrainConfig};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut rng = thread_rng();
    let mut network = Network::new(NetworkProperties::default(), &[2, 3, 1]).expect("valid architecture");
    network.initialize(&mut rng).expect("initialization");

    let pairs = xor_pairs();
    let config = TrainConfig::new(50_000).with_log_every(5_000);
    let mse = train_stochastic(&mut network, &pairs, &config, &mut rng).expect("training");
    println!("mean squared error over training: {:.6}", mse);

    for pair in &pairs {
        let output = network.predict(pair.input.clone()).expect("prediction");
        println!("{} -> {:.4} (want {})", pair.input, output[0], pair.desired[0]);
    }

    let evaluation = evaluate(&mut network, &pairs).expect("evaluation");
    println!("final mse: {:.6}", evaluation.mean_squared_error);

    if let Some(path) = std::env::args().nth(1) {
        save_json(&network, &path).expect("failed to save model");
        println!("saved to {}", path);
    }
}
