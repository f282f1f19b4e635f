/// MNIST digit classification with the plain dense network.
///
/// Architecture: 784 -> 25 -> 25 -> 10, sigmoid, learning rate 0.1
/// Training:     one sequential pass over the training set
///
/// Run with:
///   cargo run --example mnist --release -- <data dir> [limit] [model.json]
///
/// The data directory must hold the four IDX files under their usual names.
/// `limit` caps the number of training images.
use std::path::Path;

use env_logger::Env;
use rand::thread_rng;

use dense_nn::data::load_idx_pair;
use dense_nn::io::save_json;
use dense_nn::{
    evaluate, train_sequential, ActivationFunction, LossFunction, Network, NetworkProperties,
};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let dir = Path::new(args.first().map(String::as_str).unwrap_or("mnist_data"));
    let limit: Option<usize> = args.get(1).map(|n| n.parse().expect("limit must be a number"));

    println!("Loading MNIST data from {}...", dir.display());
    let mut train = load_idx_pair(dir.join("train-images-idx3-ubyte"), dir.join("train-labels-idx1-ubyte"))
        .expect("training set");
    let test = load_idx_pair(dir.join("t10k-images-idx3-ubyte"), dir.join("t10k-labels-idx1-ubyte"))
        .expect("test set");
    if let Some(limit) = limit {
        train.truncate(limit);
    }
    println!("  Training set: {} images", train.len());
    println!("  Test set:     {} images", test.len());

    let properties = NetworkProperties::new(ActivationFunction::Sigmoid, LossFunction::Difference, 0.1);
    let mut network = Network::new(properties, &[train.input_size(), 25, 25, 10]).expect("valid architecture");
    network.initialize(&mut thread_rng()).expect("initialization");

    let train_pairs = train.training_pairs(10).expect("labels 0-9");
    let test_pairs = test.training_pairs(10).expect("labels 0-9");

    let mean_loss = train_sequential(&mut network, &train_pairs).expect("training");
    println!("mean loss over the pass: {:.6}", mean_loss);

    let evaluation = evaluate(&mut network, &test_pairs).expect("evaluation");
    println!(
        "test accuracy: {:.2}% ({} images, mse {:.6})",
        evaluation.accuracy * 100.0,
        evaluation.samples,
        evaluation.mean_squared_error
    );

    if let Some(path) = args.get(2) {
        save_json(&network, path).expect("failed to save model");
        println!("saved to {}", path);
    }
}
