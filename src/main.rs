/// dense-nn command-line tool
///
/// Usage:
///   dense-nn info <model.json>
///   dense-nn predict <model.json> <image>
///
/// `predict` scales the image to a square whose side is the square root of
/// the model's input size (28 for MNIST-shaped models) and prints the output
/// vector and the index of its largest element.
use std::process;

use env_logger::Env;
use log::error;

use dense_nn::data::load_image_input;
use dense_nn::io::load_json;
use dense_nn::{NnError, Result};

const USAGE: &str = "usage: dense-nn info <model.json> | dense-nn predict <model.json> <image>";

fn info(model: &str) -> Result<()> {
    let network = load_json(model)?;
    println!("architecture: {:?}", network.architecture());
    println!("learning rate: {}", network.properties().learning_rate);
    println!("{}", network);
    Ok(())
}

fn predict(model: &str, image: &str) -> Result<()> {
    let mut network = load_json(model)?;
    let input_size = network.input().size();
    let side = (input_size as f64).sqrt().round() as usize;
    if side * side != input_size {
        return Err(NnError::InvalidArchitecture(format!(
            "input layer of {} nodes is not a square image",
            input_size
        )));
    }

    let input = load_image_input(image, side as u32, side as u32)?;
    let output = network.predict(input)?;
    println!("output: {}", output);
    match output.argmax() {
        Some(class) => println!("prediction: {}", class),
        None => println!("prediction: none"),
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let outcome = match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["info", model] => info(model),
        ["predict", model, image] => predict(model, image),
        _ => {
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };

    if let Err(err) = outcome {
        error!("{}", err);
        process::exit(1);
    }
}
