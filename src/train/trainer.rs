use std::time::Instant;

use log::{debug, info};
use rand::Rng;

use crate::error::{NnError, Result};
use crate::loss::mse::{mean_loss, mean_squared_error};
use crate::math::vector::Vector;
use crate::network::network::Network;
use crate::network::operations::output_loss;
use crate::train::evaluation::Evaluation;
use crate::train::train_config::TrainConfig;

/// An input vector and the output the network should produce for it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingPair {
    pub input: Vector,
    pub desired: Vector,
}

impl TrainingPair {
    pub fn new(input: Vector, desired: Vector) -> TrainingPair {
        TrainingPair { input, desired }
    }
}

/// Runs `config.iterations` single-example steps, each on a pair drawn
/// uniformly from `pairs`.
///
/// Returns the mean squared error of the network's output over all steps,
/// measured before each step's weight update.
pub fn train_stochastic<R: Rng + ?Sized>(
    network: &mut Network,
    pairs: &[TrainingPair],
    config: &TrainConfig,
    rng: &mut R,
) -> Result<f64> {
    if pairs.is_empty() {
        return Err(NnError::Dataset("no training pairs".into()));
    }

    let t_start = Instant::now();
    let mut total_error = 0.0;
    let mut window_error = 0.0;

    for i in 1..=config.iterations {
        let pair = &pairs[rng.gen_range(0..pairs.len())];
        network.train(pair.input.clone(), &pair.desired)?;

        let error = mean_squared_error(network.output().nodes(), &pair.desired)?;
        total_error += error;
        window_error += error;

        if config.log_every > 0 && i % config.log_every == 0 {
            info!(
                "iteration {}/{}: mse = {:.6}",
                i,
                config.iterations,
                window_error / config.log_every as f64
            );
            window_error = 0.0;
        }
    }

    info!(
        "trained {} iterations in {} ms",
        config.iterations,
        t_start.elapsed().as_millis()
    );

    if config.iterations == 0 {
        return Ok(0.0);
    }
    Ok(total_error / config.iterations as f64)
}

/// One pass over `pairs` in order, training on each.
///
/// Returns the mean of the raw output loss over the pass.
pub fn train_sequential(network: &mut Network, pairs: &[TrainingPair]) -> Result<f64> {
    if pairs.is_empty() {
        return Err(NnError::Dataset("no training pairs".into()));
    }

    let t_start = Instant::now();
    let mut total = 0.0;

    for (i, pair) in pairs.iter().enumerate() {
        network.train(pair.input.clone(), &pair.desired)?;
        let loss = output_loss(network.output(), &pair.desired, &network.properties().policy)?;
        let avg = mean_loss(&loss);
        debug!("example {}: avg loss {:.6}", i, avg);
        total += avg;
    }

    let mean = total / pairs.len() as f64;
    info!(
        "trained on {} examples in {} ms (mean loss {:.6})",
        pairs.len(),
        t_start.elapsed().as_millis(),
        mean
    );
    Ok(mean)
}

/// Feeds every pair forward without training and summarizes the results.
pub fn evaluate(network: &mut Network, pairs: &[TrainingPair]) -> Result<Evaluation> {
    let mut loss_sum = 0.0;
    let mut mse_sum = 0.0;
    let mut correct = 0usize;

    for pair in pairs {
        let output = network.predict(pair.input.clone())?;
        let loss = output_loss(network.output(), &pair.desired, &network.properties().policy)?;
        loss_sum += mean_loss(&loss);
        mse_sum += mean_squared_error(&output, &pair.desired)?;
        if output.argmax() == pair.desired.argmax() {
            correct += 1;
        }
    }

    let n = pairs.len().max(1) as f64;
    let evaluation = Evaluation {
        samples: pairs.len(),
        mean_loss: loss_sum / n,
        mean_squared_error: mse_sum / n,
        accuracy: correct as f64 / n,
    };
    info!(
        "evaluated {} examples: accuracy {:.2}%, mse {:.6}",
        evaluation.samples,
        evaluation.accuracy * 100.0,
        evaluation.mean_squared_error
    );
    Ok(evaluation)
}
