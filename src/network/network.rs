use std::fmt;

use log::debug;
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result, Shape};
use crate::layers::dense::{Boundary, Layer};
use crate::math::vector::Vector;
use crate::network::operations;
use crate::network::properties::NetworkProperties;
use crate::network::results::LayerResult;

/// One weight boundary of the network: the parameters stored on layer `to`
/// that map the nodes of layer `from = to - 1` into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub boundary: usize,
    pub from: usize,
    pub to: usize,
}

/// A fully connected feedforward network: an input layer, any number of
/// hidden layers and an output layer, in that order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawNetwork")]
pub struct Network {
    layers: Vec<Layer>,
    properties: NetworkProperties,
}

/// Unchecked wire form; only becomes a [`Network`] after [`Network::validate`].
#[derive(Deserialize)]
pub(crate) struct RawNetwork {
    layers: Vec<Layer>,
    properties: NetworkProperties,
}

impl TryFrom<RawNetwork> for Network {
    type Error = NnError;

    fn try_from(raw: RawNetwork) -> Result<Network> {
        let network = Network { layers: raw.layers, properties: raw.properties };
        network.validate()?;
        Ok(network)
    }
}

impl Network {
    /// Builds a network from layer sizes, input first and output last.
    /// Call [`Network::initialize`] before running any pass.
    pub fn new(properties: NetworkProperties, architecture: &[usize]) -> Result<Network> {
        if architecture.len() < 2 {
            return Err(NnError::InvalidArchitecture(format!(
                "need at least an input and an output layer, got {} sizes",
                architecture.len()
            )));
        }
        let last = architecture.len() - 1;
        let input = Layer::new(architecture[0], Some("Input"));
        let output = Layer::new(architecture[last], Some("Output"));
        let hidden = architecture[1..last].iter().map(|&size| Layer::new(size, None)).collect();
        Network::from_layers(properties, input, hidden, output)
    }

    pub fn from_layers(
        properties: NetworkProperties,
        input: Layer,
        hidden: Vec<Layer>,
        output: Layer,
    ) -> Result<Network> {
        let mut layers = Vec::with_capacity(hidden.len() + 2);
        layers.push(input);
        layers.extend(hidden);
        layers.push(output);

        if let Some((i, _)) = layers.iter().enumerate().find(|(_, l)| l.size() == 0) {
            return Err(NnError::InvalidArchitecture(format!("layer {} has size 0", i)));
        }
        for (i, layer) in layers.iter_mut().enumerate() {
            layer.set_index(i);
        }

        Ok(Network { layers, properties })
    }

    /// Assigns every layer its index and draws fresh weights and biases for
    /// every boundary. Any previously learned parameters are discarded.
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        for i in 0..self.layers.len() {
            let weights = if i == 0 {
                None
            } else {
                Some(operations::create_weights(&self.layers[i - 1], &self.layers[i], rng))
            };
            self.layers[i].initialize(i, weights, rng)?;
        }
        debug!("initialized network {:?}", self.architecture());
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.layers[1..].iter().all(|l| l.weights().is_some())
    }

    pub fn architecture(&self) -> Vec<usize> {
        self.layers.iter().map(Layer::size).collect()
    }

    /// Number of layers including input and output.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Result<&Layer> {
        let count = self.layers.len();
        self.layers.get(index).ok_or(NnError::InvalidIndex { index, count })
    }

    pub fn input(&self) -> &Layer {
        &self.layers[0]
    }

    pub fn hidden(&self) -> &[Layer] {
        &self.layers[1..self.layers.len() - 1]
    }

    pub fn output(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    pub fn properties(&self) -> &NetworkProperties {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut NetworkProperties {
        &mut self.properties
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// The weight boundaries in forward order; call `.rev()` for the
    /// backward pass.
    pub fn links(&self) -> impl DoubleEndedIterator<Item = Link> + ExactSizeIterator {
        (1..self.layers.len()).map(|to| Link { boundary: to, from: to - 1, to })
    }

    pub fn set_layer_nodes(&mut self, index: usize, nodes: Vector) -> Result<()> {
        let count = self.layers.len();
        self.layers
            .get_mut(index)
            .ok_or(NnError::InvalidIndex { index, count })?
            .set_nodes(nodes)
    }

    pub fn set_input(&mut self, input: Vector) -> Result<()> {
        self.layers[0].set_nodes(input)
    }

    /// Propagates the input layer's nodes through every boundary and returns
    /// the output layer's nodes.
    pub fn feed_forward(&mut self) -> Result<&Vector> {
        for link in self.links() {
            let values = operations::calculate_values(
                &self.layers[link.from],
                &self.layers[link.to],
                &self.properties.policy,
            )?;
            self.layers[link.to].set_nodes(values)?;
        }
        Ok(self.output().nodes())
    }

    pub fn predict(&mut self, input: Vector) -> Result<Vector> {
        self.set_input(input)?;
        Ok(self.feed_forward()?.clone())
    }

    /// Computes the loss of every trainable layer against `desired`, using
    /// the node values left by the last forward pass.
    ///
    /// The output loss comes from the policy's loss function; each earlier
    /// layer's loss is the next layer's loss projected back through the
    /// transposed weights between them. Results are ordered by layer index,
    /// so `results[k]` belongs to layer `k + 1`.
    pub fn calculate_loss(&self, desired: &Vector) -> Result<Vec<LayerResult>> {
        let mut loss = operations::output_loss(self.output(), desired, &self.properties.policy)?;
        let mut results = Vec::with_capacity(self.layers.len() - 1);

        for link in self.links().rev() {
            results.push(LayerResult { index: link.to, loss: loss.clone(), deltas: None });
            if link.from > 0 {
                loss = operations::propagate_loss(&loss, &self.layers[link.to])?;
            }
        }

        results.reverse();
        Ok(results)
    }

    /// Backward pass: computes every loss first, then walks the boundaries
    /// from the output down, applying each weight and bias delta immediately.
    pub fn adjust_weights(&mut self, desired: &Vector) -> Result<Vec<LayerResult>> {
        let mut results = self.calculate_loss(desired)?;
        let learning_rate = self.properties.learning_rate;

        for (link, result) in self.links().rev().zip(results.iter_mut().rev()) {
            let deltas = operations::calculate_deltas(
                &self.layers[link.from],
                &self.layers[link.to],
                &result.loss,
                &self.properties.policy,
                learning_rate,
            )?;
            self.layers[link.to].apply_deltas(&deltas.weights, &deltas.biases)?;
            result.deltas = Some(deltas);
        }

        Ok(results)
    }

    /// One stochastic gradient descent step on a single example.
    ///
    /// Both vectors are checked before the network is touched.
    pub fn train(&mut self, input: Vector, desired: &Vector) -> Result<Vec<LayerResult>> {
        if desired.len() != self.output().size() {
            return Err(NnError::mismatch(
                "desired output",
                desired.shape(),
                Shape::vector(self.output().size()),
            ));
        }
        self.set_input(input)?;
        self.feed_forward()?;
        self.adjust_weights(desired)
    }

    /// Checks the structural invariants a deserialized network may violate.
    /// Every layer after the input must hold weights.
    pub fn validate(&self) -> Result<()> {
        if self.layers.len() < 2 {
            return Err(NnError::InvalidArchitecture(format!(
                "need at least 2 layers, found {}",
                self.layers.len()
            )));
        }

        for (i, layer) in self.layers.iter().enumerate() {
            if layer.size() == 0 {
                return Err(NnError::InvalidArchitecture(format!("layer {} has size 0", i)));
            }
            if layer.index() != i {
                return Err(NnError::InvalidArchitecture(format!(
                    "layer at position {} claims index {}",
                    i,
                    layer.index()
                )));
            }
            if layer.nodes().len() != layer.size() {
                return Err(NnError::mismatch(
                    "layer nodes",
                    layer.nodes().shape(),
                    Shape::vector(layer.size()),
                ));
            }

            match (i, layer.boundary()) {
                (0, Boundary::Weights { .. }) => {
                    return Err(NnError::InvalidArchitecture("input layer cannot hold weights".into()));
                }
                (0, Boundary::Uninitialized) => {}
                (_, Boundary::Uninitialized) => return Err(NnError::Uninitialized { index: i }),
                (_, Boundary::Weights { weights, biases }) => {
                    let expected = Shape::new(layer.size(), self.layers[i - 1].size());
                    if weights.shape() != expected {
                        return Err(NnError::mismatch("layer weights", weights.shape(), expected));
                    }
                    if biases.len() != layer.size() {
                        return Err(NnError::mismatch(
                            "layer biases",
                            biases.shape(),
                            Shape::vector(layer.size()),
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Network {:?} (learning rate {})", self.architecture(), self.properties.learning_rate)?;
        for layer in &self.layers {
            writeln!(f, "{}", layer)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn network(arch: &[usize]) -> Network {
        let mut rng = StdRng::seed_from_u64(42);
        let mut nn = Network::new(NetworkProperties::default(), arch).unwrap();
        nn.initialize(&mut rng).unwrap();
        nn
    }

    #[test]
    fn architecture_must_have_two_nonempty_layers() {
        assert!(Network::new(NetworkProperties::default(), &[3]).is_err());
        assert!(Network::new(NetworkProperties::default(), &[3, 0, 1]).is_err());
    }

    #[test]
    fn layer_split_matches_architecture() {
        let nn = network(&[3, 5, 4, 2]);
        assert_eq!(nn.layer_count(), nn.hidden().len() + 2);
        assert_eq!(nn.input().name(), Some("Input"));
        assert_eq!(nn.output().name(), Some("Output"));
        assert_eq!(nn.hidden().iter().map(Layer::size).collect::<Vec<_>>(), vec![5, 4]);
    }

    #[test]
    fn links_pair_each_boundary_with_its_target_layer() {
        let nn = network(&[3, 5, 2]);
        let links: Vec<Link> = nn.links().collect();
        assert_eq!(
            links,
            vec![Link { boundary: 1, from: 0, to: 1 }, Link { boundary: 2, from: 1, to: 2 }]
        );
        assert_eq!(nn.links().rev().next().unwrap().to, 2);
    }

    #[test]
    fn every_boundary_has_matching_dimensions() {
        let nn = network(&[6, 4, 3, 2]);
        for link in nn.links() {
            let w = nn.layers()[link.to].weights().unwrap();
            assert_eq!(w.rows(), nn.layers()[link.to].size());
            assert_eq!(w.cols(), nn.layers()[link.from].size());
            assert_eq!(nn.layers()[link.to].biases().unwrap().len(), w.rows());
        }
        assert!(nn.input().weights().is_none());
        nn.validate().unwrap();
    }

    #[test]
    fn deserializing_checks_structure() {
        let json = r#"{"layers":[],"properties":{"learning_rate":1.0,"policy":{"kind":"standard","activation":"sigmoid","loss":"difference"}}}"#;
        assert!(serde_json::from_str::<Network>(json).is_err());

        let nn = network(&[2, 2]);
        let back: Network = serde_json::from_str(&serde_json::to_string(&nn).unwrap()).unwrap();
        assert_eq!(back.architecture(), vec![2, 2]);
    }

    #[test]
    fn validate_requires_weights_after_input() {
        let nn = Network::new(NetworkProperties::default(), &[2, 3, 1]).unwrap();
        assert!(matches!(nn.validate(), Err(NnError::Uninitialized { index: 1 })));
    }

    #[test]
    fn feed_forward_before_initialize_fails() {
        let mut nn = Network::new(NetworkProperties::default(), &[2, 2]).unwrap();
        assert!(!nn.is_initialized());
        assert!(matches!(nn.feed_forward(), Err(NnError::Uninitialized { index: 1 })));
    }

    #[test]
    fn calculate_loss_covers_trainable_layers_only() {
        let mut nn = network(&[3, 4, 2]);
        nn.feed_forward().unwrap();
        let results = nn.calculate_loss(&Vector::new(vec![1.0, 0.0])).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].index, 1);
        assert_eq!(results[0].loss.len(), 4);
        assert_eq!(results[1].index, 2);
        assert_eq!(results[1].loss.len(), 2);
        assert!(results.iter().all(|r| r.deltas.is_none()));
    }

    #[test]
    fn output_loss_is_desired_minus_actual() {
        let mut nn = network(&[2, 1]);
        let out = nn.feed_forward().unwrap()[0];
        let results = nn.calculate_loss(&Vector::new(vec![1.0])).unwrap();
        assert_eq!(results[0].loss[0], 1.0 - out);
    }

    #[test]
    fn adjust_weights_adds_the_reported_deltas() {
        let mut nn = network(&[2, 3, 1]);
        nn.set_input(Vector::new(vec![1.0, 0.0])).unwrap();
        nn.feed_forward().unwrap();
        let before: Vec<_> = nn.layers()[1..].iter().map(|l| l.weights().unwrap().clone()).collect();

        let results = nn.adjust_weights(&Vector::new(vec![1.0])).unwrap();
        for (result, old) in results.iter().zip(before.iter()) {
            let deltas = result.deltas.as_ref().unwrap();
            let layer = result.layer(&nn).unwrap();
            assert_eq!(deltas.weights.shape(), old.shape());
            assert_eq!(layer.weights().unwrap(), &old.add(&deltas.weights).unwrap());
        }
    }

    #[test]
    fn train_rejects_bad_shapes_without_touching_input() {
        let mut nn = network(&[2, 3, 1]);
        let before = nn.input().nodes().clone();
        assert!(nn.train(Vector::new(vec![0.0, 1.0]), &Vector::new(vec![1.0, 0.0])).is_err());
        assert!(nn.train(Vector::new(vec![0.0, 1.0, 2.0]), &Vector::new(vec![1.0])).is_err());
        assert_eq!(nn.input().nodes(), &before);
    }

    #[test]
    fn layer_lookup_reports_invalid_index() {
        let mut nn = network(&[2, 1]);
        assert!(matches!(nn.layer(2), Err(NnError::InvalidIndex { index: 2, count: 2 })));
        assert!(matches!(
            nn.set_layer_nodes(5, Vector::zeros(1)),
            Err(NnError::InvalidIndex { .. })
        ));
    }
}
