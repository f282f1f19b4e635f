use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Deserialize};

use crate::activation::activation::ActivationFunction;
use crate::loss::loss_type::LossFunction;

type UnaryFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;
type LossFn = Arc<dyn Fn(f64, f64) -> f64 + Send + Sync>;

/// Caller-supplied activation, output-form derivative and loss functions.
#[derive(Clone)]
pub struct CustomPolicy {
    activation: UnaryFn,
    derivative: UnaryFn,
    loss: LossFn,
}

impl CustomPolicy {
    pub fn new<A, D, L>(activation: A, derivative: D, loss: L) -> CustomPolicy
    where
        A: Fn(f64) -> f64 + Send + Sync + 'static,
        D: Fn(f64) -> f64 + Send + Sync + 'static,
        L: Fn(f64, f64) -> f64 + Send + Sync + 'static,
    {
        CustomPolicy {
            activation: Arc::new(activation),
            derivative: Arc::new(derivative),
            loss: Arc::new(loss),
        }
    }
}

impl fmt::Debug for CustomPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomPolicy { .. }")
    }
}

/// How a network activates its nodes and scores its output.
///
/// `Standard` is identified by name and survives serialization. `Custom`
/// holds closures and is skipped by serde: saving a network that uses it
/// fails rather than writing something that cannot be restored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Policy {
    Standard {
        activation: ActivationFunction,
        loss: LossFunction,
    },
    #[serde(skip)]
    Custom(CustomPolicy),
}

impl Policy {
    pub fn activate(&self, x: f64) -> f64 {
        match self {
            Policy::Standard { activation, .. } => activation.function(x),
            Policy::Custom(c) => (c.activation)(x),
        }
    }

    /// Derivative of the activation in terms of the activated value.
    pub fn activation_derivative(&self, y: f64) -> f64 {
        match self {
            Policy::Standard { activation, .. } => activation.derivative(y),
            Policy::Custom(c) => (c.derivative)(y),
        }
    }

    pub fn loss(&self, actual: f64, desired: f64) -> f64 {
        match self {
            Policy::Standard { loss, .. } => loss.loss(actual, desired),
            Policy::Custom(c) => (c.loss)(actual, desired),
        }
    }
}

impl Default for Policy {
    fn default() -> Self {
        Policy::Standard {
            activation: ActivationFunction::Sigmoid,
            loss: LossFunction::Difference,
        }
    }
}

/// Training-time properties shared by every layer of a network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkProperties {
    pub learning_rate: f64,
    pub policy: Policy,
}

impl NetworkProperties {
    pub fn new(activation: ActivationFunction, loss: LossFunction, learning_rate: f64) -> NetworkProperties {
        NetworkProperties {
            learning_rate,
            policy: Policy::Standard { activation, loss },
        }
    }

    pub fn custom(policy: CustomPolicy, learning_rate: f64) -> NetworkProperties {
        NetworkProperties {
            learning_rate,
            policy: Policy::Custom(policy),
        }
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> NetworkProperties {
        self.learning_rate = learning_rate;
        self
    }
}

/// Sigmoid activation, raw-difference loss, learning rate 1.
impl Default for NetworkProperties {
    fn default() -> Self {
        NetworkProperties {
            learning_rate: 1.0,
            policy: Policy::default(),
        }
    }
}
