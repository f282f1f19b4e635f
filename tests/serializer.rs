use approx::assert_relative_eq;
use rand::{rngs::StdRng, SeedableRng};

use dense_nn::io::{from_json, load_json, save_json, to_json};
use dense_nn::{ActivationFunction, LossFunction, Network, NetworkProperties, NnError, Vector};

fn network() -> Network {
    let props = NetworkProperties::new(ActivationFunction::Tanh, LossFunction::Difference, 0.3);
    let mut nn = Network::new(props, &[3, 4, 2]).unwrap();
    nn.initialize(&mut StdRng::seed_from_u64(17)).unwrap();
    nn
}

#[test]
fn saved_network_predicts_the_same() {
    let mut original = network();
    let path = std::env::temp_dir().join(format!("dense-nn-roundtrip-{}.json", std::process::id()));
    save_json(&original, &path).unwrap();
    let mut restored = load_json(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(restored.architecture(), original.architecture());
    assert_relative_eq!(restored.properties().learning_rate, 0.3);
    for (a, b) in original.layers()[1..].iter().zip(restored.layers()[1..].iter()) {
        let (wa, wb) = (a.weights().unwrap(), b.weights().unwrap());
        assert_eq!(wa.shape(), wb.shape());
        for r in 0..wa.rows() {
            for c in 0..wa.cols() {
                assert_relative_eq!(wa[(r, c)], wb[(r, c)], max_relative = 1e-12);
            }
        }
    }

    let input = Vector::new(vec![0.1, 0.5, -0.7]);
    let a = original.predict(input.clone()).unwrap();
    let b = restored.predict(input).unwrap();
    for (x, y) in a.iter().zip(b.iter()) {
        assert_relative_eq!(*x, *y, max_relative = 1e-12);
    }
}

#[test]
fn json_text_round_trip_keeps_layer_names() {
    let json = to_json(&network()).unwrap();
    assert!(json.contains("\"tanh\""));
    let restored = from_json(&json).unwrap();
    assert_eq!(restored.input().name(), Some("Input"));
    assert_eq!(restored.output().name(), Some("Output"));
}

#[test]
fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("dense-nn-does-not-exist.json");
    assert!(matches!(load_json(&path), Err(NnError::Io(_))));
}
