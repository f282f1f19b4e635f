use log::{debug, warn};

use crate::control::form::{parse_query, query_get};
use crate::error::{NnError, Result};
use crate::math::vector::Vector;
use crate::network::network::Network;

/// An operation the control front-end can run against a live network.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// String form of the layer at `index`.
    GetLayer { index: usize },
    /// Overwrite the nodes of the layer at `index`.
    SetLayer { index: usize, nodes: Vector },
    /// Run one forward pass and report the output nodes.
    FeedForward,
    /// One training step. Without `input` the current input nodes are used.
    Train { input: Option<Vector>, desired: Vector },
    /// Ask the server to shut down.
    Stop,
}

/// What a successfully executed command sends back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// Sent once; the server stops accepting requests afterwards.
    Stopping(String),
}

impl Reply {
    pub fn body(&self) -> &str {
        match self {
            Reply::Text(body) | Reply::Stopping(body) => body,
        }
    }
}

fn required<'a>(pairs: &'a [(String, String)], key: &str) -> Result<&'a str> {
    query_get(pairs, key).ok_or_else(|| NnError::parse("", format!("missing query parameter '{}'", key)))
}

fn parse_index(pairs: &[(String, String)]) -> Result<usize> {
    let raw = required(pairs, "index")?;
    raw.trim().parse::<usize>().map_err(|e| NnError::parse(raw, e))
}

impl Command {
    /// Maps a request path and raw query string onto a command.
    ///
    /// Paths live under `/nn/` and a trailing slash is optional. Returns
    /// `Ok(None)` for a path that names no command.
    pub fn from_request(path: &str, query: &str) -> Result<Option<Command>> {
        let pairs = parse_query(query);
        let route = path.trim_end_matches('/');

        let command = match route {
            "/nn/get" => Command::GetLayer { index: parse_index(&pairs)? },
            "/nn/set" => Command::SetLayer {
                index: parse_index(&pairs)?,
                nodes: required(&pairs, "vector")?.parse::<Vector>()?,
            },
            "/nn/feedforward" => Command::FeedForward,
            "/nn/train" => Command::Train {
                input: query_get(&pairs, "input").map(str::parse::<Vector>).transpose()?,
                desired: required(&pairs, "desired")?.parse::<Vector>()?,
            },
            "/nn/stop" => Command::Stop,
            _ => return Ok(None),
        };
        Ok(Some(command))
    }

    /// Runs the command. Index and shape errors leave the network unchanged.
    pub fn execute(&self, network: &mut Network) -> Result<Reply> {
        debug!("executing {:?}", self);
        match self {
            Command::GetLayer { index } => Ok(Reply::Text(network.layer(*index)?.to_string())),
            Command::SetLayer { index, nodes } => {
                network.set_layer_nodes(*index, nodes.clone())?;
                Ok(Reply::Text(nodes.to_string()))
            }
            Command::FeedForward => Ok(Reply::Text(network.feed_forward()?.to_string())),
            Command::Train { input, desired } => {
                let input = input.clone().unwrap_or_else(|| network.input().nodes().clone());
                let results = network.train(input, desired)?;
                let body = results.iter().map(|r| r.to_string()).collect::<Vec<_>>().join("\n\n");
                Ok(Reply::Text(format!("Output {}\n\n{}", network.output().nodes(), body)))
            }
            Command::Stop => Ok(Reply::Stopping("stopping..".to_owned())),
        }
    }
}

/// HTTP status code used to report `err` to a control client.
pub fn status_for(err: &NnError) -> u16 {
    let status = match err {
        NnError::Parse { .. }
        | NnError::InvalidIndex { .. }
        | NnError::DimensionMismatch { .. }
        | NnError::Uninitialized { .. } => 400,
        _ => 500,
    };
    warn!("request failed ({}): {}", status, err);
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::properties::NetworkProperties;
    use rand::{rngs::StdRng, SeedableRng};

    fn network() -> Network {
        let mut nn = Network::new(NetworkProperties::default(), &[2, 3, 1]).unwrap();
        nn.initialize(&mut StdRng::seed_from_u64(6)).unwrap();
        nn
    }

    #[test]
    fn parses_every_route() {
        assert_eq!(
            Command::from_request("/nn/get/", "index=1").unwrap(),
            Some(Command::GetLayer { index: 1 })
        );
        assert_eq!(
            Command::from_request("/nn/set", "index=0&vector=0.5%2C1").unwrap(),
            Some(Command::SetLayer { index: 0, nodes: Vector::new(vec![0.5, 1.0]) })
        );
        assert_eq!(Command::from_request("/nn/feedforward/", "").unwrap(), Some(Command::FeedForward));
        assert_eq!(
            Command::from_request("/nn/train/", "desired=1").unwrap(),
            Some(Command::Train { input: None, desired: Vector::new(vec![1.0]) })
        );
        assert_eq!(Command::from_request("/nn/stop/", "").unwrap(), Some(Command::Stop));
        assert_eq!(Command::from_request("/elsewhere", "").unwrap(), None);
    }

    #[test]
    fn malformed_queries_are_parse_errors() {
        assert!(matches!(Command::from_request("/nn/get/", ""), Err(NnError::Parse { .. })));
        assert!(matches!(Command::from_request("/nn/get/", "index=-1"), Err(NnError::Parse { .. })));
        assert!(matches!(
            Command::from_request("/nn/set/", "index=0&vector=1,x"),
            Err(NnError::Parse { .. })
        ));
    }

    #[test]
    fn set_then_feed_forward_then_get() {
        let mut nn = network();
        Command::SetLayer { index: 0, nodes: Vector::new(vec![1.0, 0.0]) }.execute(&mut nn).unwrap();
        let out = Command::FeedForward.execute(&mut nn).unwrap();
        assert_eq!(out.body(), nn.output().nodes().to_string());

        let layer = Command::GetLayer { index: 0 }.execute(&mut nn).unwrap();
        assert!(layer.body().starts_with("Layer Input"));
    }

    #[test]
    fn bad_index_and_length_are_reported_not_fatal() {
        let mut nn = network();
        let err = Command::GetLayer { index: 9 }.execute(&mut nn).unwrap_err();
        assert_eq!(status_for(&err), 400);

        let err = Command::SetLayer { index: 1, nodes: Vector::zeros(2) }.execute(&mut nn).unwrap_err();
        assert!(matches!(err, NnError::DimensionMismatch { .. }));
        assert_eq!(status_for(&err), 400);
        assert_eq!(nn.layers()[1].nodes().len(), 3);
    }

    #[test]
    fn train_and_stop() {
        let mut nn = network();
        let reply = Command::Train { input: Some(Vector::new(vec![0.0, 1.0])), desired: Vector::new(vec![1.0]) }
            .execute(&mut nn)
            .unwrap();
        assert!(reply.body().contains("Layer Result (2)"));
        assert!(matches!(Command::Stop.execute(&mut nn).unwrap(), Reply::Stopping(_)));
    }
}
