//! Request-level control of a live network, independent of any transport.

pub mod command;
pub mod form;

pub use command::{status_for, Command, Reply};
