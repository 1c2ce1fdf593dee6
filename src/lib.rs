pub mod backtesting;
pub mod config;
pub mod core;
pub mod error;
pub mod exchange;
pub mod models;
pub mod pipeline;
pub mod stream;
pub mod strategies;
pub mod telemetry;
#[cfg(test)]
pub mod test_helpers;

pub use error::{Error, Result};
