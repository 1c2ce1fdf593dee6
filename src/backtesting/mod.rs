pub mod data_loader;
pub mod report;
pub mod runner;
pub mod trade;

pub use report::SimulationResult;
pub use runner::run_backtest;
pub use trade::{ExitReason, Trade};
