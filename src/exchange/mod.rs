pub mod historical;

pub use historical::HistoricalFeed;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Candle;

/// Anything that yields candles oldest-first: a replay file, a broker
/// websocket, a polling REST client.
#[async_trait]
pub trait CandleSource: Send {
    /// The next closed candle, or `None` once the source is exhausted.
    async fn next_candle(&mut self) -> Result<Option<Candle>>;
}
