use std::path::Path;
use tracing::{info, warn};

use crate::error::Result;
use crate::models::Candle;

/// Load a JSON array of candles, sorted oldest-first with duplicate
/// timestamps removed (the first occurrence wins).
pub fn load_candles(path: &Path) -> Result<Vec<Candle>> {
    let content = std::fs::read_to_string(path)?;
    let candles = parse_candles(&content)?;
    info!("Loaded {} candles from {}", candles.len(), path.display());
    Ok(candles)
}

pub fn parse_candles(json: &str) -> Result<Vec<Candle>> {
    let raw: Vec<Candle> = serde_json::from_str(json)?;
    Ok(clean(raw))
}

fn clean(mut candles: Vec<Candle>) -> Vec<Candle> {
    if !candles.windows(2).all(|w| w[0].timestamp <= w[1].timestamp) {
        warn!("candles out of order, sorting by time");
        // stable, so the first of any duplicate pair stays first
        candles.sort_by_key(|c| c.timestamp);
    }

    let before = candles.len();
    candles.dedup_by(|later, earlier| later.timestamp == earlier.timestamp);
    let dropped = before - candles.len();
    if dropped > 0 {
        warn!("dropped {} candles with duplicate timestamps", dropped);
    }
    candles
}
