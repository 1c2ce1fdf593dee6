pub mod balance;
pub mod kelly;
pub mod liquidity;
pub mod market_maker;
pub mod pd_arrays;
pub mod premium_discount;
pub mod sessions;
pub mod structure;
pub mod trend;
pub mod trendline;
pub mod volume;
