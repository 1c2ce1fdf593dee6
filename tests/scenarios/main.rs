//! Literal candle sequences, one per playbook, run through the full
//! analysis pipeline with the default playbook table.

#[path = "../common/mod.rs"]
mod common;

mod fabio;
mod jadecap;
mod nbb;
mod tori;

use flowrex::config::PlaybookSettings;
use flowrex::models::CandleSeries;
use flowrex::pipeline::{analyze, Analysis};

pub fn analyze_default(candles: &CandleSeries) -> Analysis {
    analyze(
        candles.as_slice(),
        None,
        None,
        &PlaybookSettings::default(),
        &common::metadata(),
    )
    .unwrap()
}
