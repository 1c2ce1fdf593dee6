use chrono::{DateTime, Timelike, Utc};

use crate::models::{Candle, Session};

/// UTC hour boundaries: [0,7) asian, [7,13) london, [13,22) ny, [22,24) asian.
const LONDON_OPEN: u32 = 7;
const NY_OPEN: u32 = 13;
const NY_CLOSE: u32 = 22;
/// From this UTC hour on, the NY session is winding down.
pub const NY_LATE_HOUR: u32 = 20;

pub fn session_at(ts: DateTime<Utc>) -> Session {
    let hour = ts.hour();
    if (LONDON_OPEN..NY_OPEN).contains(&hour) {
        Session::London
    } else if (NY_OPEN..NY_CLOSE).contains(&hour) {
        Session::Ny
    } else {
        Session::Asian
    }
}

/// Session of the latest candle; an empty window falls back to asian.
pub fn detect_session(candles: &[Candle]) -> Session {
    candles
        .last()
        .map(|c| session_at(c.timestamp))
        .unwrap_or(Session::Asian)
}

pub fn is_killzone(session: Session) -> bool {
    matches!(session, Session::London | Session::Ny)
}

pub fn is_late_ny(session: Session, ts: DateTime<Utc>) -> bool {
    session == Session::Ny && ts.hour() >= NY_LATE_HOUR
}
