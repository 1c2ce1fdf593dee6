use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::kelly::HasPnl;
use crate::models::{Candle, Direction};
use crate::strategies::playbooks::PlaybookName;
use crate::strategies::signals::PlaybookSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    EndOfData,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::StopLoss => write!(f, "STOP_LOSS"),
            ExitReason::TakeProfit => write!(f, "TAKE_PROFIT"),
            ExitReason::EndOfData => write!(f, "END_OF_DATA"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeExit {
    pub exit_time: DateTime<Utc>,
    pub exit_price: f64,
    pub exit_reason: ExitReason,
    pub profit_loss_points: f64,
    pub profit_loss_currency: f64,
}

/// A simulated position. Open while `exit` is `None`; closing produces a
/// new value and the closed trade is never touched again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: usize,
    pub entry_time: DateTime<Utc>,
    pub entry_price: f64,
    pub direction: Direction,
    pub playbook: PlaybookName,
    pub size: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    #[serde(flatten)]
    pub exit: Option<TradeExit>,
    pub signal: PlaybookSignal,
}

impl Trade {
    /// Open at `entry_price` with fixed point offsets for stop and target.
    pub fn open(
        id: usize,
        entry: &Candle,
        signal: PlaybookSignal,
        size: f64,
        stop_loss_points: f64,
        take_profit_points: f64,
    ) -> Self {
        let direction = signal.direction.to_direction();
        let entry_price = entry.close;
        let (stop_loss, take_profit) = match direction {
            Direction::Long => (entry_price - stop_loss_points, entry_price + take_profit_points),
            Direction::Short => (entry_price + stop_loss_points, entry_price - take_profit_points),
        };
        Self {
            id,
            entry_time: entry.timestamp,
            entry_price,
            direction,
            playbook: signal.playbook,
            size,
            stop_loss,
            take_profit,
            exit: None,
            signal,
        }
    }

    pub fn is_open(&self) -> bool {
        self.exit.is_none()
    }

    /// Level and reason if this candle's range reaches the stop or target.
    /// When both are inside the range the stop wins.
    pub fn check_exit(&self, candle: &Candle) -> Option<(f64, ExitReason)> {
        let (stop_hit, target_hit) = match self.direction {
            Direction::Long => (candle.low <= self.stop_loss, candle.high >= self.take_profit),
            Direction::Short => (candle.high >= self.stop_loss, candle.low <= self.take_profit),
        };
        if stop_hit {
            Some((self.stop_loss, ExitReason::StopLoss))
        } else if target_hit {
            Some((self.take_profit, ExitReason::TakeProfit))
        } else {
            None
        }
    }

    pub fn close(self, exit_time: DateTime<Utc>, exit_price: f64, exit_reason: ExitReason) -> Self {
        let points = match self.direction {
            Direction::Long => exit_price - self.entry_price,
            Direction::Short => self.entry_price - exit_price,
        };
        Self {
            exit: Some(TradeExit {
                exit_time,
                exit_price,
                exit_reason,
                profit_loss_points: points,
                profit_loss_currency: points * self.size,
            }),
            ..self
        }
    }

    pub fn profit_loss_currency(&self) -> f64 {
        self.exit.as_ref().map_or(0.0, |e| e.profit_loss_currency)
    }

    pub fn profit_loss_points(&self) -> f64 {
        self.exit.as_ref().map_or(0.0, |e| e.profit_loss_points)
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.exit.as_ref().map(|e| e.exit_reason)
    }

    pub fn is_win(&self) -> bool {
        self.profit_loss_currency() > 0.0
    }
}

impl HasPnl for Trade {
    fn pnl(&self) -> f64 {
        self.profit_loss_currency()
    }

    fn tag(&self) -> &str {
        self.playbook.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bias, Session};
    use crate::test_helpers::make_candles;

    fn signal(direction: Bias) -> PlaybookSignal {
        PlaybookSignal {
            playbook: PlaybookName::Nbb,
            direction,
            context: String::new(),
            tp_logic: String::new(),
            confidence: 85.0,
            session: Session::London,
        }
    }

    #[test]
    fn long_levels_and_take_profit() {
        let candles = make_candles(&[(100.0, 101.0, 99.0, 100.0), (100.0, 121.0, 99.5, 120.0)]);
        let trade = Trade::open(1, &candles[0], signal(Bias::Bullish), 5.0, 10.0, 20.0);
        assert!((trade.stop_loss - 90.0).abs() < 1e-9);
        assert!((trade.take_profit - 120.0).abs() < 1e-9);

        let (price, reason) = trade.check_exit(&candles[1]).unwrap();
        assert_eq!(reason, ExitReason::TakeProfit);
        let closed = trade.close(candles[1].timestamp, price, reason);
        assert!(!closed.is_open());
        assert!((closed.profit_loss_points() - 20.0).abs() < 1e-9);
        assert!((closed.profit_loss_currency() - 100.0).abs() < 1e-9);
        assert!(closed.is_win());
    }

    #[test]
    fn stop_wins_when_bar_spans_both() {
        let candles = make_candles(&[(100.0, 101.0, 99.0, 100.0), (100.0, 125.0, 85.0, 100.0)]);
        let trade = Trade::open(1, &candles[0], signal(Bias::Bullish), 1.0, 10.0, 20.0);
        assert_eq!(
            trade.check_exit(&candles[1]),
            Some((90.0, ExitReason::StopLoss))
        );
    }

    #[test]
    fn short_stop_loss_is_negative() {
        let candles = make_candles(&[(100.0, 101.0, 99.0, 100.0), (100.0, 111.0, 99.0, 110.0)]);
        let trade = Trade::open(1, &candles[0], signal(Bias::Bearish), 2.0, 10.0, 20.0);
        assert_eq!(trade.direction, Direction::Short);
        let (price, reason) = trade.check_exit(&candles[1]).unwrap();
        assert_eq!(reason, ExitReason::StopLoss);
        let closed = trade.close(candles[1].timestamp, price, reason);
        assert!((closed.profit_loss_currency() + 20.0).abs() < 1e-9);
        assert!(!closed.is_win());
    }

    #[test]
    fn quiet_bar_keeps_trade_open() {
        let candles = make_candles(&[(100.0, 101.0, 99.0, 100.0), (100.0, 105.0, 95.0, 101.0)]);
        let trade = Trade::open(1, &candles[0], signal(Bias::Bullish), 1.0, 10.0, 20.0);
        assert!(trade.check_exit(&candles[1]).is_none());
        assert_eq!(trade.profit_loss_currency(), 0.0);
    }
}
