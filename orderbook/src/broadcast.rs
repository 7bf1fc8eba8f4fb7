//! Subscriber fan-out: two independent broadcast channels per book
//! (market data, trades). Slow subscribers lag and drop rather than
//! blocking the match loop.

use crate::engine::DepthSnapshot;
use crate::types::Trade;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

/// Default bounded capacity for a book's sink channels, following the
/// teacher's `broadcast::channel(1000)` sizing for a single shared
/// trade feed, scaled down slightly now that every symbol gets its own
/// pair of channels instead of sharing one.
pub const DEFAULT_SINK_CAPACITY: usize = 1024;

/// A depth snapshot tagged with the symbol and capture time, the
/// payload pushed to market-data subscribers after every mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct MarketDataEvent {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub bids: Vec<(f64, f64)>,
    pub asks: Vec<(f64, f64)>,
}

impl MarketDataEvent {
    pub fn new(symbol: String, snapshot: DepthSnapshot) -> Self {
        Self {
            symbol,
            timestamp: snapshot.timestamp,
            bids: snapshot.bids,
            asks: snapshot.asks,
        }
    }
}

/// A single execution, tagged for trade subscribers.
#[derive(Clone, Debug, PartialEq)]
pub struct TradeEvent {
    pub symbol: String,
    pub trade: Trade,
}

/// Owns a book's two subscriber sink sets.
///
/// There is no explicit `detach`: a `Receiver` unsubscribes by being
/// dropped, the idiomatic `tokio::sync::broadcast` pattern. A
/// subscriber that falls behind receives `RecvError::Lagged` on its
/// next `recv()` rather than blocking the sender — drop-oldest, so the
/// adapter logs the gap and keeps forwarding subsequent events rather
/// than stalling the book on a slow sink.
pub struct Broadcaster {
    market: broadcast::Sender<MarketDataEvent>,
    trade: broadcast::Sender<TradeEvent>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SINK_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (market, _) = broadcast::channel(capacity);
        let (trade, _) = broadcast::channel(capacity);
        Self { market, trade }
    }

    /// Registers a new market-data subscriber.
    pub fn attach_market(&self) -> broadcast::Receiver<MarketDataEvent> {
        self.market.subscribe()
    }

    /// Registers a new trade subscriber.
    pub fn attach_trade(&self) -> broadcast::Receiver<TradeEvent> {
        self.trade.subscribe()
    }

    /// Sends a depth snapshot to every market sink. A send with zero
    /// live receivers is not an error — it simply means nobody is
    /// listening right now.
    pub fn broadcast_market(&self, event: MarketDataEvent) {
        let _ = self.market.send(event);
    }

    /// Sends one trade event to every trade sink.
    pub fn broadcast_trade(&self, event: TradeEvent) {
        let _ = self.trade.send(event);
    }

    pub fn market_subscriber_count(&self) -> usize {
        self.market.receiver_count()
    }

    pub fn trade_subscriber_count(&self) -> usize {
        self.trade.receiver_count()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}
