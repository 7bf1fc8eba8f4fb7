//! A tradable symbol: the matching engine plus its subscriber sinks,
//! serialized behind a single-writer lock.

use crate::broadcast::{Broadcaster, MarketDataEvent, TradeEvent};
use crate::engine::{Bbo, DepthSnapshot, OrderBook, SubmitResult};
use crate::types::Order;
use tokio::sync::Mutex;

/// Default depth requested when a caller doesn't specify a level count.
pub const DEFAULT_DEPTH: usize = 10;

/// One symbol's book: the engine state behind a mutex, and the
/// broadcaster that fans out every mutation.
///
/// The mutex (rather than the teacher's `RwLock`) reflects that every
/// operation here — even `bbo()`/`depth()` — is O(log n) and cheap, so
/// splitting readers from writers buys nothing; what matters is that
/// sink I/O happens after the lock is released, never while held.
pub struct Book {
    engine: Mutex<OrderBook>,
    broadcaster: Broadcaster,
}

impl Book {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            engine: Mutex::new(OrderBook::new(symbol)),
            broadcaster: Broadcaster::new(),
        }
    }

    /// Accepts one order, matches it, and publishes the resulting
    /// trades and depth snapshot. Returns after every broadcast has
    /// been enqueued.
    ///
    /// The lock is held only while mutating engine state; the snapshot
    /// and trade events are sent to subscribers after it's released so
    /// a slow sink can never stall another submission on this book.
    pub async fn submit(&self, order: Order) -> SubmitResult {
        let symbol = order.symbol.clone();
        let (result, snapshot) = {
            let mut engine = self.engine.lock().await;
            let result = engine.submit(order);
            let snapshot = engine.depth(DEFAULT_DEPTH);
            (result, snapshot)
        };

        for trade in &result.trades {
            self.broadcaster.broadcast_trade(TradeEvent {
                symbol: symbol.clone(),
                trade: trade.clone(),
            });
        }
        self.broadcaster
            .broadcast_market(MarketDataEvent::new(symbol, snapshot));

        result
    }

    pub async fn bbo(&self) -> Bbo {
        self.engine.lock().await.bbo()
    }

    pub async fn depth(&self, k: usize) -> DepthSnapshot {
        self.engine.lock().await.depth(k)
    }

    pub fn attach_market(&self) -> tokio::sync::broadcast::Receiver<MarketDataEvent> {
        self.broadcaster.attach_market()
    }

    pub fn attach_trade(&self) -> tokio::sync::broadcast::Receiver<TradeEvent> {
        self.broadcaster.attach_trade()
    }
}
