//! Thin wrapper over `orderbook::BookRegistry`, translating engine
//! results into the gateway's wire types and pre-populating a default
//! symbol set for demo purposes.
//!
//! # Concurrency Model
//! `BookRegistry` is lock-free for symbol lookup/creation; each `Book`
//! serializes its own submissions behind a single-writer mutex. This
//! module adds nothing on top — it only shapes responses.

use orderbook::{Bbo, BookRegistry, Order, Trade};

use crate::types::DepthWire;

/// Default depth returned when a caller doesn't specify `k`.
const DEFAULT_DEPTH: usize = 10;

/// Gateway-facing view over the shared book registry.
pub struct Exchange {
    registry: BookRegistry,
}

impl Exchange {
    /// Creates a new exchange with a handful of symbols pre-registered
    /// so the dashboard has something to show before any order arrives.
    pub fn new() -> Self {
        let registry = BookRegistry::new();
        for symbol in ["AAPL", "TSLA", "MSFT", "NVDA", "GOOGL"] {
            registry.get_or_create(symbol);
        }
        Self { registry }
    }

    /// All symbols referenced so far, arbitrary order.
    pub async fn list_symbols(&self) -> Vec<String> {
        self.registry.symbols()
    }

    /// Best bid/ask for a symbol. Auto-creates the book on first touch,
    /// so this always answers — a symbol with no resting orders simply
    /// returns `{bid: null, ask: null}`.
    pub async fn bbo(&self, symbol: &str) -> Bbo {
        self.registry.get_or_create(symbol).bbo().await
    }

    /// Top-`k` aggregated depth for a symbol, shaped for the wire.
    pub async fn depth(&self, symbol: &str, k: Option<usize>) -> DepthWire {
        let book = self.registry.get_or_create(symbol);
        let snapshot = book.depth(k.unwrap_or(DEFAULT_DEPTH)).await;
        DepthWire::new(symbol.to_string(), snapshot)
    }

    /// Submits an order to its symbol's book, creating the book if this
    /// is the symbol's first order.
    pub async fn submit_order(&self, order: Order) -> (Vec<Trade>, Bbo) {
        let book = self.registry.get_or_create(&order.symbol);
        let result = book.submit(order).await;
        (result.trades, result.bbo)
    }

    /// Attaches a fresh market-data subscriber to a symbol's book.
    pub fn attach_market(
        &self,
        symbol: &str,
    ) -> tokio::sync::broadcast::Receiver<orderbook::MarketDataEvent> {
        self.registry.get_or_create(symbol).attach_market()
    }

    /// Attaches a fresh trade subscriber to a symbol's book.
    pub fn attach_trade(
        &self,
        symbol: &str,
    ) -> tokio::sync::broadcast::Receiver<orderbook::TradeEvent> {
        self.registry.get_or_create(symbol).attach_trade()
    }
}

impl Default for Exchange {
    fn default() -> Self {
        Self::new()
    }
}
