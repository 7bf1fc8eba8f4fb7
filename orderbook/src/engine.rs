//! Per-symbol matching engine: order-type dispatch, the match loop, and
//! trade recording.

use crate::price_levels::PriceLevels;
use crate::types::{Order, OrderBookEntry, OrderType, Side, Trade};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Best bid/best ask, with no sizes. What `submit()` hands back to
/// callers and what the HTTP `/bbo/{symbol}` endpoint serves.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bbo {
    pub bid: Option<f64>,
    pub ask: Option<f64>,
}

/// Top-k aggregated levels on each side, plus a capture timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthSnapshot {
    pub bids: Vec<(f64, f64)>,
    pub asks: Vec<(f64, f64)>,
    pub timestamp: DateTime<Utc>,
}

/// Result of a single `submit()` call.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitResult {
    pub trades: Vec<Trade>,
    pub bbo: Bbo,
}

/// A single symbol's central limit order book.
///
/// Not thread-safe on its own — the registry wraps each instance in a
/// `tokio::sync::Mutex` so that submissions to one symbol serialize
/// while different symbols proceed independently.
pub struct OrderBook {
    symbol: String,
    bids: PriceLevels,
    asks: PriceLevels,
    trades: Vec<Trade>,
}

impl OrderBook {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            bids: PriceLevels::new(Side::Buy),
            asks: PriceLevels::new(Side::Sell),
            trades: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn best_bid(&self) -> Option<f64> {
        self.bids.best_price()
    }

    pub fn best_ask(&self) -> Option<f64> {
        self.asks.best_price()
    }

    pub fn bbo(&self) -> Bbo {
        Bbo {
            bid: self.best_bid(),
            ask: self.best_ask(),
        }
    }

    /// Top-`k` aggregated levels on both sides, best level first.
    pub fn depth(&self, k: usize) -> DepthSnapshot {
        DepthSnapshot {
            bids: self.bids.depth(k),
            asks: self.asks.depth(k),
            timestamp: Utc::now(),
        }
    }

    pub fn trade_log(&self) -> &[Trade] {
        &self.trades
    }

    fn side_mut(&mut self, side: Side) -> &mut PriceLevels {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Does `price` cross the contra side's best level for `taker_side`?
    /// Buy crosses when its price is at or above the best ask; sell
    /// crosses when its price is at or below the best bid.
    fn crosses(taker_side: Side, taker_price: f64, contra_best: f64) -> bool {
        match taker_side {
            Side::Buy => taker_price >= contra_best,
            Side::Sell => taker_price <= contra_best,
        }
    }

    /// Shared match loop. `price_limit` is `None` for MARKET orders
    /// (no price constraint); `Some(price)` for LIMIT/IOC/FOK.
    ///
    /// Mutates `taker` in place and returns trades in best-to-worst
    /// price order, front-of-queue-first within a level.
    fn match_loop(&mut self, taker: &mut Order, price_limit: Option<f64>) -> Vec<Trade> {
        let mut trades = Vec::new();
        let contra_side = taker.side.contra();

        loop {
            if taker.quantity <= 0.0 {
                break;
            }
            let contra = self.side_mut(contra_side);
            let Some(best_price) = contra.best_price() else {
                break;
            };
            if let Some(limit) = price_limit {
                if !Self::crosses(taker.side, limit, best_price) {
                    break;
                }
            }

            let (level_price, queue) = contra.best_queue_mut().expect("best_price implies a queue");
            while let Some(front) = queue.front_mut() {
                if taker.quantity <= 0.0 {
                    break;
                }
                let traded = taker.quantity.min(front.quantity);

                trades.push(Trade::new(
                    taker.symbol.clone(),
                    level_price,
                    traded,
                    front.order_id,
                    taker.id,
                    taker.side,
                ));

                front.quantity -= traded;
                taker.quantity -= traded;

                if front.quantity <= 0.0 {
                    queue.pop_front();
                } else {
                    break;
                }
            }
            contra.remove_if_empty(level_price);
        }

        trades
    }

    /// Feasibility pre-check for FOK: traverse the contra side
    /// level-by-level from best inward, summing quantity at levels that
    /// cross the limit, until the cumulative sum covers the order or a
    /// level fails to cross (or the book runs out).
    fn can_fully_match(&self, taker: &Order) -> bool {
        let contra = match taker.side {
            Side::Buy => &self.asks,
            Side::Sell => &self.bids,
        };

        let mut total = 0.0;
        for (price, queue) in contra.iterate_levels() {
            if !Self::crosses(taker.side, taker.price, price) {
                break;
            }
            total += queue.iter().map(|e| e.quantity).sum::<f64>();
            if total >= taker.quantity {
                return true;
            }
        }
        false
    }

    /// Accepts one order, dispatches on its type, and returns the
    /// trades produced plus the post-submit BBO. Trades are always
    /// produced before the BBO is captured, per the ordering guarantee
    /// that within one submission all trades precede the final
    /// snapshot.
    pub fn submit(&mut self, mut order: Order) -> SubmitResult {
        let trades = match order.order_type {
            OrderType::Market => self.match_loop(&mut order, None),
            OrderType::Limit => {
                let limit = order.price;
                let trades = self.match_loop(&mut order, Some(limit));
                if order.quantity > 0.0 {
                    self.side_mut(order.side)
                        .push(OrderBookEntry::from_order(&order));
                }
                trades
            }
            OrderType::Ioc => {
                let limit = order.price;
                let trades = self.match_loop(&mut order, Some(limit));
                if order.quantity > 0.0 {
                    tracing::debug!(
                        symbol = %self.symbol,
                        order_id = %order.id,
                        residual = order.quantity,
                        "ioc residual dropped"
                    );
                }
                trades
            }
            OrderType::Fok => {
                if self.can_fully_match(&order) {
                    let limit = order.price;
                    self.match_loop(&mut order, Some(limit))
                } else {
                    tracing::debug!(
                        symbol = %self.symbol,
                        order_id = %order.id,
                        quantity = order.quantity,
                        "fok rejected: infeasible"
                    );
                    Vec::new()
                }
            }
        };

        self.trades.extend(trades.iter().cloned());

        SubmitResult {
            trades,
            bbo: self.bbo(),
        }
    }
}
