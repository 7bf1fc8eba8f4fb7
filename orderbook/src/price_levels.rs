//! One side of a book: an ordered map from price to a FIFO queue of
//! resting entries, with cheap access to the best (most aggressive)
//! level.

use crate::types::{OrderBookEntry, OrderId, Side};
use ordered_float::OrderedFloat;
use std::collections::{BTreeMap, VecDeque};

type PriceKey = OrderedFloat<f64>;

/// FIFO queue of entries resting at a single price level.
pub type PriceLevelQueue = VecDeque<OrderBookEntry>;

/// One side of an order book: bids sorted descending, asks ascending.
///
/// Internally a `BTreeMap` is always kept in ascending key order; the
/// `side` tag only changes which end of the map counts as "best" (the
/// map's last key for bids, first key for asks).
pub struct PriceLevels {
    side: Side,
    levels: BTreeMap<PriceKey, PriceLevelQueue>,
}

impl PriceLevels {
    /// Creates empty price levels for the given side.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Returns the best (most aggressive) price for this side, if any
    /// level is resting.
    pub fn best_price(&self) -> Option<f64> {
        match self.side {
            Side::Sell => self.levels.keys().next().map(|k| k.0),
            Side::Buy => self.levels.keys().next_back().map(|k| k.0),
        }
    }

    /// Returns a mutable reference to the best level's queue, if any.
    pub fn best_queue_mut(&mut self) -> Option<(f64, &mut PriceLevelQueue)> {
        let px = self.best_price()?;
        self.levels.get_mut(&OrderedFloat(px)).map(|q| (px, q))
    }

    /// Returns the FIFO queue at `price`, creating an empty one if
    /// absent.
    pub fn level_mut(&mut self, price: f64) -> &mut PriceLevelQueue {
        self.levels.entry(OrderedFloat(price)).or_default()
    }

    /// Pushes a resting entry to the tail of its price's queue.
    pub fn push(&mut self, entry: OrderBookEntry) {
        self.level_mut(entry.price).push_back(entry);
    }

    /// Removes the level at `price` if its queue is empty. Call after
    /// draining a level's front entry to zero quantity.
    pub fn remove_if_empty(&mut self, price: f64) {
        let key = OrderedFloat(price);
        if self.levels.get(&key).is_some_and(|q| q.is_empty()) {
            self.levels.remove(&key);
        }
    }

    /// Ordered traversal of (price, queue) from best to worst, for
    /// fill-or-kill feasibility checks and depth snapshots.
    pub fn iterate_levels(&self) -> Box<dyn Iterator<Item = (f64, &PriceLevelQueue)> + '_> {
        match self.side {
            Side::Sell => Box::new(self.levels.iter().map(|(k, q)| (k.0, q))),
            Side::Buy => Box::new(self.levels.iter().rev().map(|(k, q)| (k.0, q))),
        }
    }

    /// Total resting quantity across every level on this side.
    pub fn total_quantity(&self) -> f64 {
        self.levels
            .values()
            .flat_map(|q| q.iter())
            .map(|e| e.quantity)
            .sum()
    }

    /// Number of distinct price levels currently resting.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// True if no resting quantity remains on this side.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Top `k` levels with aggregated quantity, best level first.
    pub fn depth(&self, k: usize) -> Vec<(f64, f64)> {
        self.iterate_levels()
            .take(k)
            .map(|(px, q)| (px, q.iter().map(|e| e.quantity).sum()))
            .collect()
    }

    /// Finds a resting entry's remaining quantity by id, for tests and
    /// conservation checks. O(n) — not on the matching hot path.
    #[cfg(test)]
    pub fn find(&self, id: OrderId) -> Option<&OrderBookEntry> {
        self.levels
            .values()
            .flat_map(|q| q.iter())
            .find(|e| e.order_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OrderBookEntry;
    use chrono::Utc;

    fn entry(id: u128, price: f64, qty: f64) -> OrderBookEntry {
        OrderBookEntry {
            order_id: OrderId(uuid::Uuid::from_u128(id)),
            timestamp: Utc::now(),
            price,
            quantity: qty,
        }
    }

    #[test]
    fn new_is_empty() {
        let bids = PriceLevels::new(Side::Buy);
        assert!(bids.is_empty());
        assert_eq!(bids.best_price(), None);
    }

    #[test]
    fn push_keeps_fifo_within_a_level() {
        let mut bids = PriceLevels::new(Side::Buy);
        bids.push(entry(1, 100.0, 10.0));
        bids.push(entry(2, 100.0, 20.0));
        bids.push(entry(3, 100.0, 30.0));

        let q = bids.level_mut(100.0);
        let ids: Vec<u128> = q.iter().map(|e| e.order_id.0.as_u128()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn best_price_is_lowest_for_asks_highest_for_bids() {
        let mut asks = PriceLevels::new(Side::Sell);
        asks.push(entry(1, 102.0, 5.0));
        asks.push(entry(2, 100.0, 5.0));
        asks.push(entry(3, 101.0, 5.0));
        assert_eq!(asks.best_price(), Some(100.0));

        let mut bids = PriceLevels::new(Side::Buy);
        bids.push(entry(1, 98.0, 5.0));
        bids.push(entry(2, 100.0, 5.0));
        bids.push(entry(3, 99.0, 5.0));
        assert_eq!(bids.best_price(), Some(100.0));
    }

    #[test]
    fn remove_if_empty_drops_drained_level() {
        let mut asks = PriceLevels::new(Side::Sell);
        asks.push(entry(1, 100.0, 5.0));
        {
            let (_, q) = asks.best_queue_mut().unwrap();
            q.pop_front();
        }
        asks.remove_if_empty(100.0);
        assert!(asks.is_empty());
        assert_eq!(asks.best_price(), None);
    }

    #[test]
    fn depth_reports_top_k_aggregated_best_first() {
        let mut bids = PriceLevels::new(Side::Buy);
        bids.push(entry(1, 100.0, 2.0));
        bids.push(entry(2, 99.5, 3.0));
        bids.push(entry(3, 99.0, 4.0));

        let d = bids.depth(2);
        assert_eq!(d, vec![(100.0, 2.0), (99.5, 3.0)]);
    }

    #[test]
    fn depth_aggregates_multiple_orders_at_one_level() {
        let mut asks = PriceLevels::new(Side::Sell);
        asks.push(entry(1, 100.0, 2.0));
        asks.push(entry(2, 100.0, 3.0));

        let d = asks.depth(10);
        assert_eq!(d, vec![(100.0, 5.0)]);
    }
}
