//! Domain value types: orders, resting book entries, and trades.

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which side of the book an order or trade belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side an incoming order of this side matches against.
    pub fn contra(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

/// Time-in-force / order-type tag. Dispatch happens once at submit entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Limit,
    Market,
    Ioc,
    Fok,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new() -> Self {
        OrderId(Uuid::new_v4())
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An incoming order, consumed by the engine.
///
/// `quantity` is decremented in place while matching; the remainder (if
/// any) is what becomes an `OrderBookEntry`, or is dropped per the
/// order type's residual-handling rule.
#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    /// Meaningful only for Limit/Ioc/Fok.
    pub price: f64,
    pub quantity: f64,
}

impl Order {
    /// Builds a new order with a fresh id and the current time.
    ///
    /// The source this was distilled from computes its default id once
    /// at class-definition time, so every order built without an
    /// explicit id gets the same one. Every construction here gets its
    /// own fresh id instead.
    pub fn new(
        symbol: impl Into<String>,
        side: Side,
        order_type: OrderType,
        price: f64,
        quantity: f64,
    ) -> Self {
        Self {
            id: OrderId::new(),
            timestamp: Utc::now(),
            symbol: symbol.into(),
            side,
            order_type,
            price,
            quantity,
        }
    }

    pub fn price_key(&self) -> OrderedFloat<f64> {
        OrderedFloat(self.price)
    }
}

/// A resting order on one side of the book. Owned exclusively by the
/// queue at a single price level. Only `quantity` ever mutates.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderBookEntry {
    pub order_id: OrderId,
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub quantity: f64,
}

impl OrderBookEntry {
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id,
            timestamp: order.timestamp,
            price: order.price,
            quantity: order.quantity,
        }
    }
}

/// A single fill. `price` is always the resting (maker) level's price.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub price: f64,
    pub quantity: f64,
    pub maker_id: OrderId,
    pub taker_id: OrderId,
    pub aggressor_side: Side,
}

impl Trade {
    pub fn new(
        symbol: String,
        price: f64,
        quantity: f64,
        maker_id: OrderId,
        taker_id: OrderId,
        aggressor_side: Side,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            symbol,
            price,
            quantity,
            maker_id,
            taker_id,
            aggressor_side,
        }
    }

    /// Order id on the buy side of this trade.
    pub fn buy_order_id(&self) -> OrderId {
        match self.aggressor_side {
            Side::Buy => self.taker_id,
            Side::Sell => self.maker_id,
        }
    }

    /// Order id on the sell side of this trade.
    pub fn sell_order_id(&self) -> OrderId {
        match self.aggressor_side {
            Side::Buy => self.maker_id,
            Side::Sell => self.taker_id,
        }
    }
}
