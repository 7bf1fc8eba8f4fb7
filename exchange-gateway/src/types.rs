//! Wire types for the REST and WebSocket interfaces.
//!
//! Depth arrays serialize price/quantity as strings, matching the
//! convention of the system this gateway fronts.

use chrono::{DateTime, Utc};
use orderbook::{Bbo, DepthSnapshot, Order, OrderId, OrderType, Side, Trade};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Incoming order submission. `id` and `timestamp` are accepted from the
/// client but optional — most callers let the gateway assign both.
#[derive(Debug, Deserialize)]
pub struct SubmitOrderRequest {
    pub id: Option<Uuid>,
    pub timestamp: Option<DateTime<Utc>>,
    pub symbol: String,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub price: Option<f64>,
    pub quantity: f64,
}

impl SubmitOrderRequest {
    /// Builds the engine's `Order`, honoring a client-supplied id or
    /// timestamp where given and generating fresh ones otherwise.
    pub fn into_order(self) -> Order {
        let mut order = Order::new(
            self.symbol,
            self.side,
            self.order_type,
            self.price.unwrap_or(0.0),
            self.quantity,
        );
        if let Some(id) = self.id {
            order.id = OrderId(id);
        }
        if let Some(ts) = self.timestamp {
            order.timestamp = ts;
        }
        order
    }
}

/// Response to a successful order submission: the post-submit BBO, plus
/// the trades it produced immediately (an addition beyond the minimal
/// `{bbo}` shape, not a replacement of it).
#[derive(Debug, Serialize)]
pub struct SubmitOrderResponse {
    pub bbo: Bbo,
    pub trades: Vec<Trade>,
}

/// Query parameters for market depth requests.
#[derive(Debug, Deserialize)]
pub struct DepthQuery {
    pub k: Option<usize>,
}

/// List of registered trading symbols.
#[derive(Debug, Serialize)]
pub struct SymbolsResponse {
    pub symbols: Vec<String>,
}

/// A depth snapshot with prices and quantities serialized as strings.
#[derive(Debug, Serialize)]
pub struct DepthWire {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub bids: Vec<(String, String)>,
    pub asks: Vec<(String, String)>,
}

impl DepthWire {
    pub fn new(symbol: String, snapshot: DepthSnapshot) -> Self {
        Self {
            symbol,
            timestamp: snapshot.timestamp,
            bids: stringify_levels(snapshot.bids),
            asks: stringify_levels(snapshot.asks),
        }
    }
}

fn stringify_levels(levels: Vec<(f64, f64)>) -> Vec<(String, String)> {
    levels
        .into_iter()
        .map(|(price, qty)| (price.to_string(), qty.to_string()))
        .collect()
}

/// A single fill, field names matching the trade stream's wire contract.
#[derive(Debug, Clone, Serialize)]
pub struct TradeWire {
    pub price: f64,
    pub quantity: f64,
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub aggressor_side: Side,
    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,
}

impl TradeWire {
    pub fn new(symbol: String, trade: &Trade) -> Self {
        Self {
            price: trade.price,
            quantity: trade.quantity,
            symbol,
            timestamp: trade.timestamp,
            aggressor_side: trade.aggressor_side,
            maker_order_id: trade.maker_id,
            taker_order_id: trade.taker_id,
        }
    }
}

/// Tagged WebSocket push envelope: `{"type": "...", "data": {...}}`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum WsMessage {
    #[serde(rename = "market_depth")]
    MarketDepth(DepthWire),
    #[serde(rename = "trade")]
    Trade(TradeWire),
}
