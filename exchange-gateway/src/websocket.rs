//! WebSocket handlers for real-time market-data and trade dissemination.
//!
//! Each connection subscribes to one symbol's broadcast channels and
//! forwards events as they arrive, with a periodic heartbeat ping so
//! dead connections get reaped.

use axum::extract::ws::{Message, WebSocket};
use futures::{sink::SinkExt, stream::StreamExt};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::interval;
use tracing::{error, info, warn};

use crate::types::{DepthWire, TradeWire, WsMessage};
use crate::AppState;

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Streams market-depth snapshots for `symbol` as they're published.
pub async fn handle_market_stream(socket: WebSocket, symbol: String, state: AppState) {
    info!("new market stream connection for {}", symbol);

    let (mut sender, mut receiver) = socket.split();
    let mut market_rx = state.exchange.attach_market(&symbol);
    let mut ping_interval = interval(HEARTBEAT_INTERVAL);

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        info!("market stream connection closed for {}", symbol);
                        break;
                    }
                    Some(Err(e)) => {
                        error!("websocket error in market stream: {}", e);
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sender.send(Message::Pong(data)).await;
                    }
                    _ => {}
                }
            }

            event = market_rx.recv() => {
                match event {
                    Ok(depth_event) => {
                        let wire = DepthWire {
                            symbol: depth_event.symbol,
                            timestamp: depth_event.timestamp,
                            bids: stringify(depth_event.bids),
                            asks: stringify(depth_event.asks),
                        };
                        if !send_json(&mut sender, WsMessage::MarketDepth(wire)).await {
                            warn!("failed to send market update for {}", symbol);
                            break;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        warn!("market stream for {} lagged by {} events", symbol, n);
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            _ = ping_interval.tick() => {
                if sender.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }
        }
    }

    info!("market stream handler ended for {}", symbol);
}

/// Streams trade executions for `symbol` as they occur.
pub async fn handle_trade_stream(socket: WebSocket, symbol: String, state: AppState) {
    info!("new trade stream connection for {}", symbol);

    let (mut sender, mut receiver) = socket.split();
    let mut trade_rx = state.exchange.attach_trade(&symbol);
    let mut ping_interval = interval(HEARTBEAT_INTERVAL);

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        info!("trade stream connection closed for {}", symbol);
                        break;
                    }
                    Some(Err(e)) => {
                        error!("websocket error in trade stream: {}", e);
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sender.send(Message::Pong(data)).await;
                    }
                    _ => {}
                }
            }

            event = trade_rx.recv() => {
                match event {
                    Ok(trade_event) => {
                        let wire = TradeWire::new(trade_event.symbol, &trade_event.trade);
                        if !send_json(&mut sender, WsMessage::Trade(wire)).await {
                            warn!("failed to send trade update for {}", symbol);
                            break;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        warn!("trade stream for {} lagged by {} events", symbol, n);
                    }
                    Err(RecvError::Closed) => break,
                }
            }

            _ = ping_interval.tick() => {
                if sender.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }
        }
    }

    info!("trade stream handler ended for {}", symbol);
}

fn stringify(levels: Vec<(f64, f64)>) -> Vec<(String, String)> {
    levels
        .into_iter()
        .map(|(price, qty)| (price.to_string(), qty.to_string()))
        .collect()
}

async fn send_json(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: WsMessage,
) -> bool {
    match serde_json::to_string(&msg) {
        Ok(json) => sender.send(Message::Text(json)).await.is_ok(),
        Err(_) => false,
    }
}
