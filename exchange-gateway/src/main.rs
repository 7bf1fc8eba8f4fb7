//! HTTP and WebSocket gateway for the matching engine.
//!
//! Serves order submission, market-data pull/push endpoints, and a
//! minimal trading dashboard. Built with Axum for async request
//! handling; all matching logic lives in the `orderbook` crate.

use axum::{
    extract::{Path, Query, State, WebSocketUpgrade},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::info;

mod exchange;
mod types;
mod websocket;

use exchange::Exchange;
use types::*;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let exchange = Arc::new(Exchange::new());

    let app = Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
        .route("/dashboard", get(serve_dashboard))
        .nest_service(
            "/static",
            ServeDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
        )
        .route("/symbols", get(list_symbols))
        .route("/symbols/:symbol/depth", get(get_depth))
        .route("/submit_order", post(submit_order))
        .route("/bbo/:symbol", get(get_bbo))
        .route("/ws/market/:symbol", get(market_stream))
        .route("/ws/trades/:symbol", get(trade_stream))
        .layer(CorsLayer::permissive())
        .with_state(AppState { exchange });

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .unwrap();

    info!("exchange gateway starting on http://0.0.0.0:8080");
    info!("  GET  /                     - banner");
    info!("  GET  /health               - health check");
    info!("  GET  /dashboard            - trading dashboard");
    info!("  GET  /static/*             - static assets");
    info!("  GET  /symbols              - list registered symbols");
    info!("  GET  /symbols/:symbol/depth - market depth");
    info!("  POST /submit_order         - submit an order");
    info!("  GET  /bbo/:symbol          - best bid/offer");
    info!("  WS   /ws/market/:symbol    - market data stream");
    info!("  WS   /ws/trades/:symbol    - trade stream");

    axum::serve(listener, app).await.unwrap();
}

/// Application state shared across all handlers.
#[derive(Clone)]
struct AppState {
    exchange: Arc<Exchange>,
}

async fn banner() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "exchange-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

async fn serve_dashboard() -> impl IntoResponse {
    Html(include_str!("../static/dashboard.html"))
}

async fn list_symbols(State(state): State<AppState>) -> impl IntoResponse {
    let symbols = state.exchange.list_symbols().await;
    Json(SymbolsResponse { symbols })
}

async fn get_depth(
    Path(symbol): Path<String>,
    Query(params): Query<DepthQuery>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    validate_symbol(&symbol)?;
    Ok(Json(state.exchange.depth(&symbol, params.k).await))
}

async fn get_bbo(
    Path(symbol): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    validate_symbol(&symbol)?;
    Ok(Json(state.exchange.bbo(&symbol).await))
}

/// Read endpoints never auto-vivify a book for a symbol that isn't a
/// plausible ticker — unlike submission, which legitimately creates a
/// book on a symbol's first order. A malformed path segment here is
/// rejected before it ever reaches the registry.
fn validate_symbol(symbol: &str) -> Result<(), AppError> {
    let plausible = !symbol.is_empty()
        && symbol.len() <= 10
        && symbol.chars().all(|c| c.is_ascii_uppercase());
    if plausible {
        Ok(())
    } else {
        Err(AppError::SymbolNotFound)
    }
}

async fn submit_order(
    State(state): State<AppState>,
    Json(request): Json<SubmitOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.quantity <= 0.0 {
        return Err(AppError::InvalidOrder("quantity must be positive"));
    }
    if !matches!(request.order_type, orderbook::OrderType::Market)
        && !matches!(request.price, Some(p) if p > 0.0)
    {
        return Err(AppError::InvalidOrder(
            "limit/ioc/fok orders require a positive price",
        ));
    }

    let order = request.into_order();
    let exchange = state.exchange.clone();
    let (trades, bbo) = tokio::spawn(async move { exchange.submit_order(order).await })
        .await
        .map_err(|_| AppError::Internal)?;

    Ok((StatusCode::OK, Json(SubmitOrderResponse { bbo, trades })))
}

async fn market_stream(
    Path(symbol): Path<String>,
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| websocket::handle_market_stream(socket, symbol, state))
}

async fn trade_stream(
    Path(symbol): Path<String>,
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| websocket::handle_trade_stream(socket, symbol, state))
}

/// Gateway-level error taxonomy: malformed input is rejected before it
/// reaches the engine (`InvalidOrder`, `SymbolNotFound` on a read
/// endpoint given an implausible symbol), and a submission whose engine
/// task panics surfaces as `Internal` rather than taking the whole
/// process down.
#[derive(Debug)]
enum AppError {
    SymbolNotFound,
    InvalidOrder(&'static str),
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::SymbolNotFound => (StatusCode::NOT_FOUND, "symbol not found".to_string()),
            AppError::InvalidOrder(reason) => (StatusCode::BAD_REQUEST, reason.to_string()),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": message,
            "code": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
