use clap::{Parser, Subcommand};
use orderbook::{OrderType, Side};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "hftx-cli")]
#[command(about = "Command line client for the exchange gateway")]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    server: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit an order.
    Submit {
        #[arg(short = 's', long)]
        symbol: String,
        #[arg(long, value_parser = parse_side)]
        side: Side,
        #[arg(short = 't', long = "type", default_value = "limit", value_parser = parse_order_type)]
        order_type: OrderType,
        #[arg(short = 'p', long)]
        price: Option<f64>,
        #[arg(short = 'q', long)]
        quantity: f64,
    },
    /// Show the best bid/offer for a symbol.
    Bbo {
        #[arg(short, long)]
        symbol: String,
    },
    Health,
    /// List registered symbols.
    Symbols,
    /// Show aggregated market depth for a symbol.
    Depth {
        #[arg(short, long)]
        symbol: String,
        #[arg(short, long, default_value = "10")]
        levels: usize,
    },
}

#[derive(Serialize)]
struct SubmitOrderRequest {
    symbol: String,
    side: Side,
    #[serde(rename = "type")]
    order_type: OrderType,
    price: Option<f64>,
    quantity: f64,
}

#[derive(Deserialize)]
struct Bbo {
    bid: Option<f64>,
    ask: Option<f64>,
}

#[derive(Deserialize)]
struct Trade {
    price: f64,
    quantity: f64,
}

#[derive(Deserialize)]
struct SubmitOrderResponse {
    bbo: Bbo,
    trades: Vec<Trade>,
}

#[derive(Deserialize)]
struct SymbolsResponse {
    symbols: Vec<String>,
}

#[derive(Deserialize)]
struct MarketDepth {
    symbol: String,
    bids: Vec<(String, String)>,
    asks: Vec<(String, String)>,
}

fn parse_side(s: &str) -> Result<Side, String> {
    match s.to_lowercase().as_str() {
        "buy" | "bid" => Ok(Side::Buy),
        "sell" | "ask" => Ok(Side::Sell),
        _ => Err(format!("invalid side: {}. use 'buy' or 'sell'", s)),
    }
}

fn parse_order_type(s: &str) -> Result<OrderType, String> {
    match s.to_lowercase().as_str() {
        "limit" => Ok(OrderType::Limit),
        "market" => Ok(OrderType::Market),
        "ioc" => Ok(OrderType::Ioc),
        "fok" => Ok(OrderType::Fok),
        _ => Err(format!("invalid order type: {}", s)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Submit {
            symbol,
            side,
            order_type,
            price,
            quantity,
        } => {
            let request = SubmitOrderRequest {
                symbol,
                side,
                order_type,
                price,
                quantity,
            };

            let response = client
                .post(format!("{}/submit_order", cli.server))
                .json(&request)
                .send()
                .await?;

            if response.status().is_success() {
                let result: SubmitOrderResponse = response.json().await?;

                println!("BBO: bid={:?} ask={:?}", result.bbo.bid, result.bbo.ask);
                if !result.trades.is_empty() {
                    println!("Trades executed: {}", result.trades.len());
                    for trade in result.trades {
                        println!("  {} @ {}", trade.quantity, trade.price);
                    }
                }
            } else {
                println!("Error: {}", response.status());
                println!("{}", response.text().await?);
            }
        }

        Commands::Bbo { symbol } => {
            let response = client
                .get(format!("{}/bbo/{}", cli.server, symbol))
                .send()
                .await?;

            if response.status().is_success() {
                let bbo: Bbo = response.json().await?;
                println!("bid={:?} ask={:?}", bbo.bid, bbo.ask);
            } else {
                println!("Error: {}", response.status());
            }
        }

        Commands::Health => {
            let response = client.get(format!("{}/health", cli.server)).send().await?;

            if response.status().is_success() {
                let health: serde_json::Value = response.json().await?;
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                println!("Error: {}", response.status());
            }
        }

        Commands::Symbols => {
            let response = client
                .get(format!("{}/symbols", cli.server))
                .send()
                .await?;

            if response.status().is_success() {
                let symbols: SymbolsResponse = response.json().await?;
                for symbol in symbols.symbols {
                    println!("{}", symbol);
                }
            } else {
                println!("Error: {}", response.status());
            }
        }

        Commands::Depth { symbol, levels } => {
            let response = client
                .get(format!(
                    "{}/symbols/{}/depth?k={}",
                    cli.server, symbol, levels
                ))
                .send()
                .await?;

            if response.status().is_success() {
                let depth: MarketDepth = response.json().await?;

                println!("Market depth for {}", depth.symbol);
                println!("\nAsks:");
                for (i, (price, qty)) in depth.asks.iter().enumerate() {
                    println!("  {}: {} @ {}", i + 1, qty, price);
                }

                println!("\nBids:");
                for (i, (price, qty)) in depth.bids.iter().enumerate() {
                    println!("  {}: {} @ {}", i + 1, qty, price);
                }
            } else {
                println!("Error: {}", response.status());
            }
        }
    }

    Ok(())
}
