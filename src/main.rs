//! Matching engine performance lab.
//!
//! Runs performance tests followed by a basic trading demo showing
//! order placement, matching, and trade execution.

use orderbook::{Order, OrderBook, OrderType, Side};

mod latency_test;

/// Main entry point - runs performance tests and demo.
fn main() {
    println!("=== Matching Engine Performance Lab ===");

    latency_test::run_latency_tests();
    latency_test::run_throughput_test();

    println!("\n=== 1-Minute Sustained Throughput Test ===");
    latency_test::run_throughput_test_1min();

    println!("\n=== Basic Demo ===");
    run_basic_demo();
}

/// Demonstrates basic order book functionality with trade execution.
fn run_basic_demo() {
    let mut ob = OrderBook::new("AAPL");

    println!("Order Book Demo");

    let ask_order = Order::new("AAPL", Side::Sell, OrderType::Limit, 150.00, 100.0);
    let bid_order = Order::new("AAPL", Side::Buy, OrderType::Limit, 149.50, 50.0);

    println!(
        "Submitting ask order: {} @ {}",
        ask_order.quantity, ask_order.price
    );
    ob.submit(ask_order);

    println!(
        "Submitting bid order: {} @ {}",
        bid_order.quantity, bid_order.price
    );
    ob.submit(bid_order);

    println!("Best bid: {:?}", ob.best_bid());
    println!("Best ask: {:?}", ob.best_ask());

    // Crossing bid that will execute against the ask.
    let crossing_bid = Order::new("AAPL", Side::Buy, OrderType::Limit, 150.00, 75.0);

    println!(
        "Submitting crossing bid: {} @ {}",
        crossing_bid.quantity, crossing_bid.price
    );
    let result = ob.submit(crossing_bid);

    println!("Trades executed: {}", result.trades.len());
    for trade in result.trades {
        println!("  Trade: {} shares @ {}", trade.quantity, trade.price);
    }

    println!("Final best bid: {:?}", ob.best_bid());
    println!("Final best ask: {:?}", ob.best_ask());
}
