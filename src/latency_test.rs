//! Performance testing suite for the order book.
//!
//! Measures latency and throughput under various scenarios:
//! - Market data access, order submission, matching
//! - Sustained throughput testing with mixed workloads
//! - Statistical analysis with multiple iterations

use orderbook::{Order, OrderBook, OrderType, PriceLevels, Side};
use std::time::Instant;

/// Runs complete latency test suite.
pub fn run_latency_tests() {
    println!("Matching Engine - Real-time Latency Tests\n");

    test_market_data_latency();
    test_order_submission_latency();
    test_order_matching_latency();
    test_price_level_insertion_latency();
}

fn limit(symbol: &str, side: Side, price: f64, qty: f64) -> Order {
    Order::new(symbol, side, OrderType::Limit, price, qty)
}

/// Tests best bid/ask lookup performance.
fn test_market_data_latency() {
    println!("Market Data Latency Test");

    let mut ob = OrderBook::new("AAPL");

    for i in 0..100 {
        ob.submit(limit("AAPL", Side::Sell, 100.00 + i as f64 * 0.01, 100.0));
        ob.submit(limit("AAPL", Side::Buy, 99.99 - i as f64 * 0.01, 100.0));
    }

    let iterations = 1_000_000;

    let start = Instant::now();
    for _ in 0..iterations {
        std::hint::black_box(ob.best_bid());
    }
    let bid_duration = start.elapsed();

    let start = Instant::now();
    for _ in 0..iterations {
        std::hint::black_box(ob.best_ask());
    }
    let ask_duration = start.elapsed();

    println!(
        "  Best bid lookup: {:.2} ns/call",
        bid_duration.as_nanos() as f64 / iterations as f64
    );
    println!(
        "  Best ask lookup: {:.2} ns/call",
        ask_duration.as_nanos() as f64 / iterations as f64
    );
    println!(
        "  Combined latency: {:.2} ns\n",
        (bid_duration.as_nanos() + ask_duration.as_nanos()) as f64 / iterations as f64
    );
}

/// Tests order submission latency for non-crossing orders.
fn test_order_submission_latency() {
    println!("Order Submission Latency Test");

    let iterations = 10_000;
    let mut total_time = 0u128;

    for i in 0..iterations {
        let mut ob = OrderBook::new("AAPL");
        let order = limit("AAPL", Side::Buy, 100.00 - i as f64 * 0.01, 100.0);

        let start = Instant::now();
        ob.submit(order);
        total_time += start.elapsed().as_nanos();
    }

    let avg_latency = total_time as f64 / iterations as f64;
    println!("  Average order submission: {:.2} ns", avg_latency);
    println!(
        "  Throughput: {:.0} orders/second\n",
        1_000_000_000.0 / avg_latency
    );
}

/// Tests order matching latency for crossing orders.
fn test_order_matching_latency() {
    println!("Order Matching Latency Test");

    let iterations = 1_000;
    let mut total_setup_time = 0u128;
    let mut total_match_time = 0u128;

    for _ in 0..iterations {
        let setup_start = Instant::now();
        let mut ob = OrderBook::new("AAPL");

        for j in 0..10 {
            ob.submit(limit("AAPL", Side::Sell, 100.00 + j as f64 * 0.01, 100.0));
        }
        total_setup_time += setup_start.elapsed().as_nanos();

        let crossing_order = limit("AAPL", Side::Buy, 100.05, 500.0);

        let match_start = Instant::now();
        let result = ob.submit(crossing_order);
        total_match_time += match_start.elapsed().as_nanos();

        std::hint::black_box(result);
    }

    println!(
        "  Setup (10 resting orders): {:.2} ns",
        total_setup_time as f64 / iterations as f64
    );
    println!(
        "  Crossing order execution: {:.2} ns",
        total_match_time as f64 / iterations as f64
    );
    println!(
        "  Total order-to-trade: {:.2} ns\n",
        (total_setup_time + total_match_time) as f64 / iterations as f64
    );
}

/// Tests raw price-level insertion latency, isolated from matching.
fn test_price_level_insertion_latency() {
    println!("Price Level Insertion Latency Test");

    let iterations = 1_000;
    let orders_per_test = 100;
    let mut total_time = 0u128;

    for i in 0..iterations {
        let mut bids = PriceLevels::new(Side::Buy);

        let start = Instant::now();
        for j in 0..orders_per_test {
            let order = limit("AAPL", Side::Buy, 100.00 - (j as f64) * 0.01, 100.0);
            bids.push(orderbook::OrderBookEntry::from_order(&order));
        }
        total_time += start.elapsed().as_nanos();

        std::hint::black_box((i, bids.level_count()));
    }

    println!(
        "  Insertion: {:.2} ns per order\n",
        total_time as f64 / (iterations * orders_per_test) as f64
    );
}

/// Runs sustained throughput test with mixed workload.
pub fn run_throughput_test() {
    run_sustained_throughput_test(std::time::Duration::from_secs(10));
}

/// Runs 1-minute sustained throughput test with mixed workload.
pub fn run_throughput_test_1min() {
    run_sustained_throughput_test(std::time::Duration::from_secs(60));
}

fn run_sustained_throughput_test(duration: std::time::Duration) {
    println!(
        "Sustained Throughput Test ({} seconds)",
        duration.as_secs()
    );

    let mut ob = OrderBook::new("AAPL");
    let mut tick = 0u64;
    let mut orders_processed = 0u64;
    let mut trades_executed = 0u64;

    let start_time = Instant::now();

    while start_time.elapsed() < duration {
        match tick % 4 {
            0 => {
                let order = limit(
                    "AAPL",
                    Side::Buy,
                    99.99 - (tick % 100) as f64 * 0.01,
                    100.0,
                );
                ob.submit(order);
            }
            1 => {
                let order = limit(
                    "AAPL",
                    Side::Sell,
                    100.01 + (tick % 100) as f64 * 0.01,
                    100.0,
                );
                ob.submit(order);
            }
            2 => {
                let order = limit("AAPL", Side::Buy, 100.01, 50.0);
                let result = ob.submit(order);
                trades_executed += result.trades.len() as u64;
            }
            3 => {
                let order = limit("AAPL", Side::Sell, 99.99, 50.0);
                let result = ob.submit(order);
                trades_executed += result.trades.len() as u64;
            }
            _ => unreachable!(),
        }

        tick += 1;
        orders_processed += 1;

        if tick % 100 == 0 {
            std::hint::black_box(ob.best_bid());
            std::hint::black_box(ob.best_ask());
        }
    }

    let elapsed = start_time.elapsed();
    let orders_per_sec = orders_processed as f64 / elapsed.as_secs_f64();
    let trades_per_sec = trades_executed as f64 / elapsed.as_secs_f64();

    println!("  Duration: {:.1} seconds", elapsed.as_secs_f64());
    println!("  Orders processed: {}", orders_processed);
    println!("  Trades executed: {}", trades_executed);
    println!("  Order throughput: {:.0} orders/second", orders_per_sec);
    println!("  Trade throughput: {:.0} trades/second", trades_per_sec);
    println!(
        "  Final book state: bid={:?}, ask={:?}",
        ob.best_bid(),
        ob.best_ask()
    );
}
