//! Symbol -> book registry, lazily created, race-free under concurrent
//! lookup.

use crate::book::Book;
use dashmap::DashMap;
use std::sync::Arc;

/// Routes incoming requests by symbol, creating a fresh `Book` the
/// first time a symbol is referenced.
///
/// Backed by `DashMap`, following the teacher's `Exchange` struct;
/// `entry().or_insert_with()` makes creation atomic so two callers
/// racing on the same unseen symbol both land on the same `Book`.
pub struct BookRegistry {
    books: DashMap<String, Arc<Book>>,
}

impl BookRegistry {
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
        }
    }

    /// Returns the book for `symbol`, creating it if this is the first
    /// reference. Never fails, never evicts.
    pub fn get_or_create(&self, symbol: &str) -> Arc<Book> {
        self.books
            .entry(symbol.to_string())
            .or_insert_with(|| Arc::new(Book::new(symbol)))
            .clone()
    }

    /// Returns the book for `symbol` only if it has been referenced
    /// before, without creating one.
    pub fn get(&self, symbol: &str) -> Option<Arc<Book>> {
        self.books.get(symbol).map(|entry| entry.clone())
    }

    /// All symbols that have been referenced so far, arbitrary order.
    pub fn symbols(&self) -> Vec<String> {
        self.books.iter().map(|entry| entry.key().clone()).collect()
    }
}

impl Default for BookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Order, OrderType, Side};
    use std::sync::Arc as StdArc;

    #[test]
    fn unknown_symbol_returns_none_without_creating() {
        let reg = BookRegistry::new();
        assert!(reg.get("AAPL").is_none());
        assert!(reg.symbols().is_empty());
    }

    #[test]
    fn get_or_create_is_lazy_and_idempotent() {
        let reg = BookRegistry::new();
        let a = reg.get_or_create("AAPL");
        let b = reg.get_or_create("AAPL");
        assert!(StdArc::ptr_eq(&a, &b));
        assert_eq!(reg.symbols(), vec!["AAPL".to_string()]);
    }

    #[tokio::test]
    async fn concurrent_creation_of_same_symbol_yields_one_book() {
        let reg = StdArc::new(BookRegistry::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let reg = reg.clone();
            handles.push(tokio::spawn(async move { reg.get_or_create("AAPL") }));
        }
        let books: Vec<_> = futures_join_all(handles).await;
        for w in books.windows(2) {
            assert!(StdArc::ptr_eq(&w[0], &w[1]));
        }
    }

    #[tokio::test]
    async fn different_symbols_get_different_books_and_dont_interfere() {
        let reg = BookRegistry::new();
        let aapl = reg.get_or_create("AAPL");
        let tsla = reg.get_or_create("TSLA");

        aapl.submit(Order::new("AAPL", Side::Buy, OrderType::Limit, 100.0, 1.0))
            .await;

        assert_eq!(aapl.bbo().await.bid, Some(100.0));
        assert_eq!(tsla.bbo().await.bid, None);
    }

    async fn futures_join_all<T>(handles: Vec<tokio::task::JoinHandle<T>>) -> Vec<T> {
        let mut out = Vec::with_capacity(handles.len());
        for h in handles {
            out.push(h.await.unwrap());
        }
        out
    }
}
