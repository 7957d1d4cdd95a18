//! Conversational analytics over a SQLite database.
//!
//! A question goes through [`analyst::DataAnalyst`]: SQL generation with the
//! recent history, the keyword filter, read-only execution, then an insight
//! and a chart recommendation. Every artifact is appended to the
//! [`session::Session`] transcript and persisted as it is produced.

pub mod advisor;
pub mod analyst;
pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod factory;
pub mod query_generator;
pub mod session;
pub mod storage;
pub mod types;

#[cfg(test)]
mod test_support;

pub use analyst::DataAnalyst;
pub use error::TurnError;
pub use session::Session;
pub use types::{ChartType, Turn, TurnState, VizRecommendation};

/// A canned starter question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickQuestion {
    pub label: &'static str,
    pub question: &'static str,
}

pub const QUICK_QUESTIONS: [QuickQuestion; 4] = [
    QuickQuestion {
        label: "Top Produk",
        question: "Tampilkan 5 produk dengan harga termahal",
    },
    QuickQuestion {
        label: "Tren Penjualan",
        question: "Tampilkan tren penjualan harian berdasarkan tanggal order",
    },
    QuickQuestion {
        label: "Analisis Kota",
        question: "Berapa total pendapatan dari masing-masing kota?",
    },
    QuickQuestion {
        label: "Cek Stok",
        question: "Tampilkan produk dengan stok kurang dari 20",
    },
];
