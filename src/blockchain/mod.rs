// src/blockchain/mod.rs

pub mod client;
pub use client::MempoolClient;

pub mod format;
pub mod models;
