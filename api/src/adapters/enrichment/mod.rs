//! Prospect enrichment adapter

pub mod client;

pub use client::EnrichmentClient;
