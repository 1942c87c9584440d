//! Pipedrive adapter
//!
//! CRM client backed by the Pipedrive REST API.

pub mod client;

pub use client::PipedriveClient;
