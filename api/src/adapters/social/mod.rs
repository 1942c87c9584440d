//! Social platform adapter

pub mod client;

pub use client::SocialClient;
