//! Webhook notifier adapter

pub mod notifier;

pub use notifier::WebhookNotifier;
