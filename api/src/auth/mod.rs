//! Authentication for the operator-facing routes

mod api_key;

pub use api_key::{auth_middleware, ApiKeyAuth};
