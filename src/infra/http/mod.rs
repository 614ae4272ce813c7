//! Outbound HTTP access to the content API.

mod client;
pub mod error;

pub use client::ApiClient;
pub use error::{ApiError, Operation, Outcome, classify};
