//! Infrastructure adapters: transport, credential storage, telemetry.

pub mod error;
pub mod http;
pub mod session;
pub mod telemetry;
