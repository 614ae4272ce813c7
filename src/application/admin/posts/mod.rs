mod commands;
mod service;

pub use service::*;
