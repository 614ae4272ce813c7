//! Client core for the wfhubby recipes-and-code site.
//!
//! Layers follow the usual split: `domain` holds pure filter, ordering and
//! draft rules; `application` drives them against the content API through
//! source traits; `infra` owns HTTP, the session credential and telemetry.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
