//! Application services: list orchestration and post administration.

pub mod admin;
pub mod error;
pub mod listing;
pub mod repos;
