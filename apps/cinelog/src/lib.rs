//! # cinelog
//!
//! Adapters around `cinelog-core`: the axum REST API, the clap CLI with its
//! demo shell, and layered configuration.

pub mod api;
pub mod cli;
pub mod config;
