//! # daykeeper-core
//!
//! Core types, the transport trait, configuration, and error handling for Daykeeper.

pub mod config;
pub mod error;
pub mod message;
pub mod traits;

pub use config::shellexpand;
