//! # daykeeper-channels
//!
//! Messaging platform integrations for Daykeeper.

pub mod telegram;
pub mod utils;
