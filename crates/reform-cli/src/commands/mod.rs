//! CLI command handlers

pub mod collections;
pub mod config;
pub mod improve;
pub mod serve;
