//! Database operations for the ingest service

pub mod attendance;
pub mod blacklist;
pub mod config;
pub mod settings;
pub mod users;
