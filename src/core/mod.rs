//! Configuration, shared data types and parameter-store access

pub mod config;
pub mod models;
pub mod parameters;
