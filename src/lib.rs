// src/lib.rs
pub mod config;
pub mod error;
pub mod logging;
pub mod message;
pub mod routes;
pub mod services;
pub mod shutdown;
pub mod state;
