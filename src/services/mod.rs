// src/services/mod.rs
pub mod conversation;
pub mod gemini;
pub mod generator;
pub mod session_manager;
