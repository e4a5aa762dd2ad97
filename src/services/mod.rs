// src/services/mod.rs
pub mod session;
pub mod upstream;
