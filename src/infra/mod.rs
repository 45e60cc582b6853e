// src/infra/mod.rs

pub mod archive;
pub mod config;
pub mod errors;
pub mod logger;
pub mod paths;
pub mod session;
