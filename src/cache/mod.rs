// src/cache/mod.rs

pub mod manager;

pub use manager::{CacheManager, CacheStats};
