//! CLI command implementations.

pub mod common;
pub mod config;
pub mod fft;
pub mod generate;
pub mod info;
pub mod metrics;
pub mod spectrum;
