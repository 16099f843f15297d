//! SigLab Core: the strategy evaluation engine.
//!
//! This crate contains the heart of the strategy-search backtester:
//! - Domain types (bars, signals, positions, trades)
//! - Single-pass technical indicators and the memoizing indicator cache
//! - The signal-strategy abstraction and its concrete families
//! - The bar-by-bar trade simulation state machine
//! - The deterministic RNG hierarchy for reproducible search

pub mod domain;
pub mod error;
pub mod indicators;
pub mod rng;
pub mod sim;
pub mod strategies;

pub use error::{CoreError, Result};
