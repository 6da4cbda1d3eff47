//! Startup Success Index (SSI) scoring.
//!
//! The core is [`scoring::compute_score`]: twelve normalized factors in, one
//! score in [0, 1] out. Everything else (presets, the analysis payload
//! adapter, the local startup store, config and output) sits around it.

pub mod config;
pub mod extraction;
pub mod logging;
pub mod output;
pub mod presets;
pub mod scoring;
pub mod store;
