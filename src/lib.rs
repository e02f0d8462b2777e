//! Set-associative cache simulation.
//!
//! Models the line states of a hardware cache under a stream of memory
//! accesses: LRU replacement, write-back/write-allocate writes, per-access
//! hit/miss classification and aggregate counters. Metadata only; no data
//! bytes are modeled.

pub mod addr;
pub mod cache;
pub mod config;
pub mod event;
pub mod replace;
pub mod stats;
pub mod trace;
