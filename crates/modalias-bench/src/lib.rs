#![deny(clippy::all)]
#![warn(clippy::pedantic)]

//! Benchmark harness for modalias.
//!
//! Run benchmarks with: `cargo bench -p modalias-bench`
