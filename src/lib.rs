//! # flashlight
//!
//! Static selection of JVM methods worth instrumenting. Compiled classes are
//! read without being loaded or run; each method is scored from its bytecode
//! alone and the interesting ones are emitted as an include list for a
//! method-instrumentation agent.
//!
//! ## Architecture
//!
//! - **scan**: class roots (directories, jars) and their class resources
//! - **catalog**: memory-mapped jar access
//! - **classfile**: class-file decoding into flat instruction streams
//! - **classify**: single-pass per-method counters
//! - **rules**: category membership from counters and configuration
//! - **report**: per-class aggregation and the three output renderings
//! - **pipeline**: parallel scan driver with one merge point
//! - **config** / **cli**: run settings and command-line surface

pub mod catalog;
pub mod classfile;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod scan;

pub use config::Config;
pub use error::{DecodeError, ScanError};
pub use pipeline::{ScanOutcome, run};
pub use report::AggregatedReport;
pub use rules::{Category, ClassificationResult};
