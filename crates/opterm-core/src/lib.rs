#![forbid(unsafe_code)]

//! Core: capability templates, terminal profiles, and key-sequence decoding.

pub mod capabilities;
pub mod key;
pub mod key_decoder;
pub mod key_map;
pub mod key_reader;
pub mod logging;
pub mod tparm;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, trace_span, warn};
