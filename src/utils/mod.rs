//! Utility functions and types for bitknn.

pub mod bits;

pub use bits::*;
