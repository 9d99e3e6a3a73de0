//! Utils Module - Helper Functions & Shared Utilities

pub mod cache;
pub mod geo;

pub use cache::*;
pub use geo::*;
