//! Analysis modules.
//!
//! Numeric coercion and the record aggregator that produces the
//! table and chart views.

pub mod aggregator;
pub mod coerce;

pub use aggregator::*;
