//! Dataset input.
//!
//! Loads the bundled crop dataset and maps its columns onto raw records.

pub mod loader;

pub use loader::{load_dataset, Dataset};
