//! Loaders for per-branch client/route CSV extracts.
//!
//! The loader merges every extract in a directory into one [`Dataset`],
//! resolving the two known column-naming variants into the canonical
//! schema. A required column missing from any file is fatal before the
//! pipeline runs; a cell that fails numeric coercion only excludes that
//! value and is counted for diagnostics.
//!
//! [`Dataset`]: crate::core::dataset::Dataset

pub mod loader;


pub use loader::{load_dir, load_reader, LoadSummary};
