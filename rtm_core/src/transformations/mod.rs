//! Data transformation layer: the cascading filter engine and the
//! map-table preparation (coordinate validity + per-client dedup).
//!
//! These run between the loader and the projection services. The filter
//! output feeds the aggregation and compliance services directly; only the
//! map view goes through `cleaning`, so visit-count totals are never
//! affected by coordinate drops or deduplication.

pub mod cleaning;
pub mod filtering;

pub use cleaning::{dedup_by_client, drop_missing_coordinates, prepare_map_table, MapTable};
pub use filtering::{apply_cascade, stage_options, CascadeResult, Selection, StageSnapshot, StageSpec};
