//! Projection services.
//!
//! Each service consumes the same filtered table and produces one
//! independent projection for a renderer: the map point layer, the
//! hierarchical client breakdown, the weekday visit profile, the route
//! compliance table, and the client listing. `dashboard` ties them
//! together behind a single `recompute` entry point.

pub mod colors;
pub mod compliance;
pub mod dashboard;
pub mod hierarchy;
pub mod map_view;
pub mod roster;
pub mod visits;

pub use colors::{color_of, LegendCache, Rgba};
pub use dashboard::{DashboardData, DashboardRequest, DashboardSession, Recomputed};
