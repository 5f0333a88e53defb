pub mod config;
pub mod core;
pub mod error;
pub mod parsing;
pub mod services;
pub mod transformations;

pub use error::{DashboardError, Result};
