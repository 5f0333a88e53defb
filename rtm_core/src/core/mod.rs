//! Core domain models for route-to-market client data.
//!
//! This module defines the canonical typed record the whole pipeline
//! operates on, plus the dataset wrapper that exposes global field domains.

pub mod dataset;
pub mod domain;
