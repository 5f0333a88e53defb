//! Load a directory of per-branch extracts, run one full recompute with
//! every filter wide open, and print the resulting projections as JSON.
//!
//! Usage: summarize <data-dir> [bands.toml]

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};

use rtm_core::config::BandConfig;
use rtm_core::parsing::loader;
use rtm_core::services::dashboard::{DashboardRequest, DashboardSession, Recomputed};

fn run() -> Result<ExitCode> {
    let mut args = std::env::args().skip(1);
    let data_dir = match args.next() {
        Some(dir) => dir,
        None => {
            eprintln!("usage: summarize <data-dir> [bands.toml]");
            return Ok(ExitCode::FAILURE);
        }
    };

    let bands = match args.next() {
        Some(path) => BandConfig::from_path(Path::new(&path))
            .with_context(|| format!("failed to load band config from {path}"))?,
        None => BandConfig::default(),
    };

    let summary = loader::load_dir(Path::new(&data_dir))
        .with_context(|| format!("failed to load client extracts from {data_dir}"))?;
    eprintln!(
        "loaded {} rows from {} file(s) ({} coordinate cells failed coercion)",
        summary.rows_read, summary.files_read, summary.coordinate_failures
    );

    let mut session = DashboardSession::new(summary.dataset, bands);
    match session.recompute(&DashboardRequest::select_all()) {
        Recomputed::NoMatchingRecords { .. } => {
            eprintln!("no matching records");
            Ok(ExitCode::FAILURE)
        }
        Recomputed::Ready(data) => {
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> Result<ExitCode> {
    run()
}
