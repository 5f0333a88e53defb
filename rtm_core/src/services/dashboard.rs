//! Session state and the `recompute` entry point.
//!
//! The core holds no execution loop: the UI layer calls
//! [`DashboardSession::recompute`] on every interaction and renders the
//! returned projections. A session owns the dataset, the band config and
//! the legend cache; serving several sessions means one instance each,
//! since the active grouping field differs per session.

use serde::Serialize;

use crate::config::BandConfig;
use crate::core::dataset::Dataset;
use crate::core::domain::Field;
use crate::services::colors::LegendCache;
use crate::services::compliance::{self, ComplianceReport};
use crate::services::hierarchy::{self, HierarchyNode, DEFAULT_LEVELS};
use crate::services::map_view::{self, ColorBy, MapData};
use crate::services::roster::{self, ClientRow};
use crate::services::visits::{self, WeekdayProfile};
use crate::transformations::filtering::{apply_cascade, Selection, StageSnapshot, StageSpec};

/// Sidebar stage order: operating unit is a single pick (so not
/// select-all by default), the dependent stages start wide open.
pub const DEFAULT_STAGES: [StageSpec; 4] = [
    StageSpec {
        field: Field::OperatingUnit,
        default_select_all: false,
    },
    StageSpec {
        field: Field::CommercialFigure,
        default_select_all: true,
    },
    StageSpec {
        field: Field::Route,
        default_select_all: true,
    },
    StageSpec {
        field: Field::DistributionGroup,
        default_select_all: true,
    },
];

/// Resolved selection for one stage.
#[derive(Debug, Clone)]
pub struct StageSelection {
    pub field: Field,
    pub selection: Selection,
}

/// Everything the UI supplies per interaction: one selection per filter
/// stage plus the grouping field used for point coloring.
#[derive(Debug, Clone)]
pub struct DashboardRequest {
    pub stages: Vec<StageSelection>,
    pub color_by: ColorBy,
}

impl DashboardRequest {
    /// Every default stage wide open, no point coloring.
    pub fn select_all() -> Self {
        Self {
            stages: DEFAULT_STAGES
                .iter()
                .map(|spec| StageSelection {
                    field: spec.field,
                    selection: Selection::All,
                })
                .collect(),
            color_by: ColorBy::None,
        }
    }

    /// Initial widget state over `dataset`: stages flagged
    /// `default_select_all` start wide open, the rest start on the first
    /// option of their global domain (a single pick).
    pub fn initial(dataset: &Dataset) -> Self {
        Self {
            stages: DEFAULT_STAGES
                .iter()
                .map(|spec| {
                    let selection = if spec.default_select_all {
                        Selection::All
                    } else {
                        match dataset.field_domain(spec.field).into_iter().next() {
                            Some(first) => Selection::chosen([first]),
                            None => Selection::All,
                        }
                    };
                    StageSelection {
                        field: spec.field,
                        selection,
                    }
                })
                .collect(),
            color_by: ColorBy::None,
        }
    }
}

/// The three renderer projections plus filter snapshots, all computed
/// from the same filtered subset.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub stages: Vec<StageSnapshot>,
    /// Rows surviving the cascade (before any map-only cleaning).
    pub record_count: usize,
    pub map: MapData,
    pub hierarchy: Vec<HierarchyNode>,
    pub compliance: ComplianceReport,
    pub weekday_profile: WeekdayProfile,
    /// One listing entry per filtered row, duplicates and all.
    pub clients: Vec<ClientRow>,
}

/// Outcome of a recompute. An empty filter result is an explicit,
/// non-error condition the caller surfaces to the user; it is distinct
/// from load or parse failures, which arrive as `DashboardError` before
/// a session exists.
#[derive(Debug, Clone, Serialize)]
pub enum Recomputed {
    NoMatchingRecords { stages: Vec<StageSnapshot> },
    Ready(Box<DashboardData>),
}

/// One analyst session over one loaded dataset.
#[derive(Debug)]
pub struct DashboardSession {
    dataset: Dataset,
    bands: BandConfig,
    legend_cache: LegendCache,
}

impl DashboardSession {
    pub fn new(dataset: Dataset, bands: BandConfig) -> Self {
        Self {
            dataset,
            bands,
            legend_cache: LegendCache::new(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Run the full pipeline for one interaction: cascade the filters,
    /// then build the map, hierarchy, weekday and compliance projections
    /// from the same filtered subset.
    pub fn recompute(&mut self, request: &DashboardRequest) -> Recomputed {
        let stages: Vec<(Field, Selection)> = request
            .stages
            .iter()
            .map(|s| (s.field, s.selection.clone()))
            .collect();
        let filtered = apply_cascade(&self.dataset.records, &stages);

        if filtered.is_empty() {
            log::info!("recompute: no records match the current selection");
            return Recomputed::NoMatchingRecords {
                stages: filtered.stages,
            };
        }
        log::debug!("recompute: {} row(s) after filters", filtered.rows.len());

        let map = map_view::build_map_data(
            &filtered.rows,
            request.color_by,
            &mut self.legend_cache,
            &self.dataset,
        );
        let hierarchy = hierarchy::aggregate(&filtered.rows, &DEFAULT_LEVELS, |r| {
            r.client_id.as_str()
        });
        let compliance = compliance::evaluate(&filtered.rows, &self.bands);
        let weekday_profile = visits::weekday_profile(&filtered.rows);
        let clients = roster::client_roster(&filtered.rows);

        Recomputed::Ready(Box::new(DashboardData {
            record_count: filtered.rows.len(),
            stages: filtered.stages,
            map,
            hierarchy,
            compliance,
            weekday_profile,
            clients,
        }))
    }
}
