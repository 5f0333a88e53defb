use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::core::dataset::Dataset;
use crate::core::domain::{ClientRecord, WEEKDAY_COUNT};
use crate::error::{DashboardError, Result};

/// Outcome of merging a directory of extracts.
#[derive(Debug)]
pub struct LoadSummary {
    pub dataset: Dataset,
    pub files_read: usize,
    pub rows_read: usize,
    /// Non-blank coordinate cells that failed numeric coercion.
    pub coordinate_failures: usize,
    /// Non-blank weekday visit-count cells that failed numeric coercion.
    pub weekday_failures: usize,
}

/// Records parsed from a single source plus its coercion counters.
#[derive(Debug, Default)]
pub struct FileLoad {
    pub records: Vec<ClientRecord>,
    pub coordinate_failures: usize,
    pub weekday_failures: usize,
}

const CLIENT_ID: &[&str] = &["ID_SAP", "ID SAP"];
const CLIENT_NAME: &[&str] = &["CLIENTE", "NOMBRE_CLIENTE"];
const OPERATING_UNIT: &[&str] = &["CENTRO", "UNIDAD_OPERATIVA"];
const COMMERCIAL_FIGURE: &[&str] = &["Descripción Tipo", "DESCRIPCION_TIPO"];
const ROUTE: &[&str] = &["Ruta ZPV", "RUTA_ZPV", "RUTA"];
const DISTRIBUTION_GROUP: &[&str] = &["GRUPO_RM1", "GRUPO RM1"];
const GEC_GROUP: &[&str] = &["GEC_RTM", "GEC RTM"];
const SALES_METHOD: &[&str] = &["Método_venta ZPV", "METODO_VENTA_ZPV"];
const RHYTHM: &[&str] = &["Ritmo ZPV", "RITMO_ZPV"];
const FREQUENCY_CODE: &[&str] = &["Fv ZPV", "FV_ZPV", "FRECUENCIA"];
const LATITUDE: &[&str] = &["latitud", "LATITUD", "lat"];
const LONGITUDE: &[&str] = &["longitud", "LONGITUD", "lon"];

const WEEKDAYS: [&[&str]; WEEKDAY_COUNT] = [
    &["ZPV_L", "VISITAS_L"],
    &["ZPV_M", "VISITAS_M"],
    &["ZPV_R", "VISITAS_R"],
    &["ZPV_J", "VISITAS_J"],
    &["ZPV_V", "VISITAS_V"],
    &["ZPV_S", "VISITAS_S"],
    &["ZPV_D", "VISITAS_D"],
];

/// Resolved column positions for one source file. Optional columns stay
/// `None` when absent; required ones fail the load.
struct ColumnMap {
    client_id: usize,
    client_name: Option<usize>,
    operating_unit: usize,
    commercial_figure: usize,
    route: usize,
    distribution_group: usize,
    gec_group: Option<usize>,
    sales_method: Option<usize>,
    rhythm: Option<usize>,
    frequency_code: Option<usize>,
    weekdays: [Option<usize>; WEEKDAY_COUNT],
    latitude: usize,
    longitude: usize,
}

fn header_matches(header: &str, candidate: &str) -> bool {
    header.trim_start_matches('\u{feff}').trim() == candidate
}

fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| names.iter().any(|n| header_matches(h, n)))
}

fn require_column(
    headers: &csv::StringRecord,
    names: &'static [&'static str],
    file: &str,
) -> Result<usize> {
    find_column(headers, names).ok_or_else(|| DashboardError::MissingColumn {
        column: names[0],
        file: file.to_string(),
    })
}

fn resolve_columns(headers: &csv::StringRecord, file: &str) -> Result<ColumnMap> {
    let mut weekdays = [None; WEEKDAY_COUNT];
    for (slot, names) in weekdays.iter_mut().zip(WEEKDAYS.iter()) {
        *slot = find_column(headers, names);
    }

    Ok(ColumnMap {
        client_id: require_column(headers, CLIENT_ID, file)?,
        client_name: find_column(headers, CLIENT_NAME),
        operating_unit: require_column(headers, OPERATING_UNIT, file)?,
        commercial_figure: require_column(headers, COMMERCIAL_FIGURE, file)?,
        route: require_column(headers, ROUTE, file)?,
        distribution_group: require_column(headers, DISTRIBUTION_GROUP, file)?,
        gec_group: find_column(headers, GEC_GROUP),
        sales_method: find_column(headers, SALES_METHOD),
        rhythm: find_column(headers, RHYTHM),
        frequency_code: find_column(headers, FREQUENCY_CODE),
        weekdays,
        latitude: require_column(headers, LATITUDE, file)?,
        longitude: require_column(headers, LONGITUDE, file)?,
    })
}

fn cell(row: &csv::StringRecord, idx: usize) -> &str {
    row.get(idx).unwrap_or("")
}

fn optional_cell(row: &csv::StringRecord, idx: Option<usize>) -> String {
    idx.map(|i| cell(row, i).trim().to_string())
        .unwrap_or_default()
}

/// Coerce a cell to `f64`. Accepts a comma decimal separator, which shows
/// up in some branch exports. Returns `(value, failed)` where `failed`
/// marks a non-blank cell that did not parse.
fn coerce_f64(raw: &str) -> (Option<f64>, bool) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return (None, false);
    }
    if let Ok(v) = trimmed.parse::<f64>() {
        return (Some(v), false);
    }
    if let Ok(v) = trimmed.replace(',', ".").parse::<f64>() {
        return (Some(v), false);
    }
    (None, true)
}

/// Parse one CSV source into canonical records.
pub fn load_reader<R: Read>(reader: R, source: &str) -> Result<FileLoad> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|source_err| DashboardError::Csv {
            file: source.to_string(),
            source: source_err,
        })?
        .clone();
    let columns = resolve_columns(&headers, source)?;

    let mut load = FileLoad::default();
    for row in csv_reader.records() {
        let row = row.map_err(|source_err| DashboardError::Csv {
            file: source.to_string(),
            source: source_err,
        })?;

        let (latitude, lat_failed) = coerce_f64(cell(&row, columns.latitude));
        let (longitude, lon_failed) = coerce_f64(cell(&row, columns.longitude));
        load.coordinate_failures += usize::from(lat_failed) + usize::from(lon_failed);

        let mut weekday_visits = [None; WEEKDAY_COUNT];
        for (slot, idx) in weekday_visits.iter_mut().zip(columns.weekdays.iter()) {
            if let Some(i) = idx {
                let (value, failed) = coerce_f64(cell(&row, *i));
                *slot = value;
                load.weekday_failures += usize::from(failed);
            }
        }

        load.records.push(ClientRecord {
            client_id: cell(&row, columns.client_id).trim().to_string(),
            client_name: optional_cell(&row, columns.client_name),
            operating_unit: cell(&row, columns.operating_unit).trim().to_string(),
            commercial_figure: cell(&row, columns.commercial_figure).trim().to_string(),
            route: cell(&row, columns.route).trim().to_string(),
            distribution_group: cell(&row, columns.distribution_group).trim().to_string(),
            gec_group: optional_cell(&row, columns.gec_group),
            sales_method: optional_cell(&row, columns.sales_method),
            rhythm: optional_cell(&row, columns.rhythm),
            frequency_code: optional_cell(&row, columns.frequency_code),
            weekday_visits,
            latitude,
            longitude,
        });
    }

    if load.coordinate_failures > 0 {
        log::warn!(
            "{}: {} coordinate cells failed numeric coercion",
            source,
            load.coordinate_failures
        );
    }

    Ok(load)
}

/// Merge every `*.csv` extract under `dir` into one dataset. Files are
/// read in lexicographic order so the merged row order is reproducible.
pub fn load_dir(dir: &Path) -> Result<LoadSummary> {
    let entries = std::fs::read_dir(dir).map_err(|source| DashboardError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect();
    paths.sort();

    if paths.is_empty() {
        return Err(DashboardError::NoInputFiles(dir.to_path_buf()));
    }

    let mut records = Vec::new();
    let mut coordinate_failures = 0;
    let mut weekday_failures = 0;
    for path in &paths {
        let file = File::open(path).map_err(|source| DashboardError::Io {
            path: path.clone(),
            source,
        })?;
        let name = path.display().to_string();
        let mut load = load_reader(file, &name)?;
        coordinate_failures += load.coordinate_failures;
        weekday_failures += load.weekday_failures;
        records.append(&mut load.records);
    }

    let rows_read = records.len();
    log::info!(
        "loaded {} rows from {} extract file(s) in {}",
        rows_read,
        paths.len(),
        dir.display()
    );

    Ok(LoadSummary {
        dataset: Dataset::new(records),
        files_read: paths.len(),
        rows_read,
        coordinate_failures,
        weekday_failures,
    })
}
