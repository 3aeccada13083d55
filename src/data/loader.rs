use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{hazard_flag, CloseApproach, NearEarthObject, RecordError};

// ---------------------------------------------------------------------------
// Load results
// ---------------------------------------------------------------------------

/// A raw record that could not be turned into an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    /// 0-based data row (header excluded).
    pub row: usize,
    pub error: RecordError,
}

/// Entities built from a source, plus the rows that were dropped.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedRecord>,
}

impl<T> Loaded<T> {
    fn new() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn push(&mut self, row: usize, result: Result<T, RecordError>, source: &str) {
        match result {
            Ok(record) => self.records.push(record),
            Err(error) => {
                warn!("Skipping {source} row {row}: {error}");
                self.skipped.push(SkippedRecord { row, error });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// NEO CSV loader
// ---------------------------------------------------------------------------

/// Read NEOs from the NASA small-body CSV (`neos.csv`).
pub fn load_neos(path: &Path) -> Result<Loaded<NearEarthObject>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let loaded = load_neos_from_reader(BufReader::new(file))
        .with_context(|| format!("loading NEOs from {}", path.display()))?;
    info!(
        "Loaded {} NEOs from {} ({} skipped)",
        loaded.records.len(),
        path.display(),
        loaded.skipped.len()
    );
    Ok(loaded)
}

/// CSV layout: header row; the columns `pdes`, `name`, `diameter` and `pha`
/// are used, anything else is ignored. `name` and `diameter` may be empty.
pub fn load_neos_from_reader<R: Read>(reader: R) -> Result<Loaded<NearEarthObject>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };
    let pdes_idx = column("pdes")?;
    let name_idx = column("name")?;
    let diameter_idx = column("diameter")?;
    let pha_idx = column("pha")?;

    let mut loaded = Loaded::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let neo = match record.get(pdes_idx).map(str::trim) {
            None | Some("") => Err(RecordError::MissingField("pdes")),
            Some(pdes) => NearEarthObject::new(
                pdes,
                hazard_flag(record.get(pha_idx).unwrap_or("")),
                record.get(name_idx),
                record.get(diameter_idx),
            ),
        };
        loaded.push(row_no, neo, "NEO");
    }

    Ok(loaded)
}

// ---------------------------------------------------------------------------
// Close-approach JSON loader
// ---------------------------------------------------------------------------

/// Payload of the JPL SBDB close-approach API (`cad.json`).
///
/// ```json
/// {
///   "fields": ["des", "orbit_id", "jd", "cd", "dist", ..., "v_rel", ...],
///   "data": [["170903", "105", "2415020.507", "1900-Jan-01 00:11", "0.0921", ...], ...]
/// }
/// ```
#[derive(Debug, Deserialize)]
struct CadPayload {
    fields: Vec<String>,
    data: Vec<Vec<JsonValue>>,
}

/// Read close approaches from the CAD JSON file.
pub fn load_approaches(path: &Path) -> Result<Loaded<CloseApproach>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let loaded = load_approaches_from_reader(BufReader::new(file))
        .with_context(|| format!("loading close approaches from {}", path.display()))?;
    info!(
        "Loaded {} close approaches from {} ({} skipped)",
        loaded.records.len(),
        path.display(),
        loaded.skipped.len()
    );
    Ok(loaded)
}

pub fn load_approaches_from_reader<R: Read>(reader: R) -> Result<Loaded<CloseApproach>> {
    let payload: CadPayload = serde_json::from_reader(reader).context("parsing CAD JSON")?;

    let field = |name: &str| {
        payload
            .fields
            .iter()
            .position(|f| f == name)
            .with_context(|| format!("CAD JSON missing '{name}' field"))
    };
    let columns = CadColumns {
        des: field("des")?,
        cd: field("cd")?,
        dist: field("dist")?,
        v_rel: field("v_rel")?,
    };

    let mut loaded = Loaded::new();

    for (row_no, row) in payload.data.iter().enumerate() {
        loaded.push(row_no, columns.approach(row), "close approach");
    }

    Ok(loaded)
}

/// Positions of the used fields within a CAD data row.
struct CadColumns {
    des: usize,
    cd: usize,
    dist: usize,
    v_rel: usize,
}

impl CadColumns {
    fn approach(&self, row: &[JsonValue]) -> Result<CloseApproach, RecordError> {
        let des = json_field(row, self.des, "des")?;
        let cd = json_field(row, self.cd, "cd")?;
        let dist = json_field(row, self.dist, "dist")?;
        let v_rel = json_field(row, self.v_rel, "v_rel")?;
        CloseApproach::new(des, &cd, &dist, &v_rel)
    }
}

/// Cell as text. The API sends strings, but plain numbers are accepted too.
fn json_field(row: &[JsonValue], idx: usize, name: &'static str) -> Result<String, RecordError> {
    match row.get(idx) {
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(JsonValue::Number(n)) => Ok(n.to_string()),
        _ => Err(RecordError::MissingField(name)),
    }
}
