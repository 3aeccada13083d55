use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::info;
use serde::Serialize;

use super::database::NeoDatabase;
use super::model::{ApproachRecord, CloseApproach, NeoRecord};

/// Write query results to a file. Dispatch by extension (`.csv` / `.json`).
pub fn write_results<'a, I>(path: &Path, results: I, db: &NeoDatabase) -> Result<usize>
where
    I: IntoIterator<Item = &'a CloseApproach>,
{
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let as_json = match ext.as_str() {
        "csv" => false,
        "json" => true,
        other => bail!("Unsupported output extension: .{other}"),
    };

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let out = BufWriter::new(file);
    let count = if as_json {
        write_to_json(results, db, out)
    } else {
        write_to_csv(results, db, out)
    }
    .with_context(|| format!("writing {}", path.display()))?;
    info!("Wrote {count} close approaches to {}", path.display());
    Ok(count)
}

/// The NEO half of an output row. Unlinked approaches get a stand-in built
/// from their own designation.
fn neo_record(approach: &CloseApproach, db: &NeoDatabase) -> NeoRecord {
    match db.neo_of(approach) {
        Some(neo) => neo.serialize(),
        None => NeoRecord {
            designation: approach.designation.clone(),
            name: String::new(),
            diameter_km: 0.0,
            potentially_hazardous: false,
        },
    }
}

// ---------------------------------------------------------------------------
// CSV: one flat row per approach
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct CsvRow {
    datetime_utc: String,
    distance_au: f64,
    velocity_km_s: f64,
    designation: String,
    name: String,
    diameter_km: f64,
    potentially_hazardous: bool,
}

pub fn write_to_csv<'a, I, W>(results: I, db: &NeoDatabase, writer: W) -> Result<usize>
where
    I: IntoIterator<Item = &'a CloseApproach>,
    W: Write,
{
    let mut writer = csv::Writer::from_writer(writer);
    let mut count = 0;

    for approach in results {
        let ApproachRecord {
            datetime_utc,
            distance_au,
            velocity_km_s,
        } = approach.serialize();
        let NeoRecord {
            designation,
            name,
            diameter_km,
            potentially_hazardous,
        } = neo_record(approach, db);

        writer
            .serialize(CsvRow {
                datetime_utc,
                distance_au,
                velocity_km_s,
                designation,
                name,
                diameter_km,
                potentially_hazardous,
            })
            .context("writing CSV row")?;
        count += 1;
    }

    // An empty result still gets a header line.
    if count == 0 {
        writer
            .write_record([
                "datetime_utc",
                "distance_au",
                "velocity_km_s",
                "designation",
                "name",
                "diameter_km",
                "potentially_hazardous",
            ])
            .context("writing CSV header")?;
    }

    writer.flush().context("flushing CSV")?;
    Ok(count)
}

// ---------------------------------------------------------------------------
// JSON: array of approaches, each with a nested `neo` object
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct JsonEntry {
    #[serde(flatten)]
    approach: ApproachRecord,
    neo: NeoRecord,
}

pub fn write_to_json<'a, I, W>(results: I, db: &NeoDatabase, mut writer: W) -> Result<usize>
where
    I: IntoIterator<Item = &'a CloseApproach>,
    W: Write,
{
    let entries: Vec<JsonEntry> = results
        .into_iter()
        .map(|approach| JsonEntry {
            approach: approach.serialize(),
            neo: neo_record(approach, db),
        })
        .collect();

    serde_json::to_writer_pretty(&mut writer, &entries).context("serializing JSON")?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value as JsonValue};

    use super::*;
    use crate::data::model::NearEarthObject;

    fn sample_db() -> NeoDatabase {
        let neos = vec![
            NearEarthObject::new("433", false, Some("Eros"), Some("16.84")).unwrap(),
            NearEarthObject::new("2020 AB", true, None, None).unwrap(),
        ];
        let approaches = vec![
            CloseApproach::new("433", "1900-Jan-01 12:00", "0.35", "5.1").unwrap(),
            CloseApproach::new("2020 AB", "2020-Feb-02 02:02", "0.01", "20").unwrap(),
        ];
        NeoDatabase::new(neos, approaches)
    }

    #[test]
    fn test_write_to_csv() {
        let db = sample_db();
        let mut out = Vec::new();
        let count = write_to_csv(db.approaches(), &db, &mut out).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "datetime_utc,distance_au,velocity_km_s,designation,name,diameter_km,potentially_hazardous",
                "1900-01-01 12:00,0.35,5.1,433,Eros,16.84,false",
                "2020-02-02 02:02,0.01,20.0,2020 AB,,0.0,true",
            ]
        );
    }

    #[test]
    fn test_write_to_csv_empty_has_header() {
        let db = sample_db();
        let mut out = Vec::new();
        assert_eq!(write_to_csv(std::iter::empty::<&CloseApproach>(), &db, &mut out).unwrap(), 0);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("datetime_utc,distance_au"));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_write_to_json_nests_neo() {
        let db = sample_db();
        let mut out = Vec::new();
        write_to_json(db.approaches(), &db, &mut out).unwrap();

        let parsed: JsonValue = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            parsed,
            json!([
                {
                    "datetime_utc": "1900-01-01 12:00",
                    "distance_au": 0.35,
                    "velocity_km_s": 5.1,
                    "neo": {
                        "designation": "433",
                        "name": "Eros",
                        "diameter_km": 16.84,
                        "potentially_hazardous": false
                    }
                },
                {
                    "datetime_utc": "2020-02-02 02:02",
                    "distance_au": 0.01,
                    "velocity_km_s": 20.0,
                    "neo": {
                        "designation": "2020 AB",
                        "name": "",
                        "diameter_km": 0.0,
                        "potentially_hazardous": true
                    }
                }
            ])
        );
    }

    #[test]
    fn test_unlinked_approach_is_written_with_defaults() {
        let db = NeoDatabase::new(
            Vec::new(),
            vec![CloseApproach::new("ghost", "2000-Jan-01 00:00", "0.1", "1").unwrap()],
        );
        let mut out = Vec::new();
        write_to_json(db.approaches(), &db, &mut out).unwrap();
        let parsed: JsonValue = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["neo"]["designation"], "ghost");
        assert_eq!(parsed[0]["neo"]["diameter_km"], 0.0);
    }

    #[test]
    fn test_write_results_rejects_unknown_extension() {
        let db = sample_db();
        let err = write_results(Path::new("out.txt"), db.approaches(), &db).unwrap_err();
        assert!(err.to_string().contains(".txt"));
    }
}
