use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use serde_json::json;

use neo_explorer::data::time::CD_FORMAT;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

const NAMES: [&str; 8] = [
    "Eros", "Apophis", "Bennu", "Ganymed", "Icarus", "Toutatis", "Geographos", "Phaethon",
];

const NEO_COUNT: usize = 40;
const APPROACH_COUNT: usize = 200;

/// Writes `neos.csv` and `cad.json` into the directory given as the first
/// argument (default `data/`). Some NEOs have no name or no diameter, and
/// one approach references a designation missing from the NEO file.
fn main() -> Result<()> {
    let out_dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "data".into()));
    fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    // -- neos.csv --
    let neo_path = out_dir.join("neos.csv");
    let mut csv_out = csv::Writer::from_path(&neo_path).context("creating neos.csv")?;
    csv_out.write_record(["id", "pdes", "name", "pha", "diameter", "albedo"])?;

    let mut designations = Vec::with_capacity(NEO_COUNT);
    for i in 0..NEO_COUNT {
        let pdes = if i < NAMES.len() {
            format!("{}", 433 + i * 1000)
        } else {
            format!("2020 {}{}", (b'A' + (i % 26) as u8) as char, i)
        };
        let name = NAMES.get(i).copied().unwrap_or("");
        let pha = if rng.chance(0.2) { "Y" } else { "N" };
        let diameter = if rng.chance(0.6) {
            format!("{:.3}", rng.range(0.01, 20.0))
        } else {
            String::new()
        };
        let albedo = format!("{:.3}", rng.range(0.05, 0.5));

        csv_out.write_record([format!("a{i:07}"), pdes.clone(), name.into(), pha.into(), diameter, albedo])?;
        designations.push(pdes);
    }
    csv_out.flush()?;

    // -- cad.json --
    let epoch = NaiveDate::from_ymd_opt(1900, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("building epoch")?;

    let mut rows = Vec::with_capacity(APPROACH_COUNT + 1);
    for _ in 0..APPROACH_COUNT {
        let des = &designations[(rng.next_u64() as usize) % designations.len()];
        let minutes = (rng.range(0.0, 200.0 * 365.25 * 24.0 * 60.0)) as i64;
        let cd = (epoch + Duration::minutes(minutes)).format(CD_FORMAT).to_string();
        let dist = rng.range(0.0001, 0.5);
        let v_rel = rng.range(1.0, 40.0);
        rows.push(json!([des, cd, format!("{dist:.6}"), format!("{v_rel:.4}")]));
    }
    rows.push(json!(["ORPHAN", "2000-Jan-01 00:00", "0.25", "10.0"]));

    let payload = json!({
        "signature": {"source": "generate_sample", "version": "1.0"},
        "count": rows.len().to_string(),
        "fields": ["des", "cd", "dist", "v_rel"],
        "data": rows,
    });
    let cad_path = out_dir.join("cad.json");
    fs::write(&cad_path, serde_json::to_string_pretty(&payload)?)
        .with_context(|| format!("writing {}", cad_path.display()))?;

    println!(
        "Wrote {NEO_COUNT} NEOs to {} and {} close approaches to {}",
        neo_path.display(),
        APPROACH_COUNT + 1,
        cad_path.display()
    );
    Ok(())
}
