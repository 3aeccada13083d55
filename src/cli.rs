//! Command-line argument definitions

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use neo_explorer::data::time::parse_date;
use neo_explorer::FilterCriteria;

#[derive(Parser)]
#[command(name = "neo-explorer")]
#[command(about = "Explore near-Earth objects and their close approaches")]
#[command(version)]
pub struct Cli {
    /// CSV file of near-Earth objects
    #[arg(long, env = "NEO_FILE", default_value = "data/neos.csv", global = true)]
    pub neofile: PathBuf,

    /// JSON file of close approaches
    #[arg(long, env = "CAD_FILE", default_value = "data/cad.json", global = true)]
    pub cadfile: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up a single NEO by designation or name
    Inspect(InspectArgs),

    /// Filter close approaches
    Query(QueryArgs),
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct InspectTarget {
    /// Primary designation, e.g. 433
    #[arg(short, long)]
    pub pdes: Option<String>,

    /// IAU name, e.g. Eros (case-insensitive)
    #[arg(short, long)]
    pub name: Option<String>,
}

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub target: InspectTarget,

    /// Also list every close approach of the NEO
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args)]
pub struct QueryArgs {
    /// Only approaches on this date (YYYY-MM-DD)
    #[arg(short, long, value_parser = date_arg)]
    pub date: Option<NaiveDate>,

    /// Only approaches on or after this date (YYYY-MM-DD)
    #[arg(short, long, value_parser = date_arg)]
    pub start_date: Option<NaiveDate>,

    /// Only approaches on or before this date (YYYY-MM-DD)
    #[arg(short, long, value_parser = date_arg)]
    pub end_date: Option<NaiveDate>,

    /// Minimum approach distance in au
    #[arg(long)]
    pub min_distance: Option<f64>,

    /// Maximum approach distance in au
    #[arg(long)]
    pub max_distance: Option<f64>,

    /// Minimum relative velocity in km/s
    #[arg(long)]
    pub min_velocity: Option<f64>,

    /// Maximum relative velocity in km/s
    #[arg(long)]
    pub max_velocity: Option<f64>,

    /// Minimum NEO diameter in km
    #[arg(long)]
    pub min_diameter: Option<f64>,

    /// Maximum NEO diameter in km
    #[arg(long)]
    pub max_diameter: Option<f64>,

    /// Only potentially hazardous NEOs
    #[arg(long, conflicts_with = "not_hazardous")]
    pub hazardous: bool,

    /// Only NEOs that are not potentially hazardous
    #[arg(long)]
    pub not_hazardous: bool,

    /// Stop after this many results (0 = all)
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Write results to a .csv or .json file instead of stdout
    #[arg(short, long)]
    pub outfile: Option<PathBuf>,
}

impl QueryArgs {
    pub fn criteria(&self) -> FilterCriteria {
        let hazardous = match (self.hazardous, self.not_hazardous) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        FilterCriteria {
            date: self.date,
            start_date: self.start_date,
            end_date: self.end_date,
            distance_min: self.min_distance,
            distance_max: self.max_distance,
            velocity_min: self.min_velocity,
            velocity_max: self.max_velocity,
            diameter_min: self.min_diameter,
            diameter_max: self.max_diameter,
            hazardous,
        }
    }
}

fn date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}
