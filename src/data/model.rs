use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use super::time::{cd_to_datetime, datetime_to_str};

// ---------------------------------------------------------------------------
// Handles into the database arenas
// ---------------------------------------------------------------------------

/// Position of a [`NearEarthObject`] inside a [`NeoDatabase`](super::database::NeoDatabase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeoId(pub(crate) usize);

/// Position of a [`CloseApproach`] inside a [`NeoDatabase`](super::database::NeoDatabase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApproachId(pub(crate) usize);

// ---------------------------------------------------------------------------
// RecordError – why a single raw record could not become an entity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("invalid {field} value '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid date/time '{value}'")]
    InvalidDate { value: String },

    #[error("missing required field '{0}'")]
    MissingField(&'static str),
}

fn parse_float(field: &'static str, value: &str) -> Result<f64, RecordError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| RecordError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

/// Map the single-character `pha` flag of the NEO catalogue to a boolean.
pub fn hazard_flag(flag: &str) -> bool {
    flag.trim() == "Y"
}

// ---------------------------------------------------------------------------
// NearEarthObject
// ---------------------------------------------------------------------------

/// A near-Earth object: primary designation (unique), optional IAU name,
/// optional diameter in kilometres, and the potentially-hazardous flag.
///
/// `approaches` starts empty and is filled in by the database when it links
/// close approaches to their object.
#[derive(Debug, Clone, PartialEq)]
pub struct NearEarthObject {
    pub designation: String,
    pub name: Option<String>,
    /// Diameter in km; `None` when the catalogue does not know it.
    pub diameter: Option<f64>,
    pub hazardous: bool,
    pub(crate) approaches: Vec<ApproachId>,
}

impl NearEarthObject {
    /// Build a NEO from raw catalogue strings.
    ///
    /// An empty name becomes `None`. An empty, missing or `nan` diameter
    /// becomes `None`; any other non-numeric diameter is an error.
    pub fn new(
        designation: impl Into<String>,
        hazardous: bool,
        name: Option<&str>,
        diameter: Option<&str>,
    ) -> Result<Self, RecordError> {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        let diameter = match diameter.map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_float("diameter", raw)?).filter(|d| !d.is_nan()),
        };

        Ok(Self {
            designation: designation.into(),
            name,
            diameter,
            hazardous,
            approaches: Vec::new(),
        })
    }

    /// `"{designation} ({name})"`, or just the designation when unnamed.
    pub fn fullname(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({})", self.designation, name),
            None => self.designation.clone(),
        }
    }

    /// Handles of the linked close approaches, in load order.
    pub fn approach_ids(&self) -> &[ApproachId] {
        &self.approaches
    }

    /// Flat view for report writers. Unknown values are filled with defaults.
    pub fn serialize(&self) -> NeoRecord {
        NeoRecord {
            designation: self.designation.clone(),
            name: self.name.clone().unwrap_or_default(),
            diameter_km: self.diameter.unwrap_or(0.0),
            potentially_hazardous: self.hazardous,
        }
    }
}

impl fmt::Display for NearEarthObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let is_hazardous = if self.hazardous { "is" } else { "is not" };
        match self.diameter {
            Some(d) => write!(
                f,
                "NEO {} has a diameter of {d:.3} km and {is_hazardous} potentially hazardous.",
                self.fullname()
            ),
            None => write!(f, "NEO {} {is_hazardous} potentially hazardous.", self.fullname()),
        }
    }
}

/// Serialized form of a [`NearEarthObject`], in output column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeoRecord {
    pub designation: String,
    pub name: String,
    pub diameter_km: f64,
    pub potentially_hazardous: bool,
}

// ---------------------------------------------------------------------------
// CloseApproach
// ---------------------------------------------------------------------------

/// One close approach to Earth: UTC time of closest approach, nominal
/// distance in au and relative velocity in km/s.
///
/// `neo` is unset until the database links the approach to its object.
#[derive(Debug, Clone, PartialEq)]
pub struct CloseApproach {
    pub designation: String,
    pub time: NaiveDateTime,
    pub distance: f64,
    pub velocity: f64,
    pub(crate) neo: Option<NeoId>,
}

impl CloseApproach {
    /// Build an approach from raw CAD strings. `raw_time` uses the NASA
    /// calendar format, e.g. `1900-Jan-01 12:00`.
    pub fn new(
        designation: impl Into<String>,
        raw_time: &str,
        distance: &str,
        velocity: &str,
    ) -> Result<Self, RecordError> {
        Ok(Self {
            designation: designation.into(),
            time: cd_to_datetime(raw_time)?,
            distance: parse_float("distance", distance)?,
            velocity: parse_float("velocity", velocity)?,
            neo: None,
        })
    }

    pub fn time_str(&self) -> String {
        datetime_to_str(&self.time)
    }

    /// The linked NEO handle, `None` if the designation was never found.
    pub fn neo_id(&self) -> Option<NeoId> {
        self.neo
    }

    /// Human-readable line naming the NEO by full name when it is known.
    pub fn describe<'a>(&'a self, neo: Option<&'a NearEarthObject>) -> ApproachDisplay<'a> {
        ApproachDisplay {
            approach: self,
            neo,
        }
    }

    pub fn serialize(&self) -> ApproachRecord {
        ApproachRecord {
            datetime_utc: self.time_str(),
            distance_au: self.distance,
            velocity_km_s: self.velocity,
        }
    }
}

impl fmt::Display for CloseApproach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.describe(None).fmt(f)
    }
}

pub struct ApproachDisplay<'a> {
    approach: &'a CloseApproach,
    neo: Option<&'a NearEarthObject>,
}

impl fmt::Display for ApproachDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let who = match self.neo {
            Some(neo) => neo.fullname(),
            None => self.approach.designation.clone(),
        };
        write!(
            f,
            "At {}, '{who}' approaches Earth at a distance of {:.2} au and a velocity of {:.2} km/s.",
            self.approach.time_str(),
            self.approach.distance,
            self.approach.velocity
        )
    }
}

/// Serialized form of a [`CloseApproach`], in output column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApproachRecord {
    pub datetime_utc: String,
    pub distance_au: f64,
    pub velocity_km_s: f64,
}
