use std::fmt;

use chrono::NaiveDate;

use super::model::{CloseApproach, NearEarthObject};

// ---------------------------------------------------------------------------
// Filter criteria: every field optional, unset means "no constraint"
// ---------------------------------------------------------------------------

/// User-facing query options. Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub distance_min: Option<f64>,
    pub distance_max: Option<f64>,
    pub velocity_min: Option<f64>,
    pub velocity_max: Option<f64>,
    pub diameter_min: Option<f64>,
    pub diameter_max: Option<f64>,
    pub hazardous: Option<bool>,
}

// ---------------------------------------------------------------------------
// AttributeFilter – one compiled predicate over a close approach
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ge,
    Le,
}

impl Comparison {
    /// `false` whenever the operands are unordered (NaN).
    fn holds<T: PartialOrd>(self, lhs: &T, rhs: &T) -> bool {
        match self {
            Comparison::Eq => lhs == rhs,
            Comparison::Ge => lhs >= rhs,
            Comparison::Le => lhs <= rhs,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Comparison::Eq => "==",
            Comparison::Ge => ">=",
            Comparison::Le => "<=",
        };
        f.write_str(op)
    }
}

/// A single predicate: an attribute of the approach (or its NEO), a
/// comparison and a reference value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeFilter {
    /// Calendar date of the approach, time of day ignored.
    Date(Comparison, NaiveDate),
    Distance(Comparison, f64),
    Velocity(Comparison, f64),
    /// Diameter of the linked NEO. Unknown diameters never match.
    Diameter(Comparison, f64),
    /// Hazard flag of the linked NEO.
    Hazardous(bool),
}

impl AttributeFilter {
    /// Test one approach. Filters on NEO attributes fail for unlinked approaches.
    pub fn matches(&self, approach: &CloseApproach, neo: Option<&NearEarthObject>) -> bool {
        match *self {
            AttributeFilter::Date(op, date) => op.holds(&approach.time.date(), &date),
            AttributeFilter::Distance(op, value) => op.holds(&approach.distance, &value),
            AttributeFilter::Velocity(op, value) => op.holds(&approach.velocity, &value),
            AttributeFilter::Diameter(op, value) => neo
                .and_then(|n| n.diameter)
                .is_some_and(|d| op.holds(&d, &value)),
            AttributeFilter::Hazardous(flag) => neo.is_some_and(|n| n.hazardous == flag),
        }
    }
}

impl fmt::Display for AttributeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeFilter::Date(op, v) => write!(f, "date {op} {v}"),
            AttributeFilter::Distance(op, v) => write!(f, "distance {op} {v}"),
            AttributeFilter::Velocity(op, v) => write!(f, "velocity {op} {v}"),
            AttributeFilter::Diameter(op, v) => write!(f, "diameter {op} {v}"),
            AttributeFilter::Hazardous(v) => write!(f, "hazardous == {v}"),
        }
    }
}

/// Compile criteria into predicates. Approach-local filters come first so
/// the scan rejects most records before looking at the NEO.
pub fn create_filters(criteria: &FilterCriteria) -> Vec<AttributeFilter> {
    use AttributeFilter::*;
    use Comparison::*;

    let candidates = [
        criteria.date.map(|v| Date(Eq, v)),
        criteria.start_date.map(|v| Date(Ge, v)),
        criteria.end_date.map(|v| Date(Le, v)),
        criteria.distance_min.map(|v| Distance(Ge, v)),
        criteria.distance_max.map(|v| Distance(Le, v)),
        criteria.velocity_min.map(|v| Velocity(Ge, v)),
        criteria.velocity_max.map(|v| Velocity(Le, v)),
        criteria.hazardous.map(Hazardous),
        criteria.diameter_min.map(|v| Diameter(Ge, v)),
        criteria.diameter_max.map(|v| Diameter(Le, v)),
    ];
    candidates.into_iter().flatten().collect()
}

/// Cap a result stream at `n` items. `None` or `Some(0)` means unlimited.
pub fn limit<I: Iterator>(iter: I, n: Option<usize>) -> std::iter::Take<I> {
    let n = match n {
        None | Some(0) => usize::MAX,
        Some(n) => n,
    };
    iter.take(n)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::data::database::NeoDatabase;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_db() -> NeoDatabase {
        let neos = vec![
            NearEarthObject::new("433", false, Some("Eros"), Some("16.84")).unwrap(),
            NearEarthObject::new("99942", true, Some("Apophis"), Some("0.37")).unwrap(),
            NearEarthObject::new("2020 AB", true, None, None).unwrap(),
        ];
        let approaches = vec![
            CloseApproach::new("433", "2020-Jan-01 00:00", "0.35", "5.1").unwrap(),
            CloseApproach::new("99942", "2020-Jan-01 23:59", "0.02", "7.4").unwrap(),
            CloseApproach::new("2020 AB", "2020-Jan-02 12:00", "0.04", "12.0").unwrap(),
            CloseApproach::new("99942", "2020-Mar-15 06:30", "0.30", "9.9").unwrap(),
            CloseApproach::new("ghost", "2020-Jan-01 10:00", "0.01", "3.0").unwrap(),
        ];
        NeoDatabase::new(neos, approaches)
    }

    fn run(db: &NeoDatabase, criteria: &FilterCriteria) -> Vec<(String, String)> {
        let filters = create_filters(criteria);
        db.query(&filters)
            .map(|a| (a.designation.clone(), a.time_str()))
            .collect()
    }

    #[test]
    fn test_no_criteria_compiles_to_nothing() {
        assert!(create_filters(&FilterCriteria::default()).is_empty());
        let db = sample_db();
        assert_eq!(run(&db, &FilterCriteria::default()).len(), 5);
    }

    #[test]
    fn test_exact_date_ignores_time_of_day() {
        let db = sample_db();
        let criteria = FilterCriteria {
            date: Some(day(2020, 1, 1)),
            ..Default::default()
        };
        let got: Vec<String> = run(&db, &criteria).into_iter().map(|(d, _)| d).collect();
        assert_eq!(got, vec!["433", "99942", "ghost"]);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let db = sample_db();
        let criteria = FilterCriteria {
            start_date: Some(day(2020, 1, 2)),
            end_date: Some(day(2020, 3, 15)),
            ..Default::default()
        };
        let got = run(&db, &criteria);
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].1, "2020-01-02 12:00");
        assert_eq!(got[1].1, "2020-03-15 06:30");
    }

    #[test]
    fn test_distance_and_velocity_bounds() {
        let db = sample_db();
        let criteria = FilterCriteria {
            distance_max: Some(0.30),
            velocity_min: Some(7.4),
            ..Default::default()
        };
        let got: Vec<String> = run(&db, &criteria).into_iter().map(|(d, _)| d).collect();
        assert_eq!(got, vec!["99942", "2020 AB", "99942"]);
    }

    #[test]
    fn test_hazardous_subset_and_intersection() {
        let db = sample_db();
        let hazardous = FilterCriteria {
            hazardous: Some(true),
            ..Default::default()
        };
        let got = run(&db, &hazardous);
        assert_eq!(got.len(), 3);
        assert!(got.iter().all(|(d, _)| d == "99942" || d == "2020 AB"));

        let close_and_hazardous = FilterCriteria {
            hazardous: Some(true),
            distance_max: Some(0.03),
            ..Default::default()
        };
        let got = run(&db, &close_and_hazardous);
        assert_eq!(got, vec![("99942".to_string(), "2020-01-01 23:59".to_string())]);

        let safe = FilterCriteria {
            hazardous: Some(false),
            ..Default::default()
        };
        // The orphan has no NEO and so matches neither flag.
        let got: Vec<String> = run(&db, &safe).into_iter().map(|(d, _)| d).collect();
        assert_eq!(got, vec!["433"]);
    }

    #[test]
    fn test_unknown_diameter_never_matches() {
        let db = sample_db();
        let any_size = FilterCriteria {
            diameter_min: Some(0.0),
            ..Default::default()
        };
        let got: Vec<String> = run(&db, &any_size).into_iter().map(|(d, _)| d).collect();
        assert_eq!(got, vec!["433", "99942", "99942"]);

        let small = FilterCriteria {
            diameter_max: Some(1.0),
            ..Default::default()
        };
        let got: Vec<String> = run(&db, &small).into_iter().map(|(d, _)| d).collect();
        assert_eq!(got, vec!["99942", "99942"]);
    }

    #[test]
    fn test_nan_bound_matches_nothing() {
        let ca = CloseApproach::new("x", "2020-Jan-01 00:00", "0.1", "1.0").unwrap();
        let filter = AttributeFilter::Distance(Comparison::Le, f64::NAN);
        assert!(!filter.matches(&ca, None));
    }

    #[test]
    fn test_limit() {
        let db = sample_db();
        assert_eq!(limit(db.query(&[]), Some(2)).count(), 2);
        assert_eq!(limit(db.query(&[]), Some(0)).count(), 5);
        assert_eq!(limit(db.query(&[]), None).count(), 5);
    }

    #[test]
    fn test_limit_stops_scanning_early() {
        let db = sample_db();
        let scanned = Cell::new(0);
        let first: Vec<&CloseApproach> = limit(
            db.approaches().inspect(|_| scanned.set(scanned.get() + 1)),
            Some(1),
        )
        .collect();
        assert_eq!(first.len(), 1);
        assert_eq!(scanned.get(), 1);
    }

    #[test]
    fn test_filter_display() {
        let f = AttributeFilter::Distance(Comparison::Le, 0.5);
        assert_eq!(f.to_string(), "distance <= 0.5");
    }
}
