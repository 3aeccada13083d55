//! Near-Earth object explorer.
//!
//! Loads the NASA NEO catalogue and close-approach data, links every
//! approach to its object and answers lookups and filtered queries.

pub mod data;

pub use data::database::NeoDatabase;
pub use data::filter::{create_filters, limit, AttributeFilter, FilterCriteria};
pub use data::loader::{load_approaches, load_neos, Loaded, SkippedRecord};
pub use data::model::{CloseApproach, NearEarthObject, RecordError};
