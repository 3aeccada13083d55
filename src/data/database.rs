use std::collections::HashMap;

use log::{debug, info, warn};

use super::filter::AttributeFilter;
use super::model::{ApproachId, CloseApproach, NearEarthObject, NeoId};

/// Normalise a NEO name for lookup: lower-case, whitespace collapsed.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// ---------------------------------------------------------------------------
// NeoDatabase – owns every NEO and close approach and the links between them
// ---------------------------------------------------------------------------

/// The linked, read-only collection of NEOs and their close approaches.
///
/// Both entity kinds live in arenas owned by the database; the
/// approach → NEO and NEO → approaches edges are plain handles into those
/// arenas, set once in [`NeoDatabase::new`].
#[derive(Debug, Clone, Default)]
pub struct NeoDatabase {
    neos: Vec<NearEarthObject>,
    approaches: Vec<CloseApproach>,
    by_designation: HashMap<String, NeoId>,
    by_name: HashMap<String, NeoId>,
    unlinked: usize,
}

impl NeoDatabase {
    /// Index the NEOs and link every close approach to its NEO.
    ///
    /// Duplicate designations (or names) resolve to the last NEO loaded.
    /// Approaches whose designation matches no NEO are kept but stay
    /// unlinked.
    pub fn new(neos: Vec<NearEarthObject>, approaches: Vec<CloseApproach>) -> Self {
        let mut db = NeoDatabase {
            neos,
            approaches,
            by_designation: HashMap::new(),
            by_name: HashMap::new(),
            unlinked: 0,
        };

        for (i, neo) in db.neos.iter().enumerate() {
            let id = NeoId(i);
            if db.by_designation.insert(neo.designation.clone(), id).is_some() {
                debug!("Duplicate designation '{}', keeping the last one", neo.designation);
            }
            if let Some(name) = &neo.name {
                db.by_name.insert(normalize_name(name), id);
            }
        }

        for (i, approach) in db.approaches.iter_mut().enumerate() {
            match db.by_designation.get(&approach.designation) {
                Some(&neo_id) => {
                    approach.neo = Some(neo_id);
                    db.neos[neo_id.0].approaches.push(ApproachId(i));
                }
                None => db.unlinked += 1,
            }
        }

        if db.unlinked > 0 {
            warn!(
                "{} close approaches reference a designation missing from the NEO set",
                db.unlinked
            );
        }
        info!(
            "Indexed {} NEOs and {} close approaches",
            db.neos.len(),
            db.approaches.len()
        );

        db
    }

    /// Exact-match lookup by primary designation.
    pub fn get_neo_by_designation(&self, designation: &str) -> Option<&NearEarthObject> {
        self.by_designation
            .get(designation)
            .map(|id| &self.neos[id.0])
    }

    /// Lookup by IAU name, ignoring case and surrounding or repeated whitespace.
    pub fn get_neo_by_name(&self, name: &str) -> Option<&NearEarthObject> {
        let key = normalize_name(name);
        if key.is_empty() {
            return None;
        }
        self.by_name.get(&key).map(|id| &self.neos[id.0])
    }

    pub fn neo(&self, id: NeoId) -> Option<&NearEarthObject> {
        self.neos.get(id.0)
    }

    pub fn approach(&self, id: ApproachId) -> Option<&CloseApproach> {
        self.approaches.get(id.0)
    }

    /// The NEO an approach was linked to, if any.
    pub fn neo_of(&self, approach: &CloseApproach) -> Option<&NearEarthObject> {
        approach.neo.and_then(|id| self.neo(id))
    }

    /// Close approaches of a NEO, in load order.
    pub fn approaches_of<'a>(
        &'a self,
        neo: &'a NearEarthObject,
    ) -> impl Iterator<Item = &'a CloseApproach> + 'a {
        neo.approaches.iter().filter_map(|&id| self.approach(id))
    }

    /// All NEOs in load order, including shadowed duplicates.
    pub fn neos(&self) -> impl Iterator<Item = &NearEarthObject> {
        self.neos.iter()
    }

    /// All close approaches in load order.
    pub fn approaches(&self) -> impl Iterator<Item = &CloseApproach> {
        self.approaches.iter()
    }

    /// Number of close approaches left without a NEO.
    pub fn unlinked_count(&self) -> usize {
        self.unlinked
    }

    /// Lazily yield the close approaches matching every filter.
    ///
    /// An empty filter slice yields everything in load order. Calling
    /// `query` again restarts the scan.
    pub fn query<'a>(
        &'a self,
        filters: &'a [AttributeFilter],
    ) -> impl Iterator<Item = &'a CloseApproach> + 'a {
        self.approaches.iter().filter(move |approach| {
            let neo = self.neo_of(approach);
            filters.iter().all(|f| f.matches(approach, neo))
        })
    }
}
