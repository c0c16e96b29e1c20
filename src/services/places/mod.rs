//! Places directory - points of interest with filter, sort and pagination
//!
//! Served over a GraphQL-style endpoint (see `handlers`). The store itself
//! knows nothing about the protocol.

mod handlers;

pub use handlers::PlacesRouter;

use crate::domain::error::DirectoryError;
use crate::domain::types::{new_uuid_v7, Place, PlaceInput, PlacePatch, PlaceType, Zone};
use parking_lot::RwLock;
use serde::Deserialize;
use std::cmp::Ordering;
use tracing::info;

/// Fields `sortBy` may name
pub const SORT_FIELDS: [&str; 3] = ["name", "type", "zone"];

/// Arguments of the `places` query
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceQuery {
    pub zone: Option<Zone>,
    #[serde(rename = "type")]
    pub kind: Option<PlaceType>,
    /// Case-insensitive substring of the name
    pub search: Option<String>,
    pub sort_by: Option<String>,
    /// 1-based; absent or 0 means the first page
    pub page: Option<u32>,
    /// Absent or 0 means the whole result set
    pub limit: Option<u32>,
}

impl PlaceQuery {
    pub fn in_zone(zone: Zone) -> Self {
        Self { zone: Some(zone), ..Default::default() }
    }
}

/// Case-insensitive ordering with a byte-order tiebreak, so "cafe" < "Dome" < "dome"
fn locale_compare(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn sort_key<'a>(place: &'a Place, field: &str) -> &'a str {
    match field {
        "type" => place.kind.as_str(),
        "zone" => place.zone.as_str(),
        _ => &place.name,
    }
}

fn reject_blank_name(name: &str) -> Result<(), DirectoryError> {
    if name.trim().is_empty() {
        return Err(DirectoryError::invalid("Name cannot be empty"));
    }
    Ok(())
}

pub struct PlaceDirectory {
    places: RwLock<Vec<Place>>,
}

impl Default for PlaceDirectory {
    fn default() -> Self {
        Self::new(seed_places())
    }
}

impl PlaceDirectory {
    pub fn new(places: Vec<Place>) -> Self {
        Self { places: RwLock::new(places) }
    }

    /// Filter, then sort, then paginate
    pub fn query(&self, query: &PlaceQuery) -> Result<Vec<Place>, DirectoryError> {
        let search = query.search.as_deref().filter(|s| !s.is_empty()).map(str::to_lowercase);

        let mut result: Vec<Place> = self
            .places
            .read()
            .iter()
            .filter(|place| query.zone.map_or(true, |zone| place.zone == zone))
            .filter(|place| query.kind.map_or(true, |kind| place.kind == kind))
            .filter(|place| {
                search.as_ref().map_or(true, |needle| place.name.to_lowercase().contains(needle.as_str()))
            })
            .cloned()
            .collect();

        if let Some(field) = query.sort_by.as_deref().filter(|f| !f.is_empty()) {
            if !SORT_FIELDS.contains(&field) {
                return Err(DirectoryError::invalid("Invalid sort field"));
            }
            result.sort_by(|a, b| locale_compare(sort_key(a, field), sort_key(b, field)));
        }

        let page = query.page.filter(|&p| p > 0).unwrap_or(1) as usize;
        let limit = query.limit.filter(|&l| l > 0).map(|l| l as usize).unwrap_or(result.len());
        let start = (page - 1).saturating_mul(limit).min(result.len());
        let end = start.saturating_add(limit).min(result.len());

        Ok(result.drain(start..end).collect())
    }

    pub fn get(&self, id: &str) -> Option<Place> {
        self.places.read().iter().find(|place| place.id == id).cloned()
    }

    pub fn create(&self, input: PlaceInput) -> Result<Place, DirectoryError> {
        reject_blank_name(&input.name)?;

        let place = Place { id: new_uuid_v7(), name: input.name, kind: input.kind, zone: input.zone };
        self.places.write().push(place.clone());

        info!(place_id = %place.id, zone = %place.zone, kind = %place.kind, "place_created");
        Ok(place)
    }

    /// Shallow merge of the fields present in `patch`
    pub fn update(&self, id: &str, patch: PlacePatch) -> Result<Place, DirectoryError> {
        if let Some(name) = patch.name.as_deref() {
            reject_blank_name(name)?;
        }

        let mut places = self.places.write();
        let place = places
            .iter_mut()
            .find(|place| place.id == id)
            .ok_or_else(|| DirectoryError::not_found("Place", "place_id", id))?;

        if let Some(name) = patch.name {
            place.name = name;
        }
        if let Some(kind) = patch.kind {
            place.kind = kind;
        }
        if let Some(zone) = patch.zone {
            place.zone = zone;
        }

        info!(place_id = %id, "place_updated");
        Ok(place.clone())
    }

    /// Returns whether a place was removed
    pub fn delete(&self, id: &str) -> bool {
        let mut places = self.places.write();
        let Some(index) = places.iter().position(|place| place.id == id) else {
            return false;
        };
        places.remove(index);
        info!(place_id = %id, "place_deleted");
        true
    }

    pub fn len(&self) -> usize {
        self.places.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.read().is_empty()
    }
}

fn seed_places() -> Vec<Place> {
    let place = |id: &str, name: &str, kind, zone| Place {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        zone,
    };
    vec![
        place("1", "Cafe Bleu", PlaceType::Cafe, Zone::Centre),
        place("2", "Grand Park", PlaceType::Park, Zone::Lac),
        place("3", "City Hospital", PlaceType::Hospital, Zone::Centre),
    ]
}
