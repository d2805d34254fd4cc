//! Spatial index for zone lookups.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use geo::{Contains, Point};
use hashbrown::HashMap;
use rstar::{RTree, RTreeObject, AABB};
use tracing::{info, warn};

use super::{parse_zone_boundaries, ZoneBoundary, ZoneError};
use crate::models::Coordinate;

/// Wrapper for R-tree indexing of zones
#[derive(Clone)]
struct IndexedZone {
    boundary: Arc<ZoneBoundary>,
    /// Insertion position, used to break ties between equal-area zones
    ordinal: usize,
    area: f64,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedZone {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl IndexedZone {
    fn new(ordinal: usize, boundary: Arc<ZoneBoundary>) -> Option<Self> {
        let (min_x, min_y, max_x, max_y) = boundary.bbox()?;
        Some(Self {
            area: boundary.area(),
            boundary,
            ordinal,
            envelope: AABB::from_corners([min_x, min_y], [max_x, max_y]),
        })
    }
}

/// Immutable collection of named zone polygons.
///
/// Points are matched against zone bounding boxes through an R-tree, then
/// checked for exact containment. When zones overlap, the zone with the
/// smallest area wins; equal areas fall back to insertion order.
pub struct ZoneIndex {
    tree: RTree<IndexedZone>,
    /// Zones in insertion order
    zones: Vec<Arc<ZoneBoundary>>,
}

impl ZoneIndex {
    /// Build the index from zone boundaries.
    ///
    /// A later boundary with an already seen ID replaces the earlier
    /// geometry but keeps its position.
    pub fn build(boundaries: Vec<ZoneBoundary>) -> Self {
        info!("Building zone index for {} boundaries...", boundaries.len());

        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut zones: Vec<Arc<ZoneBoundary>> = Vec::with_capacity(boundaries.len());

        for boundary in boundaries {
            let existing = positions.get(&boundary.id).copied();
            match existing {
                Some(pos) => {
                    warn!("Duplicate zone ID {}, replacing earlier geometry", boundary.id);
                    zones[pos] = Arc::new(boundary);
                }
                None => {
                    positions.insert(boundary.id.clone(), zones.len());
                    zones.push(Arc::new(boundary));
                }
            }
        }

        let indexed: Vec<IndexedZone> = zones
            .iter()
            .enumerate()
            .filter_map(|(ordinal, zone)| {
                let indexed = IndexedZone::new(ordinal, Arc::clone(zone));
                if indexed.is_none() {
                    warn!("Zone {} has empty geometry and can never match", zone.id);
                }
                indexed
            })
            .collect();

        let tree = RTree::bulk_load(indexed);

        info!("Zone index built with {} entries", tree.size());

        Self { tree, zones }
    }

    /// Parse a GeoJSON FeatureCollection and build the index
    pub fn from_geojson(geojson_str: &str) -> Result<Self, ZoneError> {
        Ok(Self::build(parse_zone_boundaries(geojson_str)?))
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ZoneError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::from_geojson(&content)
    }

    /// Load the index from a GeoJSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ZoneError> {
        let path = path.as_ref();
        info!("Loading zone boundaries from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_geojson(&content)
    }

    /// Find the zone containing a coordinate
    pub fn zone_of(&self, coordinate: Coordinate) -> Option<&str> {
        self.lookup(coordinate.lng, coordinate.lat)
            .map(|zone| zone.id.as_str())
    }

    /// Find the zone containing a point, resolving overlaps by smallest area
    pub fn lookup(&self, lng: f64, lat: f64) -> Option<&ZoneBoundary> {
        let point = Point::new(lng, lat);
        let query_envelope = AABB::from_point([lng, lat]);

        let mut best: Option<&IndexedZone> = None;

        for candidate in self.tree.locate_in_envelope_intersecting(&query_envelope) {
            if !candidate.boundary.geometry.contains(&point) {
                continue;
            }
            best = match best {
                Some(current)
                    if (current.area, current.ordinal) <= (candidate.area, candidate.ordinal) =>
                {
                    Some(current)
                }
                _ => Some(candidate),
            };
        }

        best.map(|ib| ib.boundary.as_ref())
    }

    /// Find every zone containing a point, in insertion order
    pub fn lookup_all(&self, lng: f64, lat: f64) -> Vec<&ZoneBoundary> {
        let point = Point::new(lng, lat);
        let query_envelope = AABB::from_point([lng, lat]);

        let mut hits: Vec<&IndexedZone> = self
            .tree
            .locate_in_envelope_intersecting(&query_envelope)
            .filter(|ib| ib.boundary.geometry.contains(&point))
            .collect();
        hits.sort_by_key(|ib| ib.ordinal);

        hits.into_iter().map(|ib| ib.boundary.as_ref()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&ZoneBoundary> {
        self.zones
            .iter()
            .find(|zone| zone.id == id)
            .map(|zone| zone.as_ref())
    }

    /// Zone IDs in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.zones.iter().map(|zone| zone.id.as_str())
    }

    /// Get total number of zones
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
