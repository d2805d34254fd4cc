//! Zone index: named polygons with point-in-polygon lookup.
//!
//! Zones are loaded from a GeoJSON FeatureCollection whose features carry a
//! `properties.ID` identifier and a Polygon or MultiPolygon geometry.

mod boundary;
mod index;

pub use boundary::{parse_zone_boundaries, ZoneBoundary, ZONE_ID_PROPERTY};
pub use index::ZoneIndex;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZoneError {
    #[error("failed to read boundary data: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed boundary data: {0}")]
    MalformedBoundary(String),
}
