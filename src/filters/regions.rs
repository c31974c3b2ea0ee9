//! Named geographic regions for the location filter
//!
//! Membership is a point-in-bounding-box test. The Western Pacific box crosses
//! the antimeridian.

use crate::error::ExplorerError;
use seabed_types::{BoundingBox, GeoPoint};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    /// Value carried by the `locationId` filter
    pub id: &'static str,
    pub name: &'static str,
    pub bounds: BoundingBox,
}

impl Region {
    pub fn contains(&self, point: GeoPoint) -> bool {
        self.bounds.contains(point)
    }
}

const fn bbox(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> BoundingBox {
    BoundingBox {
        min_lat,
        max_lat,
        min_lon,
        max_lon,
    }
}

pub const REGIONS: &[Region] = &[
    Region {
        id: "clarion-clipperton-zone",
        name: "Clarion-Clipperton Zone",
        bounds: bbox(0.0, 23.0, -160.0, -110.0),
    },
    Region {
        id: "indian-ocean",
        name: "Indian Ocean",
        bounds: bbox(-40.0, 10.0, 40.0, 100.0),
    },
    Region {
        id: "mid-atlantic-ridge",
        name: "Mid-Atlantic Ridge",
        bounds: bbox(-5.0, 40.0, -50.0, -10.0),
    },
    Region {
        id: "western-pacific",
        name: "Western Pacific",
        bounds: bbox(-10.0, 30.0, 140.0, -170.0),
    },
    Region {
        id: "south-atlantic",
        name: "South Atlantic",
        bounds: bbox(-40.0, -5.0, -45.0, 15.0),
    },
];

pub fn region(id: &str) -> Result<&'static Region, ExplorerError> {
    let id = id.trim();
    REGIONS
        .iter()
        .find(|r| r.id.eq_ignore_ascii_case(id) || r.name.eq_ignore_ascii_case(id))
        .ok_or_else(|| ExplorerError::UnknownRegion(id.to_string()))
}
