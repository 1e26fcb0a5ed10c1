//! Sampling of activity locations.
//!
//! A location is either a point jittered around the center of the home region, or one of the
//! two fixed anchors on the highway corridor.
use crate::context::Context;
use crate::geo::{ContextTransformationExt, Coord};
use crate::random::ContextRandomExt;

/// Center and spread of the home region, in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomeRegionParameters {
    pub lon_mean: f64,
    pub lon_sd: f64,
    pub lat_mean: f64,
    pub lat_sd: f64,
}

pub const HOME_REGION: HomeRegionParameters = HomeRegionParameters {
    lon_mean: -111.7362,
    lon_sd: 0.013_561_2,
    lat_mean: 40.033_75,
    lat_sd: 0.010_561_9,
};

/// The two directions of the highway corridor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorridorDirection {
    /// Anchor A
    Northbound,
    /// Anchor B
    Southbound,
}

/// Corridor anchors, already in planar coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorCoordinates {
    pub northbound: Coord,
    pub southbound: Coord,
}

impl AnchorCoordinates {
    #[must_use]
    pub fn get(&self, direction: CorridorDirection) -> Coord {
        match direction {
            CorridorDirection::Northbound => self.northbound,
            CorridorDirection::Southbound => self.southbound,
        }
    }
}

pub const ANCHORS: AnchorCoordinates = AnchorCoordinates {
    northbound: Coord::new(482_295.011_657_826_14, 971_960.571_410_935_4),
    southbound: Coord::new(478_383.781_449_654_66, 966_952.946_541_492_4),
};

pub trait ContextSpatialExt {
    /// Draws a home-region coordinate and reprojects it into the configured reference system.
    ///
    /// Each axis is `mean + U(0, 1) * sd`, longitude first; this is deliberately not a normal
    /// draw. Consumes two uniform draws.
    fn jittered_home_coordinate(&self) -> Coord;

    /// Returns the corridor anchor for `direction`. Consumes no draws.
    fn anchor_coordinate(&self, direction: CorridorDirection) -> Coord;
}

impl ContextSpatialExt for Context {
    fn jittered_home_coordinate(&self) -> Coord {
        let lon = HOME_REGION.lon_mean + self.sample_uniform() * HOME_REGION.lon_sd;
        let lat = HOME_REGION.lat_mean + self.sample_uniform() * HOME_REGION.lat_sd;
        self.transform_coord(Coord::new(lon, lat))
    }

    fn anchor_coordinate(&self, direction: CorridorDirection) -> Coord {
        ANCHORS.get(direction)
    }
}
