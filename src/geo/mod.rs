//! Coordinates and the reprojection from geodetic degrees into the planar reference system the
//! downstream simulator works in.
mod projection;

use serde::{Deserialize, Serialize};

pub use projection::{
    get_coordinate_transformation, ContextTransformationExt, CoordinateTransformation,
    IdentityTransformation, ProjTransformation, WGS84,
};

/// A coordinate pair. Planar coordinates are `(easting, northing)`; geodetic coordinates are
/// `(longitude, latitude)` in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Coord { x, y }
    }
}
