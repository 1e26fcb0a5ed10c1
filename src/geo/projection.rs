use log::{debug, warn};
use proj4rs::errors::Error as ProjError;
use proj4rs::transform::transform;
use proj4rs::Proj;

use crate::context::Context;
use crate::define_data_plugin;
use crate::error::PlansError;
use crate::geo::Coord;

/// Identifier of the geodetic system sampled coordinates are drawn in.
pub const WGS84: &str = "WGS84";

const WGS84_DEFINITION: &str = "+proj=longlat +ellps=WGS84 +datum=WGS84 +no_defs";

/// Converts coordinates from one reference system into another.
pub trait CoordinateTransformation {
    fn transform(&self, coord: Coord) -> Coord;
}

pub struct IdentityTransformation;

impl CoordinateTransformation for IdentityTransformation {
    fn transform(&self, coord: Coord) -> Coord {
        coord
    }
}

/// Reprojects WGS84 degrees into any reference system `proj4rs` can build.
pub struct ProjTransformation {
    source: Proj,
    target: Proj,
}

impl ProjTransformation {
    /// Builds the target system from an `EPSG:<code>` identifier or a `+proj=...` string.
    ///
    /// # Errors
    ///
    /// Returns the `proj4rs` error if the code is unknown or the definition can't be parsed.
    pub fn new(crs: &str) -> Result<Self, ProjError> {
        let crs = crs.trim();
        let target = if crs.starts_with('+') {
            Proj::from_proj_string(crs)?
        } else {
            Proj::from_user_string(&crs.to_ascii_uppercase())?
        };
        if !target.has_forward() {
            return Err(ProjError::NoForwardProjectionDefined);
        }
        Ok(ProjTransformation {
            source: Proj::from_proj_string(WGS84_DEFINITION)?,
            target,
        })
    }

    fn try_transform(&self, coord: Coord) -> Result<Coord, ProjError> {
        // Geographic coordinates are in radians on both sides of proj4rs
        let mut point = (coord.x.to_radians(), coord.y.to_radians(), 0.0);
        transform(&self.source, &self.target, &mut point)?;
        if self.target.is_latlong() {
            Ok(Coord::new(point.0.to_degrees(), point.1.to_degrees()))
        } else {
            Ok(Coord::new(point.0, point.1))
        }
    }
}

impl CoordinateTransformation for ProjTransformation {
    fn transform(&self, coord: Coord) -> Coord {
        self.try_transform(coord).unwrap_or_else(|e| {
            warn!("could not reproject ({}, {}): {e}", coord.x, coord.y);
            Coord::new(f64::NAN, f64::NAN)
        })
    }
}

/// Returns the transformation from WGS84 degrees into `crs`.
///
/// # Errors
///
/// Returns `PlansError::UnsupportedCrs` if no projection is known for `crs`.
pub fn get_coordinate_transformation(
    crs: &str,
) -> Result<Box<dyn CoordinateTransformation>, PlansError> {
    if crs.eq_ignore_ascii_case(WGS84) || crs.eq_ignore_ascii_case("EPSG:4326") {
        return Ok(Box::new(IdentityTransformation));
    }
    match ProjTransformation::new(crs) {
        Ok(transformation) => Ok(Box::new(transformation)),
        Err(e) => {
            debug!("no projection for {crs}: {e}");
            Err(PlansError::UnsupportedCrs(crs.to_string()))
        }
    }
}

struct TransformationData {
    crs: String,
    transformation: Box<dyn CoordinateTransformation>,
}

define_data_plugin!(
    TransformationPlugin,
    Option<TransformationData>,
    None
);

pub trait ContextTransformationExt {
    /// Sets up the reprojection from WGS84 into `crs` used for every sampled coordinate.
    ///
    /// # Errors
    ///
    /// Returns `PlansError::UnsupportedCrs` if no projection is known for `crs`; the previously
    /// configured transformation, if any, is kept.
    fn init_coordinate_transformation(&mut self, crs: &str) -> Result<(), PlansError>;

    /// The identifier of the configured target reference system.
    fn get_crs(&self) -> Option<&str>;

    /// Reprojects a WGS84 coordinate into the configured reference system. Panics if
    /// `init_coordinate_transformation` was not called yet.
    fn transform_coord(&self, coord: Coord) -> Coord;
}

impl ContextTransformationExt for Context {
    fn init_coordinate_transformation(&mut self, crs: &str) -> Result<(), PlansError> {
        let transformation = get_coordinate_transformation(crs)?;
        debug!("reprojecting coordinates from {WGS84} to {crs}");
        *self.get_data_mut(TransformationPlugin) = Some(TransformationData {
            crs: crs.to_string(),
            transformation,
        });
        Ok(())
    }

    fn get_crs(&self) -> Option<&str> {
        self.get_data(TransformationPlugin)
            .and_then(Option::as_ref)
            .map(|data| data.crs.as_str())
    }

    fn transform_coord(&self, coord: Coord) -> Coord {
        self.get_data(TransformationPlugin)
            .and_then(Option::as_ref)
            .expect("You must initialize the coordinate transformation with a reference system")
            .transformation
            .transform(coord)
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    const REFERENCE_POINT: Coord = Coord::new(-111.723_849_963_512_6, 40.035_392_559_546_74);
    const US_SURVEY_FOOT: f64 = 1200.0 / 3937.0;

    #[test]
    fn origin_maps_to_false_origin() {
        let utah_central = get_coordinate_transformation("EPSG:2849").unwrap();
        let origin = utah_central.transform(Coord::new(-111.5, 38.333_333_333_333_34));
        assert_approx_eq!(origin.x, 500_000.0, 1e-6);
        assert_approx_eq!(origin.y, 2_000_000.0, 1e-6);
    }

    #[test]
    fn utah_central_reference_point() {
        let utah_central = get_coordinate_transformation("EPSG:2849").unwrap();
        let coord = utah_central.transform(REFERENCE_POINT);
        assert_approx_eq!(coord.x, 480_896.297_382_624_47, 1e-6);
        assert_approx_eq!(coord.y, 2_188_984.682_269_789_3, 1e-6);
    }

    #[test]
    fn proj_string_target() {
        let lcc = get_coordinate_transformation(
            "+proj=lcc +lat_1=40.65 +lat_2=39.01666666666667 +lat_0=38.33333333333334 \
             +lon_0=-111.5 +x_0=500000 +y_0=2000000 +ellps=GRS80 +towgs84=0,0,0 +units=m +no_defs",
        )
        .unwrap();
        let coord = lcc.transform(REFERENCE_POINT);
        assert_approx_eq!(coord.x, 480_896.297_382_624_47, 1e-6);
        assert_approx_eq!(coord.y, 2_188_984.682_269_789_3, 1e-6);
    }

    #[test]
    fn utm_zone_12() {
        for crs in ["EPSG:26912", "EPSG:32612", "epsg:32612"] {
            let coord = get_coordinate_transformation(crs)
                .unwrap()
                .transform(REFERENCE_POINT);
            assert!(coord.x > 430_000.0 && coord.x < 445_000.0, "{crs}: {coord:?}");
            assert!(coord.y > 4_425_000.0 && coord.y < 4_440_000.0, "{crs}: {coord:?}");
        }
    }

    #[test]
    fn web_mercator() {
        let coord = get_coordinate_transformation("EPSG:3857")
            .unwrap()
            .transform(REFERENCE_POINT);
        assert_approx_eq!(coord.x, -12_437_042.087_402_32, 1e-3);
        assert!(coord.y > 4_860_000.0 && coord.y < 4_880_000.0, "{coord:?}");
    }

    #[test]
    fn us_survey_feet() {
        let meters = get_coordinate_transformation("EPSG:2849")
            .unwrap()
            .transform(REFERENCE_POINT);
        let feet = get_coordinate_transformation("EPSG:3566")
            .unwrap()
            .transform(REFERENCE_POINT);
        assert_approx_eq!(feet.x * US_SURVEY_FOOT, meters.x, 1e-3);
        assert_approx_eq!(feet.y * US_SURVEY_FOOT, meters.y, 1e-3);
    }

    #[test]
    fn identity_for_wgs84() {
        let coord = Coord::new(-111.7, 40.0);
        for crs in ["WGS84", "EPSG:4326", "epsg:4326"] {
            assert_eq!(get_coordinate_transformation(crs).unwrap().transform(coord), coord);
        }
    }

    #[test]
    fn unsupported_crs() {
        for crs in ["EPSG:99999", "EPSG:utah", "bogus", "+proj=nonsense"] {
            match get_coordinate_transformation(crs) {
                Err(PlansError::UnsupportedCrs(unsupported)) => assert_eq!(unsupported, crs),
                _ => panic!("expected {crs} to be unsupported"),
            }
        }
    }

    #[test]
    fn context_keeps_crs() {
        let mut context = Context::new();
        assert_eq!(context.get_crs(), None);
        context.init_coordinate_transformation("EPSG:2849").unwrap();
        assert_eq!(context.get_crs(), Some("EPSG:2849"));

        // A failed re-initialization leaves the previous transformation in place
        assert!(context.init_coordinate_transformation("bogus").is_err());
        assert_eq!(context.get_crs(), Some("EPSG:2849"));

        context.init_coordinate_transformation("EPSG:26912").unwrap();
        assert_eq!(context.get_crs(), Some("EPSG:26912"));
        assert!(context.transform_coord(REFERENCE_POINT).y > 4_000_000.0);
    }

    #[test]
    #[should_panic(expected = "You must initialize the coordinate transformation")]
    fn transform_without_init() {
        let context = Context::new();
        context.transform_coord(Coord::new(0.0, 0.0));
    }
}
