use geo_types::{Coordinate, Point, Rect};

/// Kilometers per degree of latitude, halved.
const KM_PER_DEGREE: f64 = 111.0 * 0.5;

/// Latitude, in radians, the longitude correction is computed for.
const REFERENCE_LATITUDE_RAD: f64 = -0.5;

/**
 * Planar latitude/longitude box standing in for a circle of a given radius.
 *
 * This is not a geodesic distance. Both deltas use fixed constants and the
 * longitude correction assumes every property lies near -0.5 rad (~-28.6°),
 * the South American mining belt. Properties far from that band get a box
 * that is too wide or too narrow in longitude.
 */
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    center: Point<f64>,
    rect: Rect<f64>,
}

impl BoundingBox {
    /// Box centered on `center` (x = longitude, y = latitude).
    pub fn around(center: Point<f64>, radius_km: f64) -> BoundingBox {
        let delta_lat = radius_km / KM_PER_DEGREE;
        let delta_lng = radius_km / (KM_PER_DEGREE * REFERENCE_LATITUDE_RAD.cos());

        BoundingBox {
            center,
            rect: Rect {
                min: Coordinate {
                    x: center.x() - delta_lng,
                    y: center.y() - delta_lat,
                },
                max: Coordinate {
                    x: center.x() + delta_lng,
                    y: center.y() + delta_lat,
                },
            },
        }
    }

    /// Strict on every side: a point on an edge is outside.
    #[inline]
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.rect.min.y < latitude
            && latitude < self.rect.max.y
            && self.rect.min.x < longitude
            && longitude < self.rect.max.x
    }

    pub fn center(&self) -> Point<f64> {
        self.center
    }

    pub fn min_latitude(&self) -> f64 {
        self.rect.min.y
    }

    pub fn max_latitude(&self) -> f64 {
        self.rect.max.y
    }

    pub fn min_longitude(&self) -> f64 {
        self.rect.min.x
    }

    pub fn max_longitude(&self) -> f64 {
        self.rect.max.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_convert_kilometers_to_degrees() {
        let bbox = BoundingBox::around(Point::new(-70.0, -29.0), 55.5);

        assert_eq!(bbox.min_latitude(), -30.0);
        assert_eq!(bbox.max_latitude(), -28.0);

        let delta_lng = 1.0 / (-0.5f64).cos();
        assert!((bbox.max_longitude() - (-70.0 + delta_lng)).abs() < 1e-12);
        assert!((bbox.min_longitude() - (-70.0 - delta_lng)).abs() < 1e-12);
    }

    #[test]
    fn it_should_contain_its_center() {
        let bbox = BoundingBox::around(Point::new(-70.0, -29.0), 1.0);

        assert!(bbox.contains(-29.0, -70.0));
    }

    #[test]
    fn it_should_exclude_points_on_the_edges() {
        let bbox = BoundingBox::around(Point::new(-70.0, -29.0), 55.5);

        assert!(!bbox.contains(bbox.max_latitude(), -70.0));
        assert!(!bbox.contains(bbox.min_latitude(), -70.0));
        assert!(!bbox.contains(-29.0, bbox.max_longitude()));
        assert!(!bbox.contains(-29.0, bbox.min_longitude()));
        assert!(bbox.contains(-28.0001, -70.0));
    }

    #[test]
    fn it_should_be_empty_for_a_zero_radius() {
        let bbox = BoundingBox::around(Point::new(-70.0, -29.0), 0.0);

        assert!(!bbox.contains(-29.0, -70.0));
    }
}
