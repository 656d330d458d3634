use super::bounding_box::BoundingBox;
use crate::catalog::{Catalog, PropertyRecord};

use failure::Fail;
use geo_types::Point;
use log::{info, warn};

/// Radius used when the request does not carry a usable one.
pub const DEFAULT_RADIUS_KM: f64 = 100.0;

#[derive(Debug, Fail, PartialEq)]
pub enum QueryError {
    #[fail(display = "property {} not found", _0)]
    PropertyNotFound(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyProperty<'a> {
    pub record: &'a PropertyRecord,
    pub is_target: bool,
}

/// Properties inside the box, in catalog order.
#[derive(Debug)]
pub struct QueryResult<'a> {
    /// None when the target has no known location.
    pub bbox: Option<BoundingBox>,
    pub rows: Vec<NearbyProperty<'a>>,
}

/// Radius from a raw request value. Anything unusable falls back to the default.
pub fn parse_radius(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(radius) if radius.is_finite() => radius,
        _ => {
            warn!("Invalid radius {:?}, using {} km", raw, DEFAULT_RADIUS_KM);
            DEFAULT_RADIUS_KM
        }
    }
}

/**
 * Every property whose coordinates fall strictly inside the box of `radius_km`
 * around `property_name`.
 *
 * The name is resolved case-insensitively to its first row. `is_target` is an
 * exact, case-sensitive comparison with `property_name` though, so a query in
 * a different case than the stored name returns the target row unflagged.
 * Rows with an unknown location never match.
 */
pub fn find_nearby<'a>(
    catalog: &'a Catalog,
    property_name: &str,
    radius_km: Option<f64>,
) -> Result<QueryResult<'a>, QueryError> {
    let radius_km = radius_km.unwrap_or(DEFAULT_RADIUS_KM);

    let target = catalog
        .position_of(property_name)
        .and_then(|idx| catalog.record_at(idx))
        .ok_or_else(|| QueryError::PropertyNotFound(property_name.to_owned()))?;

    // A target without a location has nothing around it.
    let (latitude, longitude) = match target.coordinates() {
        Some(coordinates) => coordinates,
        None => {
            warn!("Property {:?} has no known location", target.name);
            return Ok(QueryResult {
                bbox: None,
                rows: Vec::new(),
            });
        }
    };

    let bbox = BoundingBox::around(Point::new(longitude, latitude), radius_km);

    let rows: Vec<_> = catalog
        .records()
        .zip(catalog.names())
        .filter(|(record, _)| match record.coordinates() {
            Some((lat, lng)) => bbox.contains(lat, lng),
            None => false,
        })
        .map(|(record, name)| NearbyProperty {
            record,
            is_target: name == property_name,
        })
        .collect();

    info!(
        "{} properties within {} km of {:?} ({}, {})",
        rows.len(),
        radius_km,
        target.name,
        bbox.center().y(),
        bbox.center().x()
    );

    Ok(QueryResult {
        bbox: Some(bbox),
        rows,
    })
}
