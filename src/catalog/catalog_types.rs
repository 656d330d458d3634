use serde::Deserialize;

/// Canonical field names, in catalog field order.
pub const FIELD_NAMES: [&str; 9] = [
    "project_key",
    "name",
    "owners",
    "royalty_holders",
    "development_stage",
    "activity_status",
    "latitude",
    "longitude",
    "coordinate_accuracy",
];

/// One property of the dataset, commodity columns already dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRecord {
    pub project_key: String,
    pub name: String,
    pub owners: Option<String>,
    pub royalty_holders: Option<String>,
    pub development_stage: Option<String>,
    pub activity_status: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub coordinate_accuracy: Option<String>,
}

impl PropertyRecord {
    /// `(latitude, longitude)` when both are known.
    #[inline]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/**
 * A data row exactly as laid out in the source file. Fields are positional,
 * so the order here is the file's column order.
 */
#[derive(Debug, Deserialize)]
pub(super) struct RawPropertyRow {
    pub project_key: String,
    pub property_name: String,
    #[allow(dead_code)]
    pub primary_commodity: Option<String>,
    #[allow(dead_code)]
    pub commodity_group: Option<String>,
    pub owners: Option<String>,
    pub royalty_holders: Option<String>,
    pub development_stage: Option<String>,
    pub activity_status: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub coordinate_accuracy: Option<String>,
}
