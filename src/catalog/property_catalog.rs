use super::catalog_types::{PropertyRecord, RawPropertyRow};
use crate::cli_utils;
use crate::holders;

use failure::Fail;
use indicatif::ProgressBar;
use log::{info, warn};

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path;
use std::time;

/// Header labels of the source sheet, in positional order.
const SOURCE_COLUMNS: [&str; 11] = [
    "KeyMineProject",
    "Property Name",
    "Primary Commodity",
    "Commodity Group",
    "List of Owners",
    "List of Royalty Holders",
    "Development Stage",
    "Activity Status",
    "Latitude (degrees)",
    "Longitude (degrees)",
    "Coordinate Accuracy",
];

#[derive(Debug, Fail)]
pub enum CatalogError {
    #[fail(display = "I/O error: {}", _0)]
    Io(io::Error),
    #[fail(display = "Csv error: {}", _0)]
    Csv(csv::Error),
    #[fail(display = "Dataset format error at line {}: {}", line, reason)]
    DatasetFormat { line: u64, reason: String },
}

impl From<io::Error> for CatalogError {
    fn from(err: io::Error) -> CatalogError {
        CatalogError::Io(err)
    }
}

impl From<csv::Error> for CatalogError {
    fn from(err: csv::Error) -> CatalogError {
        CatalogError::Csv(err)
    }
}

impl CatalogError {
    fn format<S: Into<String>>(line: u64, reason: S) -> CatalogError {
        CatalogError::DatasetFormat {
            line,
            reason: reason.into(),
        }
    }
}

/**
 * Read-only table of mining properties plus a case-insensitive name index.
 *
 * Built once, never mutated. Several rows may share a lowercase name; lookups
 * always resolve to the first of them in source order.
 */
#[derive(Debug)]
pub struct Catalog {
    records: Vec<PropertyRecord>,
    names: Vec<String>,
    lowercase_names: Vec<String>,
    first_by_lowercase: HashMap<String, usize>,
}

#[derive(Debug, PartialEq)]
struct LoadStats {
    rows: usize,
    bytes_read: u64,
    holder_entries: usize,
    malformed_holder_entries: usize,
}

impl Catalog {
    pub fn load<P: AsRef<path::Path>>(source: P) -> Result<Catalog, CatalogError> {
        let file = File::open(&source)?;
        let file_size = file.metadata()?.len();

        let progress_bar =
            cli_utils::create_progress_bar_bytes(false, "Loading properties...", Some(file_size));
        let result = Catalog::read(file, &progress_bar);
        progress_bar.finish();

        let (catalog, stats) = result?;
        info!(
            "Read {} rows ({} bytes), {} owner/royalty entries, {} malformed",
            stats.rows, stats.bytes_read, stats.holder_entries, stats.malformed_holder_entries
        );
        Ok(catalog)
    }

    /// Same as `load`, without progress reporting.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Catalog, CatalogError> {
        Catalog::read(reader, &ProgressBar::hidden()).map(|(catalog, _)| catalog)
    }

    fn read<R: io::Read>(
        reader: R,
        progress_bar: &ProgressBar,
    ) -> Result<(Catalog, LoadStats), CatalogError> {
        let start_instant = time::Instant::now();

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false) // Validated by hand, the schema is positional.
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut record = csv::StringRecord::new();

        if !csv_reader.read_record(&mut record)? {
            return Err(CatalogError::format(1, "missing header row"));
        }
        check_header(&record)?;

        let mut records = Vec::new();
        while csv_reader.read_record(&mut record)? {
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            if record.len() != SOURCE_COLUMNS.len() {
                return Err(CatalogError::format(
                    line,
                    format!(
                        "expected {} columns, found {}",
                        SOURCE_COLUMNS.len(),
                        record.len()
                    ),
                ));
            }

            let raw: RawPropertyRow = record.deserialize(None)?;
            records.push(into_property_record(raw, line));

            // Offset of the next record, delimiters and quotes included.
            progress_bar.set_position(csv_reader.position().byte());
        }
        let bytes_read = csv_reader.position().byte();
        progress_bar.set_position(bytes_read);

        let elapsed_secs = start_instant.elapsed().as_millis() as f32 / 1000.0f32;
        info!("Loaded {} properties in {} seconds", records.len(), elapsed_secs);

        let (holder_entries, malformed_holder_entries) = check_holders(&records);

        let stats = LoadStats {
            rows: records.len(),
            bytes_read,
            holder_entries,
            malformed_holder_entries,
        };
        Ok((Catalog::new(records), stats))
    }

    fn new(records: Vec<PropertyRecord>) -> Catalog {
        let names: Vec<String> = records.iter().map(|r| r.name.clone()).collect();
        let lowercase_names: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();

        let mut catalog = Catalog {
            records,
            names,
            lowercase_names,
            first_by_lowercase: HashMap::new(),
        };
        catalog.first_by_lowercase = first_positions(catalog.lowercase_names());
        catalog
    }

    /// Display names, in source row order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Lowercased `names()`, same order and length.
    pub fn lowercase_names(&self) -> &[String] {
        &self.lowercase_names
    }

    pub fn record_at(&self, index: usize) -> Option<&PropertyRecord> {
        self.records.get(index)
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> impl Iterator<Item = &PropertyRecord> {
        self.records.iter()
    }

    /// Index of the first row whose name matches case-insensitively.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.first_by_lowercase.get(&name.to_lowercase()).copied()
    }
}

fn check_header(header: &csv::StringRecord) -> Result<(), CatalogError> {
    if header.len() != SOURCE_COLUMNS.len() {
        return Err(CatalogError::format(
            1,
            format!(
                "expected {} columns in header, found {}",
                SOURCE_COLUMNS.len(),
                header.len()
            ),
        ));
    }

    for (column, (found, expected)) in header.iter().zip(SOURCE_COLUMNS.iter()).enumerate() {
        if !found.trim().eq_ignore_ascii_case(expected) {
            return Err(CatalogError::format(
                1,
                format!(
                    "column {} should be {:?}, found {:?}",
                    column + 1,
                    expected,
                    found
                ),
            ));
        }
    }

    Ok(())
}

fn into_property_record(raw: RawPropertyRow, line: u64) -> PropertyRecord {
    PropertyRecord {
        latitude: parse_coordinate(raw.latitude.as_deref(), "latitude", line),
        longitude: parse_coordinate(raw.longitude.as_deref(), "longitude", line),
        project_key: raw.project_key,
        name: raw.property_name,
        owners: raw.owners,
        royalty_holders: raw.royalty_holders,
        development_stage: raw.development_stage,
        activity_status: raw.activity_status,
        coordinate_accuracy: raw.coordinate_accuracy,
    }
}

/// Blank, non-numeric and non-finite values are all an unknown location.
fn parse_coordinate(value: Option<&str>, label: &str, line: u64) -> Option<f64> {
    let value = value?;
    match value.parse::<f64>() {
        Ok(degrees) if degrees.is_finite() => Some(degrees),
        _ => {
            warn!("Invalid {} {:?} at line {}. Location unknown.", label, value, line);
            None
        }
    }
}

/// Lowercase name to the index of its first row.
fn first_positions(lowercase_names: &[String]) -> HashMap<String, usize> {
    let mut first_by_lowercase = HashMap::with_capacity(lowercase_names.len());
    for (idx, name) in lowercase_names.iter().enumerate() {
        first_by_lowercase.entry(name.clone()).or_insert(idx);
    }
    first_by_lowercase
}

/// Runs every owner and royalty entry through the holder parser, logging the bad ones.
/// Returns `(entries, malformed entries)`.
fn check_holders(records: &[PropertyRecord]) -> (usize, usize) {
    let mut total_segments = 0;
    let mut malformed_segments = 0;

    for record in records {
        for raw in [record.owners.as_deref(), record.royalty_holders.as_deref()].iter() {
            for segment in holders::split_holders(*raw) {
                total_segments += 1;
                if let Err(err) = holders::parse_holder(&segment) {
                    malformed_segments += 1;
                    warn!("Property {:?}: {}", record.name, err);
                }
            }
        }
    }

    info!(
        "Checked {} owner/royalty entries, {} malformed",
        total_segments, malformed_segments
    );
    (total_segments, malformed_segments)
}
