//! Station-list transforms: set difference between two tabular station
//! lists and column filtering.

use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::info;

use super::error::TransformError;

/// A station row from a tabular station list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationListRow {
    pub station_complex_id: String,
    pub station_name: String,
}

fn column_index(
    headers: &csv::StringRecord,
    name: &str,
    what: &str,
) -> Result<usize, TransformError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| TransformError::ParseError(format!("{} missing {}", what, name)))
}

/// Read the set of station complex IDs present in a station CSV.
pub fn read_station_ids<R: Read>(reader: R) -> Result<HashSet<String>, TransformError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let idx_id = column_index(&headers, "station_complex_id", "station list")?;

    let mut ids = HashSet::new();
    for result in rdr.records() {
        let record = result?;
        if let Some(id) = record.get(idx_id) {
            if !id.is_empty() {
                ids.insert(id.to_string());
            }
        }
    }
    Ok(ids)
}

/// Rows of the reference list whose station complex ID does not appear
/// in `current_ids`.
pub fn missing_stations<R: Read>(
    reference: R,
    current_ids: &HashSet<String>,
) -> Result<Vec<StationListRow>, TransformError> {
    let mut rdr = csv::Reader::from_reader(reference);
    let headers = rdr.headers()?.clone();
    let idx_id = column_index(&headers, "station_complex_id", "station list")?;
    let idx_name = column_index(&headers, "station_name", "station list")?;

    let mut missing = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let id = record.get(idx_id).unwrap_or("");
        if id.is_empty() || current_ids.contains(id) {
            continue;
        }
        missing.push(StationListRow {
            station_complex_id: id.to_string(),
            station_name: record.get(idx_name).unwrap_or("").to_string(),
        });
    }
    Ok(missing)
}

/// Compute the rows present in the reference list but absent from the
/// current list, keyed by station complex ID.
pub fn report_missing_stations(
    current: &Path,
    reference: &Path,
) -> Result<Vec<StationListRow>, TransformError> {
    let current_ids = read_station_ids(File::open(current)?)?;
    let missing = missing_stations(File::open(reference)?, &current_ids)?;
    info!(missing = missing.len(), "Computed station set difference");
    Ok(missing)
}

/// Drop the given zero-based column positions from a CSV, header
/// included. Positions beyond the width of a row are ignored.
pub fn drop_columns<R: Read, W: Write>(
    reader: R,
    writer: W,
    drop: &[usize],
) -> Result<(), TransformError> {
    let drop: HashSet<usize> = drop.iter().copied().collect();
    let mut rdr = csv::Reader::from_reader(reader);
    let mut wtr = csv::Writer::from_writer(writer);

    let headers = rdr.headers()?.clone();
    wtr.write_record(filter_record(&headers, &drop))?;
    for result in rdr.records() {
        let record = result?;
        wtr.write_record(filter_record(&record, &drop))?;
    }
    wtr.flush()?;
    Ok(())
}

fn filter_record<'a>(record: &'a csv::StringRecord, drop: &HashSet<usize>) -> Vec<&'a str> {
    record
        .iter()
        .enumerate()
        .filter(|(i, _)| !drop.contains(i))
        .map(|(_, field)| field)
        .collect()
}

/// Drop configured columns from `input` and save the rest to `output`.
pub fn filter_columns_file(
    input: &Path,
    output: &Path,
    drop: &[usize],
) -> Result<(), TransformError> {
    drop_columns(File::open(input)?, File::create(output)?, drop)?;
    info!(path = %output.display(), dropped = drop.len(), "Saved filtered CSV");
    Ok(())
}
