//! Shape-table transforms: group a flat GTFS shapes.txt by shape ID
//! and split the resulting JSON into per-key files.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use super::error::TransformError;

/// One point of a shape, kept in `shape_pt_sequence` order. The
/// sequence column drives sorting but is not part of the output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShapePoint {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip)]
    pub sequence: u32,
}

/// Parse a GTFS shapes.txt, group points by shape ID, and sort each
/// group by the sequence column. Malformed rows are logged and skipped.
pub fn read_shape_points<R: Read>(
    reader: R,
) -> Result<BTreeMap<String, Vec<ShapePoint>>, TransformError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();

    let idx_id = headers
        .iter()
        .position(|h| h == "shape_id")
        .ok_or_else(|| TransformError::ParseError("shapes.txt missing shape_id".into()))?;
    let idx_lat = headers
        .iter()
        .position(|h| h == "shape_pt_lat")
        .ok_or_else(|| TransformError::ParseError("shapes.txt missing shape_pt_lat".into()))?;
    let idx_lon = headers
        .iter()
        .position(|h| h == "shape_pt_lon")
        .ok_or_else(|| TransformError::ParseError("shapes.txt missing shape_pt_lon".into()))?;
    let idx_seq = headers
        .iter()
        .position(|h| h == "shape_pt_sequence")
        .ok_or_else(|| TransformError::ParseError("shapes.txt missing shape_pt_sequence".into()))?;

    let mut shapes: BTreeMap<String, Vec<ShapePoint>> = BTreeMap::new();
    let mut skipped = 0usize;
    for result in rdr.records() {
        let record = result?;
        let shape_id = record.get(idx_id).unwrap_or("");
        let lat: Option<f64> = record.get(idx_lat).and_then(|s| s.parse().ok());
        let lon: Option<f64> = record.get(idx_lon).and_then(|s| s.parse().ok());
        let seq: Option<u32> = record.get(idx_seq).and_then(|s| s.parse().ok());
        match (lat, lon, seq) {
            (Some(latitude), Some(longitude), Some(sequence)) if !shape_id.is_empty() => {
                shapes.entry(shape_id.to_string()).or_default().push(ShapePoint {
                    latitude,
                    longitude,
                    sequence,
                });
            }
            _ => {
                skipped += 1;
                warn!(row = ?record, "Skipping malformed shapes.txt row");
            }
        }
    }
    if skipped > 0 {
        warn!(skipped, "Skipped malformed shapes.txt rows");
    }

    for points in shapes.values_mut() {
        points.sort_by_key(|p| p.sequence);
    }

    Ok(shapes)
}

/// Write grouped shapes as JSON keyed by shape ID, each value an
/// ordered `[{latitude, longitude}...]` list.
pub fn write_grouped_shapes<W: Write>(
    shapes: &BTreeMap<String, Vec<ShapePoint>>,
    writer: W,
) -> Result<(), TransformError> {
    serde_json::to_writer_pretty(writer, shapes)?;
    Ok(())
}

/// Group a shapes.txt file into nested JSON keyed by shape ID.
pub fn group_shapes_file(input: &Path, output: &Path) -> Result<(), TransformError> {
    let shapes = read_shape_points(File::open(input)?)?;
    info!(shapes = shapes.len(), "Grouped shape points by shape ID");
    write_grouped_shapes(&shapes, File::create(output)?)?;
    info!(path = %output.display(), "Saved grouped shapes JSON");
    Ok(())
}

/// Split a JSON object into one file per top-level key, written into
/// `output_dir` as `{key}.json`. Returns the number of files written.
pub fn split_json_by_key(input: &Path, output_dir: &Path) -> Result<usize, TransformError> {
    let content = std::fs::read_to_string(input)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    let Some(object) = value.as_object() else {
        return Err(TransformError::ParseError(
            "expected a top-level JSON object".into(),
        ));
    };

    std::fs::create_dir_all(output_dir)?;
    for (key, entry) in object {
        let path = output_dir.join(format!("{}.json", key));
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, entry)?;
    }
    info!(files = object.len(), dir = %output_dir.display(), "Split JSON by top-level key");
    Ok(object.len())
}
