use crate::error::Error;
use crate::record::MetadataRecord;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Write records as CSV with a header row. Nothing is written when there
/// are no records; returns the number of rows written.
pub fn write_report(records: &[MetadataRecord], path: &Path) -> Result<usize, Error> {
    if records.is_empty() {
        debug!("No records, skipping report {}", path.display());
        return Ok(0);
    }
    let wtr = csv::Writer::from_path(path)?;
    write_records(wtr, records)
}

pub fn write_records<W: Write>(
    mut wtr: csv::Writer<W>,
    records: &[MetadataRecord],
) -> Result<usize, Error> {
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(records.len())
}
