//! Filtered-record export as CSV
//!
//! Columns come out in the order the source file had them, and every value
//! is written in its normalized textual form, so re-loading an export gives
//! back the same records.

use crate::catalog::Record;
use crate::error::Result;
use std::io::Write;

/// Suggested filename when offering the export as a download
pub const DOWNLOAD_FILENAME: &str = "catalog_filtered.csv";

pub fn write<W: Write>(writer: W, headers: &[String], records: &[&Record]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);

    out.write_record(headers)?;
    for record in records {
        out.write_record(
            headers
                .iter()
                .enumerate()
                .map(|(idx, name)| record.cell_text(idx, name)),
        )?;
    }

    out.flush()?;
    Ok(())
}

/// Export into an in-memory buffer.
pub fn to_bytes(headers: &[String], records: &[&Record]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write(&mut buf, headers, records)?;
    Ok(buf)
}
