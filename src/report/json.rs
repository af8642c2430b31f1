//! JSON output of the derived tables

use crate::error::Result;
use crate::report::DashboardReport;
use std::io::Write;

pub fn write<W: Write>(writer: &mut W, report: &DashboardReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}
