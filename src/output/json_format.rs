//! JSON output formatting.

use super::ScanRecord;
use std::io::{self, Write};

/// Write the record as pretty-printed JSON.
pub fn write_json<W: Write>(out: &mut W, record: &ScanRecord) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, record)?;
    writeln!(out)
}
