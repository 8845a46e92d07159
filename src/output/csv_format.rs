//! CSV output formatting.

use super::ScanRecord;
use std::io::{self, Write};

/// Write one row per probed port.
pub fn write_csv<W: Write>(out: &mut W, record: &ScanRecord) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["host", "port", "reachable", "state", "error"])?;

    for result in &record.results {
        wtr.write_record([
            record.host.as_str(),
            &result.port.to_string(),
            &result.reachable.to_string(),
            &result.state().to_string(),
            &result.error.map_or(String::new(), |e| e.to_string()),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
