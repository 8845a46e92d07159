//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use super::ScanRecord;
use crate::scanner::ProbeState;
use console::{style, Style};
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Write results in human-readable plain text.
///
/// Unreachable ports are only listed when `show_unreachable` is set; they are
/// always counted in the statistics line.
pub fn write_plain<W: Write>(
    out: &mut W,
    record: &ScanRecord,
    show_unreachable: bool,
) -> io::Result<()> {
    let summary = &record.summary;

    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out, "  {} {}", style("Host:").bold(), record.host)?;
    writeln!(
        out,
        "  {} {} ports probed in {:.2}s",
        style("Statistics:").bold(),
        summary.total,
        record.duration_ms as f64 / 1000.0
    )?;
    writeln!(
        out,
        "              {} reachable, {} refused, {} timed out, {} errored",
        style(summary.reachable).green().bold(),
        style(summary.refused).red(),
        style(summary.timed_out).yellow(),
        style(summary.errored).magenta()
    )?;
    writeln!(out)?;

    let rows: Vec<_> = record
        .results
        .iter()
        .filter(|r| show_unreachable || r.reachable)
        .collect();

    if rows.is_empty() {
        writeln!(out, "  {}", style("No reachable ports.").dim())?;
    } else {
        writeln!(out, "  {}", style(THIN_RULE).dim())?;
        writeln!(
            out,
            "  {:>6}  {:<10}  {}",
            style("PORT").bold(),
            style("STATE").bold(),
            style("DETAIL").bold()
        )?;
        writeln!(out, "  {}", style(THIN_RULE).dim())?;

        for result in rows {
            let state = result.state();
            let state_style = match state {
                ProbeState::Reachable => Style::new().green().bold(),
                ProbeState::Refused => Style::new().red(),
                ProbeState::TimedOut => Style::new().yellow(),
                _ => Style::new().magenta(),
            };
            let detail = result.error.map(|e| e.to_string()).unwrap_or_default();

            writeln!(
                out,
                "  {:>6}  {:<10}  {}",
                result.port,
                state_style.apply_to(state.to_string()),
                style(detail).dim()
            )?;
        }

        writeln!(out, "  {}", style(THIN_RULE).dim())?;
    }

    writeln!(out)?;
    Ok(())
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(host: &str, ports: usize, concurrency: usize) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("portprobe").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{} Target: {}",
        style("•").dim(),
        style(host).white().bold()
    );
    println!(
        "{} Probing {} ports, {} at a time...",
        style("•").dim(),
        style(ports).white().bold(),
        concurrency
    );
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::sample_record;

    fn render(show_unreachable: bool) -> String {
        let mut buf = Vec::new();
        write_plain(&mut buf, &sample_record(), show_unreachable).unwrap();
        console::strip_ansi_codes(&String::from_utf8(buf).unwrap()).into_owned()
    }

    #[test]
    fn test_hides_unreachable_by_default() {
        let text = render(false);
        assert!(text.contains("8080"));
        assert!(!text.contains("8081"));
        assert!(text.contains("2 ports probed in 1.23s"));
    }

    #[test]
    fn test_lists_unreachable_on_request() {
        let text = render(true);
        assert!(text.contains("8081"));
        assert!(text.contains("connection refused"));
    }
}
