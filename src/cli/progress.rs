//! Console output helpers shared by both binaries
//!
//! Short status lines for the user plus the writer that lets the logger
//! mirror stderr into a log file.

use crate::convert::batch::BatchReport;
use std::io::Write;

/// Print a success message with checkmark
pub fn print_success(msg: &str) {
    println!("  ✓ {}", msg);
}

/// Print an info message with bullet
pub fn print_info(msg: &str) {
    println!("  • {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("  ⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    println!("  ✗ {}", msg);
}

/// Print the outcome of a batch conversion, one line per failed file
pub fn print_batch_summary(report: &BatchReport) {
    println!();
    if report.has_failures() {
        print_warning(&report.to_string());
        for (path, reason) in &report.failed {
            print_error(&format!("{}: {}", path.display(), reason));
        }
    } else {
        print_success(&report.to_string());
    }
    if report.interrupted {
        print_info("Stopped early, run again to convert the remaining files");
    }
}

/// A writer that writes to both console and file
///
/// Used for logging to both stderr and a log file simultaneously.
pub struct DualWriter {
    pub console: std::io::Stderr,
    pub file: std::fs::File,
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let _ = self.console.write(buf);
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let _ = self.console.flush();
        self.file.flush()
    }
}
