//! Report output port for writing overlay reports.

use crate::domain::OverlayReport;

/// Port for outputting overlay reports.
pub trait ReportOutput: Send + Sync {
    /// Writes a single overlay report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, report: &OverlayReport) -> anyhow::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> anyhow::Result<()>;
}
