//! JSON output adapter.

use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::Result;
use help_signal_core::{FrameReport, ReportOutput};
use serde::Serialize;

/// JSON Lines output adapter.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Creates a new JSON output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Writes any serializable value as one line.
    #[allow(clippy::significant_drop_tightening)]
    pub fn write_line<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }

    /// Writes a batch of values as a JSON array.
    #[allow(clippy::significant_drop_tightening)]
    pub fn write_array<T: Serialize>(&self, items: &[T], pretty: bool) -> Result<()> {
        let json = if pretty {
            serde_json::to_string_pretty(items)?
        } else {
            serde_json::to_string(items)?
        };
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }
}

impl ReportOutput for JsonOutput {
    fn write(&self, report: &FrameReport) -> Result<()> {
        self.write_line(report)
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}

/// Collects reports and writes them as one JSON array on flush.
pub struct JsonArrayOutput {
    inner: JsonOutput,
    pretty: bool,
    reports: Mutex<Vec<FrameReport>>,
}

impl JsonArrayOutput {
    #[must_use]
    pub fn new(inner: JsonOutput, pretty: bool) -> Self {
        Self {
            inner,
            pretty,
            reports: Mutex::new(Vec::new()),
        }
    }
}

impl ReportOutput for JsonArrayOutput {
    fn write(&self, report: &FrameReport) -> Result<()> {
        self.reports
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?
            .push(report.clone());
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let reports = std::mem::take(
            &mut *self
                .reports
                .lock()
                .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?,
        );
        self.inner.write_array(&reports, self.pretty)?;
        self.inner.flush()
    }
}
