//! JSON output formatting.

use anyhow::Result;
use runsync_store::SyncReport;
use serde::Serialize;

/// JSON report: the run summary plus an overall flag.
#[derive(Debug, Serialize)]
pub struct ReportOutput<'a> {
    /// True if no item failed.
    pub clean: bool,
    #[serde(flatten)]
    pub report: &'a SyncReport,
}

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(data)?)
        } else {
            Ok(serde_json::to_string(data)?)
        }
    }

    /// Formats a run report.
    pub fn format_report(&self, report: &SyncReport) -> Result<String> {
        self.format(&ReportOutput {
            clean: report.is_clean(),
            report,
        })
    }
}
