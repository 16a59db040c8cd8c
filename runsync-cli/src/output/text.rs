//! Text output formatting with colors.

use runsync_store::{CatalogEntry, ListSource, SyncReport};
use std::fmt::Write as _;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats a run report.
    pub fn format_report(&self, report: &SyncReport) -> String {
        let mut out = String::new();

        if !report.location_lists.is_empty() {
            let _ = writeln!(out, "{}", self.bold("Location lists"));
            for list in &report.location_lists {
                let _ = writeln!(
                    out,
                    "  {:<18} {:<12} {} locations",
                    list.set,
                    self.format_source(list.source),
                    list.locations
                );
            }
            let _ = writeln!(out, "  {} unique location ids", report.location_ids.len());
            out.push('\n');
        }

        if !report.written.is_empty() || !report.stale.is_empty() {
            let _ = writeln!(out, "{}", self.bold("Catalogs"));
            for entry in &report.written {
                let _ = writeln!(out, "  {} {}", self.color("✓", GREEN), self.format_entry(entry));
            }
            for entry in &report.stale {
                let _ = writeln!(
                    out,
                    "  {} {} {}",
                    self.color("=", DIM),
                    self.format_entry(entry),
                    self.color("not newer, kept", DIM)
                );
            }
            out.push('\n');
        }

        if !report.failures.is_empty() {
            let _ = writeln!(out, "{}", self.bold("Failures"));
            for failure in &report.failures {
                let _ = writeln!(
                    out,
                    "  {} {}: {}",
                    self.color("✗", RED),
                    failure.item,
                    failure.reason
                );
            }
            out.push('\n');
        }

        let _ = writeln!(
            out,
            "{} written, {} unchanged, {} failed, {} token refreshes",
            report.written.len(),
            report.stale.len(),
            report.failures.len(),
            report.token_refreshes
        );
        out
    }

    /// Formats the result of a forced login.
    pub fn format_login(&self, secret: Option<&str>) -> String {
        let status = self.color("✓", GREEN);
        match secret {
            Some(name) => format!("{status} Logged in; token published as {}", self.bold(name)),
            None => format!("{status} Logged in; no secret store configured, token not published"),
        }
    }

    fn format_entry(&self, entry: &CatalogEntry) -> String {
        let file = entry
            .file
            .file_name()
            .map_or_else(|| entry.file.display().to_string(), |f| f.to_string_lossy().into_owned());
        format!("{:<8} {} ({})", entry.location_id, file, entry.cached_at)
    }

    fn format_source(&self, source: ListSource) -> String {
        match source {
            ListSource::Fetched => self.color("fetched", GREEN),
            ListSource::Fallback => self.color("fallback", YELLOW),
            ListSource::Unavailable => self.color("unavailable", RED),
        }
    }

    fn bold(&self, text: &str) -> String {
        self.color(text, BOLD)
    }

    fn color(&self, text: &str, code: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}
