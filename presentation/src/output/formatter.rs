//! Report formatter trait

use council_domain::FinalReport;

/// Trait for formatting final reports
pub trait ReportFormatter {
    /// Format the complete report for human reading
    fn format(&self, report: &FinalReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &FinalReport) -> String;
}
