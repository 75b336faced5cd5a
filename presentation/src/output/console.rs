//! Console output formatter for council reports

use crate::output::formatter::ReportFormatter;
use colored::Colorize;
use council_domain::{FinalReport, RunStatus};
use serde_json::Value;

/// Formats final reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete report
    pub fn format(report: &FinalReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Council Review Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}  ({})\n",
            "Document:".cyan().bold(),
            report.document,
            report.phase
        ));
        output.push_str(&format!("{} {}\n", "Domain:".cyan().bold(), report.domain));
        output.push_str(&format!(
            "{} {}  {} {}\n",
            "Mode:".cyan().bold(),
            report.execution.mode,
            "Run:".cyan().bold(),
            report.execution.run_id
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Status:".cyan().bold(),
            Self::status_label(&report.status)
        ));
        if let Some(note) = &report.note {
            output.push_str(&format!("{} {}\n", "Note:".yellow().bold(), note));
        }
        output.push_str(&format!(
            "{} {:.1}s, {} cents (${:.2}), {} tokens\n",
            "Spend:".cyan().bold(),
            report.metrics.latency_ms as f64 / 1000.0,
            report.metrics.cost_cents,
            report.metrics.cost_usd,
            report.metrics.total_tokens
        ));

        if let Some(consensus) = report.payload.get("consensus") {
            output.push_str(&Self::format_consensus(consensus));
        }
        if let Some(perspectives) = report.payload.get("perspectives") {
            output.push_str(&Self::format_perspectives(perspectives));
        }
        if let Some(red_team) = report.payload.get("red_team") {
            output.push_str(&Self::section_header("Red-Team Findings"));
            output.push_str(&format!(
                "{}\n",
                serde_json::to_string_pretty(red_team).unwrap_or_else(|_| "{}".to_string())
            ));
        }
        if report.payload.get("consensus").is_none() {
            if let Some(raw) = report.payload.get("raw_reviews") {
                output.push_str(&Self::format_raw_reviews(raw));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(report: &FinalReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn status_label(status: &RunStatus) -> String {
        match status {
            RunStatus::Success => "success".green().bold().to_string(),
            RunStatus::Degraded { .. } => "degraded".yellow().bold().to_string(),
            RunStatus::KnowledgeFailed { .. } => "knowledge failed".yellow().bold().to_string(),
            RunStatus::AllCallsFailed { phase } => {
                format!("{} ({})", "all calls failed".red().bold(), phase)
            }
            RunStatus::DeadlineExceeded => "deadline exceeded".red().bold().to_string(),
            RunStatus::BudgetExceeded => "budget exceeded".red().bold().to_string(),
        }
    }

    fn format_consensus(consensus: &Value) -> String {
        let mut output = Self::section_header("Consensus");

        if let Some(summary) = consensus.get("summary") {
            output.push_str(&format!(
                "{} {} items: {} high-consensus, {} disputed, {} low-value, {} blockers ({:.0}% agreement)\n",
                "Summary:".cyan().bold(),
                summary["total"],
                summary["high_consensus"],
                summary["disputed"],
                summary["low_value"],
                summary["blockers"],
                summary["percent_agreement"].as_f64().unwrap_or(0.0),
            ));
        }

        if let Some(items) = consensus.get("items").and_then(|i| i.as_array()) {
            for item in items {
                let classification = item["classification"].as_str().unwrap_or("?");
                let label = match classification {
                    "blocker" => classification.red().bold().to_string(),
                    "high_consensus" => classification.green().to_string(),
                    "disputed" => classification.yellow().to_string(),
                    _ => classification.dimmed().to_string(),
                };
                output.push_str(&format!(
                    "  [{}] {} {}\n",
                    label,
                    item["description"].as_str().unwrap_or(""),
                    format!("(from {})", item["source_reviewer"].as_str().unwrap_or("?"))
                        .dimmed()
                ));
            }
        }

        output
    }

    fn format_perspectives(perspectives: &Value) -> String {
        let mut output = Self::section_header("Inquiry Perspectives");

        let Some(map) = perspectives.as_object() else {
            return output;
        };
        for (name, perspective) in map {
            let findings = perspective["findings"].as_array().map_or(0, |f| f.len());
            let raw = perspective["raw"].as_bool().unwrap_or(false);
            let marker = if raw {
                "raw".yellow().to_string()
            } else {
                format!("{} findings", findings).green().to_string()
            };
            output.push_str(&format!(
                "\n{} [{}]\n",
                format!("── {} ──", name).yellow().bold(),
                marker
            ));
            if let Some(items) = perspective["findings"].as_array() {
                for finding in items {
                    let text = finding
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| finding.to_string());
                    output.push_str(&format!("  * {}\n", text));
                }
            }
        }

        output
    }

    fn format_raw_reviews(raw: &Value) -> String {
        let mut output = Self::section_header("Raw Reviews");

        let Some(results) = raw.as_array() else {
            return output;
        };
        for result in results {
            let reviewer = result["reviewer"].as_str().unwrap_or("?");
            let mode = result["mode"].as_str().unwrap_or("?");
            if result["succeeded"].as_bool().unwrap_or(false) {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ({}) ──", reviewer, mode).yellow().bold(),
                    result["content"].as_str().unwrap_or("")
                ));
            } else {
                output.push_str(&format!(
                    "\n{}\nError: {}\n",
                    format!("── {} ({}) ──", reviewer, mode).red().bold(),
                    result["error_detail"].as_str().unwrap_or("unknown")
                ));
            }
        }

        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl ReportFormatter for ConsoleFormatter {
    fn format(&self, report: &FinalReport) -> String {
        Self::format(report)
    }

    fn format_json(&self, report: &FinalReport) -> String {
        Self::format_json(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{DocumentPhase, ExecutionInfo, RunMetrics, RunMode};
    use serde_json::json;

    fn report(payload: Value, status: RunStatus) -> FinalReport {
        FinalReport {
            phase: DocumentPhase::Prd,
            document: "docs/prd.md".to_string(),
            domain: "payments".to_string(),
            execution: ExecutionInfo {
                mode: RunMode::Review,
                reason: status.reason(),
                run_id: "run-1a2b".to_string(),
            },
            metrics: RunMetrics {
                latency_ms: 4_200,
                cost_cents: 92,
                cost_usd: 0.92,
                total_tokens: 10_000,
            },
            status,
            note: None,
            payload,
        }
    }

    #[test]
    fn test_consensus_report_lists_classified_items() {
        colored::control::set_override(false);
        let payload = json!({
            "consensus": {
                "items": [
                    {
                        "source_reviewer": "claude-sonnet-4.5",
                        "description": "add rollback plan",
                        "classification": "blocker"
                    },
                    {
                        "source_reviewer": "gpt-5.2-codex",
                        "description": "define SLOs",
                        "classification": "high_consensus"
                    }
                ],
                "summary": {
                    "total": 2, "high_consensus": 1, "disputed": 0,
                    "low_value": 0, "blockers": 1, "percent_agreement": 50.0
                },
                "scoring": null
            },
            "raw_reviews": []
        });

        let text = ConsoleFormatter::format(&report(payload, RunStatus::Success));
        assert!(text.contains("docs/prd.md"));
        assert!(text.contains("[blocker] add rollback plan"));
        assert!(text.contains("[high_consensus] define SLOs"));
        assert!(text.contains("50% agreement"));
        // Raw reviews stay out of the way when consensus is present
        assert!(!text.contains("Raw Reviews"));
    }

    #[test]
    fn test_degraded_raw_reviews_report() {
        colored::control::set_override(false);
        let payload = json!({
            "raw_reviews": [
                {
                    "reviewer": "claude-sonnet-4.5",
                    "mode": "review",
                    "succeeded": true,
                    "content": "looks solid"
                },
                {
                    "reviewer": "gpt-5.2-codex",
                    "mode": "review",
                    "succeeded": false,
                    "error_detail": "call timed out"
                }
            ]
        });
        let status = RunStatus::Degraded {
            note: "budget denied phase2".to_string(),
        };

        let text = ConsoleFormatter::format(&report(payload, status));
        assert!(text.contains("degraded"));
        assert!(text.contains("looks solid"));
        assert!(text.contains("Error: call timed out"));
    }

    #[test]
    fn test_inquiry_report_marks_raw_perspectives() {
        colored::control::set_override(false);
        let payload = json!({
            "perspectives": {
                "structural": {
                    "reviewer": "claude-sonnet-4.5",
                    "findings": ["no module owns retries"],
                    "raw": false
                },
                "historical": {
                    "reviewer": "gpt-5.2-codex",
                    "findings": [],
                    "raw": true
                }
            }
        });

        let text = ConsoleFormatter::format(&report(payload, RunStatus::Success));
        assert!(text.contains("structural"));
        assert!(text.contains("no module owns retries"));
        assert!(text.contains("[raw]"));
    }

    #[test]
    fn test_json_output_round_trips() {
        let payload = json!({"raw_reviews": []});
        let original = report(payload, RunStatus::Success);
        let text = ConsoleFormatter::format_json(&original);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["document"], "docs/prd.md");
        assert_eq!(parsed["metrics"]["cost_cents"], 92);
    }
}
