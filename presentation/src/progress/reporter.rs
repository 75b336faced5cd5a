//! Progress reporting for council runs

use colored::Colorize;
use council_application::ProgressNotifier;
use council_domain::{ReviewerId, RunPhase};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports progress during a run with progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-")
    }

    fn phase_display_name(phase: RunPhase) -> &'static str {
        match phase {
            RunPhase::Init => "Init",
            RunPhase::Knowledge => "Knowledge Retrieval",
            RunPhase::Phase1 => "Phase 1: Independent Reviews",
            RunPhase::Phase2 => "Phase 2: Cross-Scoring",
            RunPhase::Consensus => "Consensus",
            RunPhase::Integrate => "Integrate",
            RunPhase::RedTeam => "Red-Team",
            RunPhase::Inquiry => "Inquiry Perspectives",
            RunPhase::Done => "Done",
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: RunPhase, total_jobs: usize) {
        let pb = self.multi.add(ProgressBar::new(total_jobs as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(Self::phase_display_name(phase));
        pb.set_message("dispatching...");

        *self.phase_bar.lock().unwrap() = Some(pb);
    }

    fn on_call_complete(&self, _phase: RunPhase, reviewer: &ReviewerId, success: bool) {
        if let Some(pb) = self.phase_bar.lock().unwrap().as_ref() {
            let status = if success {
                format!("{} {}", "v".green(), reviewer.short_name())
            } else {
                format!("{} {}", "x".red(), reviewer.short_name())
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, phase: RunPhase) {
        if let Some(pb) = self.phase_bar.lock().unwrap().take() {
            pb.finish_with_message(format!(
                "{} complete",
                Self::phase_display_name(phase).green()
            ));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: RunPhase, total_jobs: usize) {
        println!(
            "{} {} ({} calls)",
            "->".cyan(),
            ProgressReporter::phase_display_name(phase).bold(),
            total_jobs
        );
    }

    fn on_call_complete(&self, _phase: RunPhase, reviewer: &ReviewerId, success: bool) {
        if success {
            println!("  {} {}", "v".green(), reviewer);
        } else {
            println!("  {} {} (failed)", "x".red(), reviewer);
        }
    }

    fn on_phase_complete(&self, _phase: RunPhase) {
        println!();
    }
}
