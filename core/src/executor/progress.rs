use std::collections::HashMap;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Visual progress monitor for a batch run
///
/// One overall bar plus a spinner per in-flight task. Disabled monitors are
/// no-ops, so callers never branch on the flag themselves.
pub struct ProgressMonitor {
    multi: MultiProgress,
    overall: ProgressBar,
    task_bars: HashMap<String, ProgressBar>,
    enabled: bool,
}

impl ProgressMonitor {
    /// Create a new progress monitor
    ///
    /// # Arguments
    ///
    /// * `total_tasks` - Number of tasks dispatched by the run
    /// * `enabled` - Whether to draw anything (off for JSON output and tests)
    pub fn new(total_tasks: usize, enabled: bool) -> Self {
        if !enabled {
            return Self::hidden();
        }

        let multi = MultiProgress::new();
        let overall = multi.add(ProgressBar::new(total_tasks as u64));

        match ProgressStyle::default_bar().template(
            "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} posters ({percent}%) {msg}",
        ) {
            Ok(style) => overall.set_style(style.progress_chars("█▓▒░  ")),
            Err(e) => tracing::debug!(error = %e, "progress template rejected"),
        }
        overall.set_message("Generating...");

        Self {
            multi,
            overall,
            task_bars: HashMap::new(),
            enabled: true,
        }
    }

    fn hidden() -> Self {
        Self {
            multi: MultiProgress::new(),
            overall: ProgressBar::hidden(),
            task_bars: HashMap::new(),
            enabled: false,
        }
    }

    /// Add a task and create its spinner
    pub fn add_task(&mut self, task_id: &str, label: &str) {
        if !self.enabled {
            return;
        }

        let bar = self.multi.add(ProgressBar::new_spinner());
        if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.green} {msg}") {
            bar.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
        }
        bar.set_message(format!("⏳ {label}"));
        bar.enable_steady_tick(Duration::from_millis(100));

        self.task_bars.insert(task_id.to_string(), bar);
    }

    /// Mark a task as settled
    pub fn complete_task(&mut self, task_id: &str, success: bool, duration_ms: u64) {
        if !self.enabled {
            return;
        }

        if let Some(bar) = self.task_bars.remove(task_id) {
            let icon = if success { "✅" } else { "❌" };
            bar.finish_with_message(format!("{icon} {task_id} ({duration_ms}ms)"));
        }

        self.overall.inc(1);
    }

    pub fn finish(&self, succeeded: usize, failed: usize) {
        if !self.enabled {
            return;
        }

        let msg = if failed == 0 {
            format!("✅ {succeeded} generated")
        } else {
            format!("⚠️ {succeeded} generated, {failed} failed")
        };
        self.overall.finish_with_message(msg);
    }
}

impl Drop for ProgressMonitor {
    fn drop(&mut self) {
        for (_, bar) in self.task_bars.drain() {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_monitor_disabled() {
        let mut monitor = ProgressMonitor::new(3, false);

        // Should not panic when disabled
        monitor.add_task("task1", "Poster 1");
        monitor.complete_task("task1", true, 100);
        monitor.finish(1, 0);
        assert!(monitor.task_bars.is_empty());
    }

    #[test]
    fn test_progress_monitor_enabled() {
        let mut monitor = ProgressMonitor::new(2, true);

        monitor.add_task("task1", "Summer Sale");
        monitor.add_task("task2", "Winter Sale");
        assert_eq!(monitor.task_bars.len(), 2);

        monitor.complete_task("task1", true, 100);
        monitor.complete_task("task2", false, 200);
        assert!(monitor.task_bars.is_empty());
        assert_eq!(monitor.overall.position(), 2);

        monitor.finish(1, 1);
    }
}
