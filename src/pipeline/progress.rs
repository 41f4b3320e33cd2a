// file: src/pipeline/progress.rs
// description: invocation statistics and terminal rendering of narration stages
// reference: uses indicatif for the spinner and atomic counters for metrics

use crate::pipeline::narrator::NarrationStage;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    pub invocations: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub degraded_reasoning: usize,
    pub total_duration_ms: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.succeeded + self.failed;
        if total == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / total as f64) * 100.0
    }

    pub fn average_duration_ms(&self) -> f64 {
        if self.invocations == 0 {
            return 0.0;
        }
        self.total_duration_ms as f64 / self.invocations as f64
    }

    pub fn format(&self) -> String {
        format!(
            "{} runs | {} ok | {} failed | {} degraded | {:.1}% success | avg {:.0}ms",
            self.invocations,
            self.succeeded,
            self.failed,
            self.degraded_reasoning,
            self.success_rate(),
            self.average_duration_ms()
        )
    }
}

/// Lock-free counters behind [`PipelineStats`].
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    invocations: AtomicUsize,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
    degraded_reasoning: AtomicUsize,
    total_duration_ms: AtomicU64,
}

impl StatsRecorder {
    pub(crate) fn record_success(&self, duration: Duration, degraded: bool) {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        self.succeeded.fetch_add(1, Ordering::SeqCst);
        if degraded {
            self.degraded_reasoning.fetch_add(1, Ordering::SeqCst);
        }
        self.add_duration(duration);
    }

    pub(crate) fn record_failure(&self, duration: Duration) {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        self.failed.fetch_add(1, Ordering::SeqCst);
        self.add_duration(duration);
    }

    fn add_duration(&self, duration: Duration) {
        self.total_duration_ms
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }

    pub(crate) fn snapshot(&self) -> PipelineStats {
        PipelineStats {
            invocations: self.invocations.load(Ordering::SeqCst),
            succeeded: self.succeeded.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            degraded_reasoning: self.degraded_reasoning.load(Ordering::SeqCst),
            total_duration_ms: self.total_duration_ms.load(Ordering::SeqCst),
        }
    }
}

/// Spinner that mirrors a narrator's stage channel until finished.
pub struct NarrationDisplay {
    bar: ProgressBar,
    task: JoinHandle<()>,
}

impl NarrationDisplay {
    /// Must be called inside a tokio runtime.
    pub fn spawn(mut receiver: watch::Receiver<NarrationStage>, colored: bool) -> Self {
        let bar = create_spinner(colored);
        let task_bar = bar.clone();

        let task = tokio::spawn(async move {
            loop {
                let stage = *receiver.borrow_and_update();
                task_bar.set_message(stage_message(stage, colored));
                if receiver.changed().await.is_err() {
                    break;
                }
            }
        });

        Self { bar, task }
    }

    pub fn finish(&self) {
        self.task.abort();
        self.bar.finish_and_clear();
    }
}

impl Drop for NarrationDisplay {
    fn drop(&mut self) {
        self.finish();
    }
}

fn stage_message(stage: NarrationStage, colored: bool) -> String {
    let text = stage.description();
    if colored && !stage.is_idle() {
        text.cyan().to_string()
    } else {
        text.to_string()
    }
}

fn create_spinner(colored: bool) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let template = if colored {
        "{spinner:.green} [{elapsed}] {msg}"
    } else {
        "{spinner} [{elapsed}] {msg}"
    };
    let style = ProgressStyle::default_spinner()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    bar.set_style(style);
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_stats_calculations() {
        let stats = PipelineStats {
            invocations: 4,
            succeeded: 3,
            failed: 1,
            degraded_reasoning: 1,
            total_duration_ms: 2000,
        };

        assert_eq!(stats.success_rate(), 75.0);
        assert_eq!(stats.average_duration_ms(), 500.0);
        assert!(stats.format().contains("1 degraded"));
    }

    #[test]
    fn test_pipeline_stats_empty() {
        let stats = PipelineStats::new();
        assert_eq!(stats.success_rate(), 0.0);
        assert_eq!(stats.average_duration_ms(), 0.0);
    }

    #[test]
    fn test_recorder_counts() {
        let recorder = StatsRecorder::default();
        recorder.record_success(Duration::from_millis(30), false);
        recorder.record_success(Duration::from_millis(30), true);
        recorder.record_failure(Duration::from_millis(40));

        let stats = recorder.snapshot();
        assert_eq!(stats.invocations, 3);
        assert_eq!(stats.succeeded, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.degraded_reasoning, 1);
        assert_eq!(stats.total_duration_ms, 100);
    }

    #[test]
    fn test_idle_stage_renders_empty() {
        assert_eq!(stage_message(NarrationStage::Idle, true), "");
        assert!(stage_message(NarrationStage::Reasoning, false).contains("Reasoning"));
    }

    #[tokio::test]
    async fn test_display_finishes_cleanly() {
        let (tx, rx) = watch::channel(NarrationStage::Idle);
        let display = NarrationDisplay::spawn(rx, false);
        tx.send_replace(NarrationStage::Extracting);
        display.finish();
        assert!(display.bar.is_finished());
    }
}
