// file: src/pipeline/narrator.rs
// description: illustrative stage narration driven by a timer while deep analysis runs
// reference: https://docs.rs/tokio/latest/tokio/sync/watch

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrationStage {
    Idle,
    Extracting,
    Structuring,
    Reasoning,
    Synthesizing,
}

impl NarrationStage {
    pub fn next(&self) -> Option<NarrationStage> {
        match self {
            NarrationStage::Idle => Some(NarrationStage::Extracting),
            NarrationStage::Extracting => Some(NarrationStage::Structuring),
            NarrationStage::Structuring => Some(NarrationStage::Reasoning),
            NarrationStage::Reasoning => Some(NarrationStage::Synthesizing),
            NarrationStage::Synthesizing => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == NarrationStage::Idle
    }

    pub fn description(&self) -> &'static str {
        match self {
            NarrationStage::Idle => "",
            NarrationStage::Extracting => "正在读取上下文并提取关键信息 (Extracting)...",
            NarrationStage::Structuring => "正在构建结构化研报 (Structuring)...",
            NarrationStage::Reasoning => "正在进行逻辑推理与红队测试 (Reasoning)...",
            NarrationStage::Synthesizing => "正在汇总最终决策 (Synthesizing)...",
        }
    }
}

/// Publishes the current narration stage. Stages advance on a fixed cadence,
/// not on real completion of the underlying calls.
#[derive(Debug)]
pub struct ProgressNarrator {
    sender: Arc<watch::Sender<NarrationStage>>,
    interval: Duration,
}

impl ProgressNarrator {
    pub fn new(interval: Duration) -> Self {
        let (sender, _) = watch::channel(NarrationStage::Idle);
        Self {
            sender: Arc::new(sender),
            interval,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<NarrationStage> {
        self.sender.subscribe()
    }

    pub fn current(&self) -> NarrationStage {
        *self.sender.borrow()
    }

    /// Starts narrating. Must be called inside a tokio runtime.
    pub fn start(&self) -> NarrationGuard {
        let active = Arc::new(AtomicBool::new(true));
        publish(&self.sender, &active, NarrationStage::Extracting);

        let sender = Arc::clone(&self.sender);
        let task_active = Arc::clone(&active);
        let interval = self.interval;
        let task = tokio::spawn(async move {
            let mut stage = NarrationStage::Extracting;
            while let Some(next) = stage.next() {
                tokio::time::sleep(interval).await;
                if !publish(&sender, &task_active, next) {
                    break;
                }
                stage = next;
            }
        });

        NarrationGuard {
            sender: Arc::clone(&self.sender),
            active,
            task,
        }
    }

    /// Narrates for exactly as long as `work` runs.
    pub async fn narrate_while<F: Future>(&self, work: F) -> F::Output {
        let _guard = self.start();
        work.await
    }
}

fn publish(
    sender: &watch::Sender<NarrationStage>,
    active: &AtomicBool,
    stage: NarrationStage,
) -> bool {
    sender.send_if_modified(|current| {
        // checked under the channel lock so a reset can never be overwritten
        if !active.load(Ordering::SeqCst) {
            return false;
        }
        debug!("Narration stage: {:?}", stage);
        *current = stage;
        true
    })
}

/// Stops the narration timer and resets the stage to idle when dropped.
#[derive(Debug)]
pub struct NarrationGuard {
    sender: Arc<watch::Sender<NarrationStage>>,
    active: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl Drop for NarrationGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        self.task.abort();
        self.sender.send_replace(NarrationStage::Idle);
    }
}
