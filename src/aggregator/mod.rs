//! Change Aggregation and Scheduling
//!
//! Long-lived loop that coalesces file events into batches. Each event
//! merges into a pending [`ChangeSet`] and resets a debounce timer; a batch
//! is processed when the debounce window elapses, when the periodic flush
//! interval fires (bounding staleness under continuous low-rate churn), or
//! on an explicit flush request.
//!
//! ## Concurrency
//!
//! Only one batch is ever in flight: the run loop awaits the handler
//! inline, so a flush triggered mid-batch is deferred - events arriving
//! meanwhile buffer in the channel and merge into the next batch. This
//! single-writer discipline is the only concurrency control the on-disk
//! documentation tree needs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep_until};
use tracing::{debug, error, info};

use crate::config::WatchConfig;
use crate::constants::watch;
use crate::detect::ChangeDetector;
use crate::types::{ChangeSet, Result};

/// Far enough in the future that an idle debounce timer never fires
const IDLE: Duration = Duration::from_secs(86_400 * 365);

/// Event fed into the aggregator
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// A file changed at this path
    Path(std::path::PathBuf),
    /// Process whatever is pending right now
    Flush,
}

/// Consumer of completed batches.
///
/// `enhance` reflects the threshold policy: batches whose distinct changed
/// paths meet or exceed the configured threshold also run AI enhancement.
#[async_trait]
pub trait BatchHandler: Send + Sync {
    async fn process(&self, batch: ChangeSet, enhance: bool) -> Result<()>;
}

/// Aggregator timing and threshold policy
#[derive(Debug, Clone)]
pub struct AggregatorConfig {
    /// Quiet period after the most recent event before a batch runs
    pub debounce: Duration,
    /// Upper bound on batch staleness
    pub flush_interval: Duration,
    /// Distinct changed paths at or above which enhancement also runs
    pub enhance_threshold: usize,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_secs(watch::DEBOUNCE_SECS),
            flush_interval: Duration::from_secs(watch::FLUSH_INTERVAL_SECS),
            enhance_threshold: watch::ENHANCE_THRESHOLD,
        }
    }
}

impl From<&WatchConfig> for AggregatorConfig {
    fn from(config: &WatchConfig) -> Self {
        Self {
            debounce: Duration::from_secs(config.debounce_secs),
            flush_interval: Duration::from_secs(config.flush_interval_secs),
            enhance_threshold: config.enhance_threshold,
        }
    }
}

/// Debounced change aggregator
pub struct ChangeAggregator {
    detector: ChangeDetector,
    config: AggregatorConfig,
    handler: Arc<dyn BatchHandler>,
}

impl ChangeAggregator {
    pub fn new(
        detector: ChangeDetector,
        config: AggregatorConfig,
        handler: Arc<dyn BatchHandler>,
    ) -> Self {
        Self {
            detector,
            config,
            handler,
        }
    }

    /// Create the event channel feeding [`run`](Self::run)
    pub fn channel() -> (mpsc::Sender<WatchEvent>, mpsc::Receiver<WatchEvent>) {
        mpsc::channel(watch::EVENT_CHANNEL_CAPACITY)
    }

    /// Run the aggregation loop until the event channel closes.
    /// A final flush processes whatever is still pending at shutdown.
    pub async fn run(&self, mut events: mpsc::Receiver<WatchEvent>) {
        let mut pending = ChangeSet::new();

        let debounce = sleep_until(Instant::now() + IDLE);
        tokio::pin!(debounce);

        let mut flush_tick = interval_at(
            Instant::now() + self.config.flush_interval,
            self.config.flush_interval,
        );
        flush_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            debounce_secs = self.config.debounce.as_secs(),
            flush_interval_secs = self.config.flush_interval.as_secs(),
            enhance_threshold = self.config.enhance_threshold,
            "change aggregator started"
        );

        loop {
            tokio::select! {
                maybe_event = events.recv() => match maybe_event {
                    Some(WatchEvent::Path(path)) => {
                        pending.merge(self.detector.classify([&path]));
                        debug!(path = %path.display(), pending_paths = pending.distinct_paths(), "event merged");
                        debounce.as_mut().reset(Instant::now() + self.config.debounce);
                    }
                    Some(WatchEvent::Flush) => {
                        if !pending.is_empty() {
                            self.process(std::mem::take(&mut pending)).await;
                            debounce.as_mut().reset(Instant::now() + IDLE);
                        }
                    }
                    None => {
                        if !pending.is_empty() {
                            self.process(std::mem::take(&mut pending)).await;
                        }
                        info!("event channel closed, aggregator stopping");
                        break;
                    }
                },
                _ = &mut debounce, if !pending.is_empty() => {
                    debug!("debounce window elapsed");
                    self.process(std::mem::take(&mut pending)).await;
                    debounce.as_mut().reset(Instant::now() + IDLE);
                }
                _ = flush_tick.tick() => {
                    if !pending.is_empty() {
                        debug!("periodic flush fired with pending changes");
                        self.process(std::mem::take(&mut pending)).await;
                        debounce.as_mut().reset(Instant::now() + IDLE);
                    }
                }
            }
        }
    }

    /// Process one batch. The pending set was already taken by the caller;
    /// on failure the full change-set is logged so it can be replayed
    /// manually rather than silently disappearing.
    async fn process(&self, batch: ChangeSet) {
        let enhance = batch.distinct_paths() >= self.config.enhance_threshold;
        info!(
            paths = batch.distinct_paths(),
            modules = batch.modules.len(),
            enhance,
            "processing batch"
        );

        if let Err(e) = self.handler.process(batch.clone(), enhance).await {
            let replay = serde_json::to_string(&batch)
                .unwrap_or_else(|_| batch.summary());
            error!(error = %e, change_set = %replay, "batch failed; replay manually");
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tokio::time::{advance, sleep};

    /// Handler recording every processed batch
    #[derive(Default)]
    struct RecordingHandler {
        batches: Mutex<Vec<(ChangeSet, bool)>>,
        fail: bool,
    }

    impl RecordingHandler {
        fn failing() -> Self {
            Self {
                batches: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn recorded(&self) -> Vec<(ChangeSet, bool)> {
            self.batches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BatchHandler for RecordingHandler {
        async fn process(&self, batch: ChangeSet, enhance: bool) -> Result<()> {
            self.batches.lock().unwrap().push((batch, enhance));
            if self.fail {
                Err(crate::types::DocflowError::Publish("scripted".into()))
            } else {
                Ok(())
            }
        }
    }

    fn aggregator(handler: Arc<RecordingHandler>) -> ChangeAggregator {
        ChangeAggregator::new(
            ChangeDetector::from_config(&SourceConfig::default()),
            AggregatorConfig::default(),
            handler,
        )
    }

    async fn send_path(tx: &mpsc::Sender<WatchEvent>, path: &str) {
        tx.send(WatchEvent::Path(PathBuf::from(path))).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_debounced_into_single_batch() {
        let handler = Arc::new(RecordingHandler::default());
        let aggregator = aggregator(handler.clone());
        let (tx, rx) = ChangeAggregator::channel();
        let task = tokio::spawn(async move { aggregator.run(rx).await });

        send_path(&tx, "src/modules/sales/a.ts").await;
        sleep(Duration::from_secs(1)).await;
        send_path(&tx, "src/modules/sales/b.ts").await;

        // past the debounce window of the second event
        sleep(Duration::from_secs(4)).await;

        let batches = handler.recorded();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].0.distinct_paths(), 2);
        assert!(!batches[0].1, "2 paths stay below the threshold");

        drop(tx);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_threshold_is_inclusive_at_three_paths() {
        let handler = Arc::new(RecordingHandler::default());
        let aggregator = aggregator(handler.clone());
        let (tx, rx) = ChangeAggregator::channel();
        let task = tokio::spawn(async move { aggregator.run(rx).await });

        for path in ["src/a.ts", "src/b.ts", "src/c.ts"] {
            send_path(&tx, path).await;
        }
        sleep(Duration::from_secs(4)).await;

        let batches = handler.recorded();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].0.distinct_paths(), 3);
        assert!(batches[0].1, "3 paths meet the inclusive threshold");

        drop(tx);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_periodic_flush_bounds_staleness_under_churn() {
        let handler = Arc::new(RecordingHandler::default());
        let aggregator = aggregator(handler.clone());
        let (tx, rx) = ChangeAggregator::channel();
        let task = tokio::spawn(async move { aggregator.run(rx).await });

        // Events every 2s keep resetting the 3s debounce forever; the 30s
        // periodic flush must still process the batch.
        for i in 0..20 {
            send_path(&tx, &format!("src/churn/{}.ts", i)).await;
            sleep(Duration::from_secs(2)).await;
        }

        let batches = handler.recorded();
        assert!(
            !batches.is_empty(),
            "periodic flush must fire despite continuous churn"
        );
        // first flush at ~30s contains the events sent before it
        assert!(batches[0].0.distinct_paths() >= 14);

        drop(tx);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_flush_processes_immediately() {
        let handler = Arc::new(RecordingHandler::default());
        let aggregator = aggregator(handler.clone());
        let (tx, rx) = ChangeAggregator::channel();
        let task = tokio::spawn(async move { aggregator.run(rx).await });

        send_path(&tx, "src/modules/crm/x.ts").await;
        tx.send(WatchEvent::Flush).await.unwrap();
        // well inside the debounce window
        sleep(Duration::from_millis(100)).await;

        assert_eq!(handler.recorded().len(), 1);

        drop(tx);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_cleared_after_failed_batch() {
        let handler = Arc::new(RecordingHandler::failing());
        let aggregator = aggregator(handler.clone());
        let (tx, rx) = ChangeAggregator::channel();
        let task = tokio::spawn(async move { aggregator.run(rx).await });

        send_path(&tx, "src/modules/sales/a.ts").await;
        sleep(Duration::from_secs(4)).await;

        // a later event starts a fresh batch, without the failed entries
        send_path(&tx, "src/modules/crm/b.ts").await;
        sleep(Duration::from_secs(4)).await;

        let batches = handler.recorded();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[1].0.distinct_paths(), 1);
        assert!(batches[1].0.modules.contains("crm"));
        assert!(!batches[1].0.modules.contains("sales"));

        drop(tx);
        task.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_final_flush_on_channel_close() {
        let handler = Arc::new(RecordingHandler::default());
        let aggregator = aggregator(handler.clone());
        let (tx, rx) = ChangeAggregator::channel();
        let task = tokio::spawn(async move { aggregator.run(rx).await });

        send_path(&tx, "src/modules/sales/a.ts").await;
        drop(tx);
        task.await.unwrap();

        let batches = handler.recorded();
        assert_eq!(batches.len(), 1);
        assert!(batches[0].0.modules.contains("sales"));
    }
}
