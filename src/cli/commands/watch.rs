//! `docflow watch` - long-running mode driven by filesystem events
//!
//! Bridges a notify watcher into the aggregator's event channel. The
//! watcher callback runs on notify's own thread, so events cross into the
//! async world via `blocking_send`; backpressure from a full channel slows
//! the watcher rather than dropping changes.

use std::sync::Arc;

use console::style;
use notify::{Event, RecursiveMode, Watcher};
use tracing::{debug, warn};

use crate::aggregator::{AggregatorConfig, ChangeAggregator, WatchEvent};
use crate::config::ConfigLoader;
use crate::detect::ChangeDetector;
use crate::pipeline::Pipeline;
use crate::types::{DocflowError, Result};

pub async fn run() -> Result<()> {
    let config = ConfigLoader::load()?;
    let source_root = config.source.root.clone();

    if !source_root.exists() {
        return Err(DocflowError::Watch(format!(
            "source root does not exist: {}",
            source_root.display()
        )));
    }

    let (tx, rx) = ChangeAggregator::channel();

    let event_tx = tx.clone();
    let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
        match result {
            Ok(event) => {
                for path in event.paths {
                    if event_tx.blocking_send(WatchEvent::Path(path)).is_err() {
                        debug!("aggregator gone, dropping watch event");
                    }
                }
            }
            Err(e) => warn!(error = %e, "watch error"),
        }
    })
    .map_err(|e| DocflowError::Watch(e.to_string()))?;

    watcher
        .watch(&source_root, RecursiveMode::Recursive)
        .map_err(|e| DocflowError::Watch(e.to_string()))?;

    println!(
        "{} watching {} (debounce {}s, flush every {}s)",
        style("▶").green(),
        source_root.display(),
        config.watch.debounce_secs,
        config.watch.flush_interval_secs
    );
    println!("  Press Ctrl-C to stop");

    let detector = ChangeDetector::from_config(&config.source);
    let aggregator_config = AggregatorConfig::from(&config.watch);
    let pipeline = Arc::new(Pipeline::new(config));
    let aggregator = ChangeAggregator::new(detector, aggregator_config, pipeline);

    let loop_task = tokio::spawn(async move { aggregator.run(rx).await });

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| DocflowError::Watch(e.to_string()))?;

    println!();
    println!("{} stopping, flushing pending changes", style("ℹ").blue());

    // Dropping the watcher and the last sender closes the channel; the
    // loop performs its final flush and returns.
    drop(watcher);
    drop(tx);

    loop_task
        .await
        .map_err(|e| DocflowError::Watch(format!("aggregator task failed: {}", e)))?;

    Ok(())
}
