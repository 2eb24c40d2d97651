// In crates/engine/src/lib.rs

pub mod alert;
pub mod task;

#[cfg(test)]
mod testing;

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use app_config::Settings;
use tokio::time::MissedTickBehavior;

pub use crate::alert::{SignalAlert, format_usd};
pub use crate::task::{Collaborators, CycleOutcome, SignalTask};

/// Drives a `SignalTask` on a fixed schedule.
pub struct Engine {
    task: SignalTask,
    check_interval: Duration,
}

impl Engine {
    pub fn new(task: SignalTask, check_interval: Duration) -> Self {
        Self { task, check_interval }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let task = SignalTask::from_settings(settings)?;
        Ok(Self::new(task, Duration::from_secs(settings.market.check_interval_secs)))
    }

    /// Runs a single cycle immediately.
    pub async fn run_once(&self) -> Result<CycleOutcome> {
        self.task.check_for_signals().await
    }

    /// The main run method.
    ///
    /// The first cycle starts immediately, then one every `check_interval`.
    /// A cycle that overruns delays the next tick rather than stacking them,
    /// and a cycle error is logged without stopping the loop. Resolving
    /// `shutdown` ends the loop once any in-flight cycle has finished.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) -> Result<()> {
        tracing::info!(
            symbol = %self.task.symbol(),
            interval_secs = self.check_interval.as_secs(),
            "Starting signal engine."
        );

        let mut ticker = tokio::time::interval(self.check_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    tracing::info!("Shutdown requested. Stopping signal engine.");
                    break;
                }
                _ = ticker.tick() => {
                    match self.task.check_for_signals().await {
                        Ok(outcome) => tracing::debug!(?outcome, "Cycle finished."),
                        Err(e) => tracing::error!(error = %e, "An error occurred in the signal cycle."),
                    }
                    tracing::info!(secs = self.check_interval.as_secs(), "Waiting for the next check.");
                }
            }
        }

        Ok(())
    }
}
