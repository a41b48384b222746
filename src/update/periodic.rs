//! Periodic update loop

use crate::crawler::{Fetcher, LinkExtractor};
use crate::extract::TextExtractor;
use crate::state::RunKind;
use crate::update::{UpdateOutcome, Updater};
use std::time::{Duration, Instant};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Time left in the interval once a cycle has taken `elapsed`
///
/// A cycle that overruns the interval starts the next one immediately.
pub fn sleep_after(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}

/// Runs update cycles every `interval_days` until the future is dropped
///
/// A full-site cycle crawls only when the archive is older than
/// `interval_days`; a category cycle crawls every time. A failed cycle is
/// logged and the loop carries on with the next one.
pub async fn run_periodic<F, L, E>(updater: &Updater<F, L, E>, interval_days: u64, kind: RunKind)
where
    F: Fetcher,
    L: LinkExtractor,
    E: TextExtractor,
{
    let interval = Duration::from_secs(interval_days.saturating_mul(SECONDS_PER_DAY));
    tracing::info!(
        "Starting periodic {} updates every {} days",
        kind.label(),
        interval_days
    );

    loop {
        let started = Instant::now();

        let result = match kind {
            RunKind::FullSite => {
                if updater
                    .last_run(RunKind::FullSite)
                    .needs_update(interval_days)
                {
                    updater.run_update(true).await
                } else {
                    tracing::info!("Data is current, skipping update");
                    Ok(UpdateOutcome::AlreadyCurrent)
                }
            }
            RunKind::Category => updater.run_categories().await,
        };

        if let Err(e) = result {
            tracing::error!("Update cycle failed: {}", e);
        }

        let pause = sleep_after(interval, started.elapsed());
        tracing::info!("Next update in {:.1} hours", pause.as_secs_f64() / 3600.0);
        tokio::time::sleep(pause).await;
    }
}
