use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Shortest period a timer will run at. Zero would make the ticker panic.
pub const MIN_PERIOD: Duration = Duration::from_secs(1);

/// A periodic refresh loop running on its own task.
///
/// The first run happens one full period after start; the initial load is the
/// owner's job. Dropping the timer (or calling [`RefreshTimer::stop`]) aborts
/// the loop, so replacing a stored timer restarts the schedule. Periods below
/// [`MIN_PERIOD`] are raised to it.
pub struct RefreshTimer {
    name: &'static str,
    period: Duration,
    handle: JoinHandle<()>,
}

impl RefreshTimer {
    pub fn start<F, Fut>(name: &'static str, period: Duration, mut task: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = if period < MIN_PERIOD {
            tracing::warn!(
                name,
                requested_ms = period.as_millis(),
                "Refresh period too short, using minimum"
            );
            MIN_PERIOD
        } else {
            period
        };

        tracing::info!(
            name,
            interval_secs = period.as_secs(),
            "Starting refresh scheduler"
        );

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            // A slow refresh pushes the next one back instead of bursting
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                tracing::debug!(name, "Auto-refreshing...");
                task().await;
            }
        });

        Self {
            name,
            period,
            handle,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn stop(self) {
        tracing::info!(name = self.name, "Stopping refresh scheduler");
        // Drop aborts the task
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
