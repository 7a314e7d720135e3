use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Runs a job, waits out a fixed period with a per-tick countdown, repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleRunner {
    period: Duration,
    tick: Duration,
}

impl CycleRunner {
    pub fn new(period: Duration, tick: Duration) -> Self {
        Self {
            period,
            tick: if tick.is_zero() {
                Duration::from_secs(1)
            } else {
                tick
            },
        }
    }

    /// Loops until `token` is cancelled. A job error ends the loop and is
    /// returned to the caller as fatal. Returns the number of completed cycles.
    pub async fn run<F, Fut, T>(
        &self,
        token: CancellationToken,
        mut job: F,
        mut on_tick: T,
    ) -> Result<u64>
    where
        F: FnMut(u64) -> Fut,
        Fut: Future<Output = Result<()>>,
        T: FnMut(Duration),
    {
        let mut completed = 0u64;

        while !token.is_cancelled() {
            job(completed + 1).await?;
            completed += 1;

            let mut remaining = self.period;
            while !remaining.is_zero() {
                on_tick(remaining);
                let step = self.tick.min(remaining);
                tokio::select! {
                    _ = tokio::time::sleep(step) => {}
                    _ = token.cancelled() => {
                        info!("🛑 Countdown interrupted after {} cycle(s).", completed);
                        return Ok(completed);
                    }
                }
                remaining -= step;
            }
        }

        Ok(completed)
    }
}

/// Token cancelled on Ctrl+C.
pub fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let cloned_token = token.clone();

    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("🛑 Received Ctrl+C. Initiating graceful shutdown...");
                cloned_token.cancel();
            }
            Err(err) => {
                error!("Unable to listen for shutdown signal: {}", err);
            }
        }
    });

    token
}

/// `Hh Mm Ss` rendering used by the countdown line.
pub fn format_countdown(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}
