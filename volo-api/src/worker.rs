use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{error, info, warn};
use uuid::Uuid;
use volo_core::repository::OfferRepository;
use volo_core::source::{OfferSource, RouteFilter};
use volo_core::{CoreError, CoreResult};
use volo_shared::OfferKind;

const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub session_id: Uuid,
    pub flights_inserted: u64,
    pub cruises_inserted: u64,
    pub flights_pruned: u64,
    pub cruises_pruned: u64,
}

/// Generate, store, prune.
///
/// Insert and prune are separate store calls, so readers can briefly see
/// fresh offers next to ones about to be pruned. Ticks may overlap; the
/// cycle tolerates it and only logs.
pub struct RefreshCycle {
    repo: Arc<dyn OfferRepository>,
    source: Arc<dyn OfferSource>,
    retention: chrono::Duration,
    running: AtomicUsize,
}

impl RefreshCycle {
    pub fn new(repo: Arc<dyn OfferRepository>, source: Arc<dyn OfferSource>, retention: chrono::Duration) -> Self {
        Self {
            repo,
            source,
            retention,
            running: AtomicUsize::new(0),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst) > 0
    }

    pub async fn run_once(&self, now: DateTime<Utc>) -> CoreResult<RefreshReport> {
        let session_id = Uuid::new_v4();

        let flights = self.source.fetch_flights(session_id, &RouteFilter::default()).await?;
        let cruises = self.source.fetch_cruises(session_id).await?;

        let flights_inserted = self.repo.insert_flights(&flights).await.map_err(store_error)?;
        info!("Inserted {} flight offers", flights_inserted);
        let cruises_inserted = self.repo.insert_cruises(&cruises).await.map_err(store_error)?;
        info!("Inserted {} cruise offers", cruises_inserted);

        let cutoff = now - self.retention;
        let flights_pruned = self
            .repo
            .delete_older_than(OfferKind::Flight, cutoff)
            .await
            .map_err(store_error)?;
        let cruises_pruned = self
            .repo
            .delete_older_than(OfferKind::Cruise, cutoff)
            .await
            .map_err(store_error)?;

        Ok(RefreshReport {
            session_id,
            flights_inserted,
            cruises_inserted,
            flights_pruned,
            cruises_pruned,
        })
    }

    /// One scheduled run. Failures are logged and swallowed; the next tick is the retry.
    pub async fn tick(&self) -> Option<RefreshReport> {
        let concurrent = self.running.fetch_add(1, Ordering::SeqCst);
        if concurrent > 0 {
            warn!("Offer refresh starting while {} earlier run(s) still in progress", concurrent);
        }
        info!("Starting scheduled offer refresh");

        let result = self.run_once(Utc::now()).await;
        self.running.fetch_sub(1, Ordering::SeqCst);

        match result {
            Ok(report) => {
                info!(
                    session_id = %report.session_id,
                    pruned = report.flights_pruned + report.cruises_pruned,
                    "Scheduled offer refresh completed"
                );
                Some(report)
            }
            Err(e) => {
                error!("Error in scheduled refresh: {}", e);
                None
            }
        }
    }
}

/// Fire `cycle.tick()` every `every`, starting one period from now.
///
/// Each tick runs on its own task so a slow refresh never holds back the schedule.
/// A zero period is raised to one second.
pub fn spawn_refresh_worker(cycle: Arc<RefreshCycle>, every: Duration) -> JoinHandle<()> {
    let every = if every.is_zero() {
        warn!("Refresh interval of zero requested, using {:?}", MIN_REFRESH_INTERVAL);
        MIN_REFRESH_INTERVAL
    } else {
        every
    };

    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("Refresh worker scheduled every {:?}", every);

        loop {
            ticker.tick().await;
            let cycle = cycle.clone();
            tokio::spawn(async move {
                cycle.tick().await;
            });
        }
    })
}

fn store_error(err: Box<dyn std::error::Error + Send + Sync>) -> CoreError {
    CoreError::StoreError(err.to_string())
}
