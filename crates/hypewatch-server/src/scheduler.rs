//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring report refresh.

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::cache::ReportCache;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the cron expression is rejected, or the scheduler fails to start.
pub async fn build_scheduler(
    cache: ReportCache,
    refresh_cron: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    register_refresh_job(&scheduler, cache, refresh_cron).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

/// Re-run the analysis over the data directory on `refresh_cron`.
///
/// A failed refresh is logged and the previous report stays cached.
async fn register_refresh_job(
    scheduler: &JobScheduler,
    cache: ReportCache,
    refresh_cron: &str,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(refresh_cron, move |_uuid, _lock| {
        let cache = cache.clone();

        Box::pin(async move {
            tracing::info!("scheduler: starting report refresh");
            match cache.refresh().await {
                Ok(report) => tracing::info!(
                    posts = report.summary.total_posts,
                    "scheduler: report refresh complete"
                ),
                Err(e) => tracing::error!(error = %e, "scheduler: report refresh failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron = refresh_cron, "scheduler: report refresh registered");
    Ok(())
}
