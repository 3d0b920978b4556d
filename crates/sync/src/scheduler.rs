use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::error;

use crate::tasks::enqueue_pull_events;

/// Enqueues an hourly `pull_events` task (§4.7). The worker loop picks it up
/// like any other task; failures here are logged, never propagated, matching
/// the teacher's own cron job style.
pub async fn start(pool: sqlx::SqlitePool) -> Result<JobScheduler, JobSchedulerError> {
    let sched = JobScheduler::new().await?;

    sched
        .add(Job::new_async("0 0 * * * *", move |uuid, mut scheduler| {
            let pool = pool.clone();
            Box::pin(async move {
                if let Err(err) = enqueue_pull_events(&pool).await {
                    error!(err = %err, "failed to enqueue periodic pull_events task");
                }
                let _ = scheduler.next_tick_for_job(uuid).await;
            })
        })?)
        .await?;

    sched.start().await?;

    Ok(sched)
}
