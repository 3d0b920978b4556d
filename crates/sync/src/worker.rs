use std::sync::Arc;

use evento::Executor;
use serde::Deserialize;
use time::{OffsetDateTime, UtcOffset};
use tracing::{error, info, warn};

use crate::client::UpstreamClient;
use crate::queue::{self, Task, TaskType};
use crate::schedule;

#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub max_attempts: i64,
    pub base_backoff_seconds: i64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_seconds: 60,
        }
    }
}

impl RetryPolicy {
    /// 60s, 120s, 240s, ... (§4.7).
    fn backoff_for(&self, attempts: i64) -> i64 {
        self.base_backoff_seconds * 2i64.pow(attempts.max(0) as u32)
    }
}

pub struct Worker<E: Executor, C: UpstreamClient> {
    pub executor: E,
    pub read_db: sqlx::SqlitePool,
    pub write_db: sqlx::SqlitePool,
    pub client: Arc<C>,
    pub retry: RetryPolicy,
    pub local_offset: UtcOffset,
}

#[derive(Deserialize)]
struct SchedulePayload {
    schedule_id: String,
}

#[derive(Deserialize)]
struct DeletePayload {
    external_id: String,
}

impl<E: Executor, C: UpstreamClient> Worker<E, C> {
    /// Drains up to `batch` due tasks once; the caller loops this on an
    /// interval (§4.7/§10.5).
    pub async fn run_once(&self, batch: u32) -> schedcore_shared::Result<u32> {
        let tasks = queue::dequeue(&self.write_db, batch).await?;
        let count = tasks.len() as u32;

        for task in tasks {
            if let Err(err) = self.run_task(&task).await {
                warn!(task_id = %task.id, err = %err, "sync task failed");
            }
        }

        Ok(count)
    }

    async fn run_task(&self, task: &Task) -> schedcore_shared::Result<()> {
        let result = match task.task_type {
            TaskType::PushNew | TaskType::PushUpdate => self.push(task).await,
            TaskType::PushDelete => self.delete(task).await,
            TaskType::PullEvents => self.pull().await,
        };

        match result {
            Ok(()) => queue::mark_succeeded(&self.write_db, &task.id).await,
            Err(err) => self.handle_failure(task, &err.to_string()).await,
        }
    }

    async fn handle_failure(&self, task: &Task, error: &str) -> schedcore_shared::Result<()> {
        let attempts = task.attempts + 1;

        if attempts >= task.task_type.max_attempts() {
            error!(task_id = %task.id, error, "sync task permanently failed");
            queue::mark_failed(&self.write_db, &task.id, error).await?;

            if matches!(task.task_type, TaskType::PushNew | TaskType::PushUpdate) {
                if let Ok(payload) = serde_json::from_slice::<SchedulePayload>(&task.payload) {
                    schedule::mark_sync_failed(&self.executor, &payload.schedule_id, error).await?;
                }
            }

            return Ok(());
        }

        let backoff = self.retry.backoff_for(task.attempts);
        warn!(task_id = %task.id, attempts, backoff, error, "retrying sync task");
        queue::mark_retry(&self.write_db, &task.id, attempts, backoff, error).await
    }

    async fn push(&self, task: &Task) -> schedcore_shared::Result<()> {
        let payload: SchedulePayload = serde_json::from_slice(&task.payload).map_err(|err| anyhow::anyhow!(err))?;

        let Some(row) = schedule::get(&self.read_db, &payload.schedule_id).await? else {
            info!(schedule_id = %payload.schedule_id, "schedule gone before push, dropping task");
            return Ok(());
        };

        let Some(employee) = schedcore_roster::employee::get(&self.read_db, &row.employee_id).await? else {
            schedcore_shared::server!("employee {} no longer exists", row.employee_id);
        };
        let Some(event) = schedcore_events::event::get(&self.read_db, row.event_ref_num).await? else {
            schedcore_shared::server!("event {} no longer exists", row.event_ref_num);
        };

        let rep_id = employee
            .external_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| schedcore_shared::Error::Server(anyhow::anyhow!("employee has no external id")))?;
        let mplan_id = event
            .external_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| schedcore_shared::Error::Server(anyhow::anyhow!("event has no external id")))?;
        let location_id = event
            .location_mvid
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| schedcore_shared::Error::Server(anyhow::anyhow!("event has no location")))?;

        let start = OffsetDateTime::from_unix_timestamp(row.schedule_datetime)?.to_offset(self.local_offset);
        let end = start + time::Duration::minutes(event.estimated_minutes as i64);

        self.client
            .push_assignment(rep_id, mplan_id, location_id, start, end)
            .await?;

        schedule::mark_synced(&self.executor, &row.id, row.external_id.clone()).await?;

        Ok(())
    }

    async fn delete(&self, task: &Task) -> schedcore_shared::Result<()> {
        let payload: DeletePayload = serde_json::from_slice(&task.payload).map_err(|err| anyhow::anyhow!(err))?;
        self.client.delete_assignment(&payload.external_id).await?;

        Ok(())
    }

    async fn pull(&self) -> schedcore_shared::Result<()> {
        let reps = self.client.list_available_reps(21).await?;
        for rep in reps {
            schedcore_roster::employee::upsert_from_sync(
                &self.write_db,
                &rep.external_id,
                &rep.name,
                rep.job_title.as_deref().unwrap_or("Other"),
            )
            .await?;
        }

        let events = self.client.list_planning_events().await?;
        for event in events {
            schedcore_events::event::upsert_from_sync(
                &self.write_db,
                &event.external_id,
                event.location_mvid.as_deref(),
                &event.project_name,
                event.start_datetime,
                event.due_datetime,
            )
            .await?;
        }

        Ok(())
    }
}
