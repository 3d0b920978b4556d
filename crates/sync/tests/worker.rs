use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use schedcore_roster::employee::{self, NewEmployee};
use schedcore_scheduling::Command;
use schedcore_sync::client::{UpstreamClient, UpstreamEmployee, UpstreamEvent};
use schedcore_sync::worker::{RetryPolicy, Worker};
use time::OffsetDateTime;

mod helpers;

#[derive(Default)]
struct FakeUpstream {
    pushed: Mutex<Vec<(String, String, String)>>,
    fail_push: bool,
}

#[async_trait]
impl UpstreamClient for FakeUpstream {
    async fn push_assignment(
        &self,
        rep_id: &str,
        mplan_id: &str,
        location_id: &str,
        _start: OffsetDateTime,
        _end: OffsetDateTime,
    ) -> schedcore_shared::Result<()> {
        if self.fail_push {
            schedcore_shared::server!("simulated upstream failure");
        }
        self.pushed
            .lock()
            .unwrap()
            .push((rep_id.to_string(), mplan_id.to_string(), location_id.to_string()));
        Ok(())
    }

    async fn delete_assignment(&self, _external_id: &str) -> schedcore_shared::Result<()> {
        Ok(())
    }

    async fn list_scheduled_events(&self, _window_days: i64) -> schedcore_shared::Result<Vec<UpstreamEvent>> {
        Ok(vec![])
    }

    async fn list_planning_events(&self) -> schedcore_shared::Result<Vec<UpstreamEvent>> {
        Ok(vec![])
    }

    async fn list_available_reps(&self, _window_days: i64) -> schedcore_shared::Result<Vec<UpstreamEmployee>> {
        Ok(vec![])
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[tokio::test]
async fn push_new_succeeds_and_marks_schedule_synced() -> anyhow::Result<()> {
    let state = helpers::setup_test_state().await?;

    employee::create(
        &state.write_db,
        NewEmployee {
            id: "emp-1".to_string(),
            external_id: Some("42".to_string()),
            name: "Jane".to_string(),
            job_title: "Event Specialist".to_string(),
        },
    )
    .await?;

    schedcore_events::event::create(
        &state.write_db,
        schedcore_events::event::NewEvent {
            project_ref_num: 1,
            external_id: Some("E1".to_string()),
            location_mvid: Some("L1".to_string()),
            project_name: "Core event 555123".to_string(),
            event_type: None,
            start_datetime: OffsetDateTime::now_utc().unix_timestamp(),
            due_datetime: OffsetDateTime::now_utc().unix_timestamp() + 86400,
            estimated_minutes: 60,
        },
    )
    .await?;

    let cmd = Command::new(state.clone());
    cmd.create(1, "emp-1", OffsetDateTime::now_utc().unix_timestamp()).await?;

    schedcore_scheduling::subscription()
        .data(state.write_db.clone())
        .unretry_execute(&state.executor)
        .await?;

    let client = Arc::new(FakeUpstream::default());
    let worker = Worker {
        executor: state.executor.clone(),
        read_db: state.read_db.clone(),
        write_db: state.write_db.clone(),
        client: client.clone(),
        retry: RetryPolicy::default(),
        local_offset: time::UtcOffset::UTC,
    };

    let processed = worker.run_once(10).await?;
    assert_eq!(processed, 1);
    assert_eq!(client.pushed.lock().unwrap().len(), 1);
    assert_eq!(client.pushed.lock().unwrap()[0].0, "42");

    let remaining = schedcore_sync::queue::dequeue(&state.write_db, 10).await?;
    assert!(remaining.is_empty(), "the push task should have been removed on success");

    Ok(())
}

#[tokio::test]
async fn push_failure_retries_then_gives_up() -> anyhow::Result<()> {
    let state = helpers::setup_test_state().await?;

    employee::create(
        &state.write_db,
        NewEmployee {
            id: "emp-2".to_string(),
            external_id: Some("99".to_string()),
            name: "Sam".to_string(),
            job_title: "Event Specialist".to_string(),
        },
    )
    .await?;
    schedcore_events::event::create(
        &state.write_db,
        schedcore_events::event::NewEvent {
            project_ref_num: 2,
            external_id: Some("E2".to_string()),
            location_mvid: Some("L2".to_string()),
            project_name: "Core event 555124".to_string(),
            event_type: None,
            start_datetime: OffsetDateTime::now_utc().unix_timestamp(),
            due_datetime: OffsetDateTime::now_utc().unix_timestamp() + 86400,
            estimated_minutes: 60,
        },
    )
    .await?;

    let cmd = Command::new(state.clone());
    cmd.create(2, "emp-2", OffsetDateTime::now_utc().unix_timestamp()).await?;

    schedcore_scheduling::subscription()
        .data(state.write_db.clone())
        .unretry_execute(&state.executor)
        .await?;

    let client = Arc::new(FakeUpstream { pushed: Mutex::new(vec![]), fail_push: true });
    let worker = Worker {
        executor: state.executor.clone(),
        read_db: state.read_db.clone(),
        write_db: state.write_db.clone(),
        client,
        retry: RetryPolicy { max_attempts: 3, base_backoff_seconds: 0 },
        local_offset: time::UtcOffset::UTC,
    };

    for _ in 0..3 {
        worker.run_once(10).await?;
    }

    let remaining = schedcore_sync::queue::dequeue(&state.write_db, 10).await?;
    assert!(remaining.is_empty(), "task should be terminal (failed), not still pending-and-due");

    Ok(())
}
