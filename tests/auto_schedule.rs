use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use schedcore_roster::employee::{self, NewEmployee};
use schedcore_roster::rotation;
use schedcore_scheduling::{query, Command};
use schedcore_shared::roster::RotationType;
use serde_json::json;
use time::Duration;
use tower::ServiceExt;

mod helpers;

async fn run_and_wait(app: &axum::Router, test_app: &helpers::TestApp) -> anyhow::Result<String> {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auto-schedule/run")
                .header("content-type", "application/json")
                .body(Body::from(json!({}).to_string()))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await?.to_bytes();
    let started: serde_json::Value = serde_json::from_slice(&body)?;
    let run_id = started["run_id"].as_str().unwrap().to_string();

    test_app.sync().await?;

    Ok(run_id)
}

async fn run_detail(app: &axum::Router, run_id: &str) -> anyhow::Result<serde_json::Value> {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(format!("/auto-schedule/runs/{run_id}")).body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&body)?)
}

#[tokio::test]
async fn run_then_fetch_an_empty_window_succeeds_with_nothing_processed() -> anyhow::Result<()> {
    let test_app = helpers::test_app().await?;
    let app = test_app.app.clone();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auto-schedule/run")
                .header("content-type", "application/json")
                .body(Body::from(json!({}).to_string()))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await?.to_bytes();
    let started: serde_json::Value = serde_json::from_slice(&body)?;
    let run_id = started["run_id"].as_str().unwrap().to_string();

    test_app.sync().await?;

    let response = app
        .oneshot(Request::builder().uri(format!("/auto-schedule/runs/{run_id}")).body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await?.to_bytes();
    let detail: serde_json::Value = serde_json::from_slice(&body)?;
    assert_eq!(detail["run"]["state"], "Success");
    assert!(detail["newly_scheduled"].as_array().unwrap().is_empty());

    Ok(())
}

#[tokio::test]
async fn get_run_returns_not_found_for_unknown_id() -> anyhow::Result<()> {
    let test_app = helpers::test_app().await?;

    let response = test_app
        .app
        .oneshot(Request::builder().uri("/auto-schedule/runs/does-not-exist").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn approve_and_reject_on_an_empty_run_are_no_ops() -> anyhow::Result<()> {
    let test_app = helpers::test_app().await?;
    let app = test_app.app.clone();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auto-schedule/run")
                .header("content-type", "application/json")
                .body(Body::from(json!({}).to_string()))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await?.to_bytes();
    let started: serde_json::Value = serde_json::from_slice(&body)?;
    let run_id = started["run_id"].as_str().unwrap().to_string();

    test_app.sync().await?;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/auto-schedule/runs/{run_id}/approve"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/auto-schedule/runs/{run_id}/reject"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

/// Scenario A (§8): the Primary Juicer rotation employee for the event's
/// weekday is proposed at the Juicer default time, and approving pushes
/// exactly one task for it.
#[tokio::test]
async fn scenario_a_juicer_rotation_employee_is_proposed_and_pushed_on_approval() -> anyhow::Result<()> {
    let test_app = helpers::test_app().await?;
    let app = test_app.app.clone();
    let pool = test_app.pool().clone();
    let monday = helpers::next_monday();

    employee::create(
        &pool,
        NewEmployee {
            id: "emp-juicer".to_string(),
            external_id: Some("42".to_string()),
            name: "Jess Juicer".to_string(),
            job_title: "Juicer Barista".to_string(),
        },
    )
    .await?;
    helpers::available_all_week(&pool, "emp-juicer").await?;
    rotation::set_weekly(&pool, RotationType::PrimaryJuicer, 0, "emp-juicer").await?;

    schedcore_events::event::create(
        &pool,
        schedcore_events::event::NewEvent {
            project_ref_num: 9001,
            external_id: Some("E1".to_string()),
            location_mvid: Some("L1".to_string()),
            project_name: "Juicer Demo 100001".to_string(),
            event_type: None,
            start_datetime: helpers::at(monday, 0, 0),
            due_datetime: helpers::at(monday + Duration::days(3), 0, 0),
            estimated_minutes: 30,
        },
    )
    .await?;

    let run_id = run_and_wait(&app, &test_app).await?;
    let detail = run_detail(&app, &run_id).await?;

    let newly_scheduled = detail["newly_scheduled"].as_array().unwrap();
    assert_eq!(newly_scheduled.len(), 1);
    let proposal = &newly_scheduled[0];
    assert_eq!(proposal["event_ref_num"], 9001);
    assert_eq!(proposal["employee_id"], "emp-juicer");
    assert_eq!(proposal["is_swap"], false);
    assert_eq!(proposal["schedule_datetime"].as_i64().unwrap(), helpers::at(monday, 9, 0));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/auto-schedule/runs/{run_id}/approve"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    test_app.sync().await?;

    let tasks = schedcore_sync::queue::dequeue(&pool, 10).await?;
    assert_eq!(tasks.len(), 1, "approval should enqueue exactly one push task");
    assert!(matches!(tasks[0].task_type, schedcore_sync::queue::TaskType::PushNew));

    let payload: serde_json::Value = serde_json::from_slice(&tasks[0].payload)?;
    let schedule_id = payload["schedule_id"].as_str().unwrap();
    let schedule = query::get_schedule(&pool, schedule_id).await?.expect("schedule row projected");
    assert_eq!(schedule.employee_id, "emp-juicer");
    assert_eq!(schedule.event_ref_num, 9001);
    assert_eq!(schedule.sync_status, "Pending");

    Ok(())
}

/// Scenario B (§8): a more urgent Core event bumps a less urgent Core
/// event already scheduled to the same employee and slot; rejecting the
/// run leaves the original schedule untouched.
#[tokio::test]
async fn scenario_b_core_bump_swaps_the_less_urgent_event_and_is_reversible() -> anyhow::Result<()> {
    let test_app = helpers::test_app().await?;
    let app = test_app.app.clone();
    let pool = test_app.pool().clone();
    let monday = helpers::next_monday();

    employee::create(
        &pool,
        NewEmployee {
            id: "emp-lead".to_string(),
            external_id: Some("77".to_string()),
            name: "Lee Lead".to_string(),
            job_title: "Lead Event Specialist".to_string(),
        },
    )
    .await?;
    helpers::available_all_week(&pool, "emp-lead").await?;
    rotation::set_weekly(&pool, RotationType::PrimaryLead, 0, "emp-lead").await?;

    // Va: the new, more urgent Core event the run will process.
    schedcore_events::event::create(
        &pool,
        schedcore_events::event::NewEvent {
            project_ref_num: 9101,
            external_id: Some("E10".to_string()),
            location_mvid: Some("L1".to_string()),
            project_name: "Core Reset 910100".to_string(),
            event_type: None,
            start_datetime: helpers::at(monday, 0, 0),
            due_datetime: helpers::at(monday + Duration::days(2), 0, 0),
            estimated_minutes: 30,
        },
    )
    .await?;

    // Vb: already scheduled to emp-lead in the first Core slot, due much
    // further out so it is strictly less urgent than Va.
    schedcore_events::event::create(
        &pool,
        schedcore_events::event::NewEvent {
            project_ref_num: 9102,
            external_id: Some("E11".to_string()),
            location_mvid: Some("L1".to_string()),
            project_name: "Core Reset 910200".to_string(),
            event_type: None,
            start_datetime: helpers::at(monday, 0, 0),
            due_datetime: helpers::at(monday + Duration::days(14), 0, 0),
            estimated_minutes: 30,
        },
    )
    .await?;

    let command = Command::new(test_app.state());
    let vb_schedule_id = command.create(9102, "emp-lead", helpers::at(monday, 9, 45)).await?;
    test_app.sync().await?;

    let run_id = run_and_wait(&app, &test_app).await?;
    let detail = run_detail(&app, &run_id).await?;

    assert!(detail["newly_scheduled"].as_array().unwrap().is_empty());
    let swaps = detail["swaps"].as_array().unwrap();
    assert_eq!(swaps.len(), 1);
    let swap = &swaps[0];
    assert_eq!(swap["event_ref_num"], 9101);
    assert_eq!(swap["employee_id"], "emp-lead");
    assert_eq!(swap["is_swap"], true);
    assert_eq!(swap["schedule_datetime"].as_i64().unwrap(), helpers::at(monday, 9, 45));
    assert!(swap["swap_reason"].as_str().unwrap().contains("9102"));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/auto-schedule/runs/{run_id}/reject"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let schedule = query::get_schedule(&pool, &vb_schedule_id).await?.expect("Vb schedule still exists");
    assert_eq!(schedule.event_ref_num, 9102);
    assert_eq!(schedule.employee_id, "emp-lead");
    assert_eq!(schedule.schedule_datetime, helpers::at(monday, 9, 45));

    Ok(())
}

/// Scenario C (§8): an event schedules fine against an employee missing an
/// external id, but approval fails it with that reason instead of pushing.
#[tokio::test]
async fn scenario_c_missing_external_id_fails_approval_without_enqueueing_a_push() -> anyhow::Result<()> {
    let test_app = helpers::test_app().await?;
    let app = test_app.app.clone();
    let pool = test_app.pool().clone();
    let monday = helpers::next_monday();

    employee::create(
        &pool,
        NewEmployee {
            id: "emp-no-ext".to_string(),
            external_id: None,
            name: "Nora No-Ext".to_string(),
            job_title: "Event Specialist".to_string(),
        },
    )
    .await?;
    helpers::available_all_week(&pool, "emp-no-ext").await?;

    schedcore_events::event::create(
        &pool,
        schedcore_events::event::NewEvent {
            project_ref_num: 9201,
            external_id: Some("E20".to_string()),
            location_mvid: Some("L1".to_string()),
            project_name: "Core Reset 920100".to_string(),
            event_type: None,
            start_datetime: helpers::at(monday, 0, 0),
            due_datetime: helpers::at(monday + Duration::days(2), 0, 0),
            estimated_minutes: 30,
        },
    )
    .await?;

    let run_id = run_and_wait(&app, &test_app).await?;
    let detail = run_detail(&app, &run_id).await?;
    assert_eq!(detail["newly_scheduled"].as_array().unwrap().len(), 1);
    assert_eq!(detail["newly_scheduled"][0]["employee_id"], "emp-no-ext");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/auto-schedule/runs/{run_id}/approve"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    test_app.sync().await?;

    let detail = run_detail(&app, &run_id).await?;
    assert!(detail["newly_scheduled"].as_array().unwrap().is_empty());
    let failed = detail["failed"].as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["failure_reason"], "employee has no external id");

    let tasks = schedcore_sync::queue::dequeue(&pool, 10).await?;
    assert!(tasks.is_empty(), "a failed approval must not enqueue an upstream push");

    Ok(())
}
