use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;

mod helpers;

#[tokio::test]
async fn create_then_reschedule_then_unschedule() -> anyhow::Result<()> {
    let test_app = helpers::test_app().await?;
    let app = test_app.app;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/schedules")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "event_ref_num": 1,
                        "employee_id": "emp-1",
                        "schedule_datetime": 1_700_000_000i64,
                    })
                    .to_string(),
                ))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await?.to_bytes();
    let created: serde_json::Value = serde_json::from_slice(&body)?;
    let schedule_id = created["schedule_id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/schedules/{schedule_id}/reschedule"))
                .header("content-type", "application/json")
                .body(Body::from(json!({ "schedule_datetime": 1_700_100_000i64 }).to_string()))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/schedules/{schedule_id}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn rotation_round_trip() -> anyhow::Result<()> {
    let test_app = helpers::test_app().await?;
    let app = test_app.app;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/rotations")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "rotation_type": "PrimaryJuicer",
                        "assignments": { "0": "emp-1" },
                    })
                    .to_string(),
                ))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/rotations?rotation_type=PrimaryJuicer")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await?.to_bytes();
    let view: serde_json::Value = serde_json::from_slice(&body)?;
    assert!(view["weekly"].as_array().unwrap().is_empty(), "no active employee exists, so the assignment should have been rejected");

    Ok(())
}
