use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

mod helpers;

#[tokio::test]
async fn health_returns_ok() -> anyhow::Result<()> {
    let test_app = helpers::test_app().await?;

    let response = test_app
        .app
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await?.to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body)?;
    assert_eq!(json["status"], "ok");

    Ok(())
}

#[tokio::test]
async fn ready_reports_ready_against_a_live_pool() -> anyhow::Result<()> {
    let test_app = helpers::test_app().await?;

    let response = test_app
        .app
        .oneshot(Request::builder().uri("/ready").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}
