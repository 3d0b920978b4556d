use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use schedcore_shared::State;
use schedcore_sync::{ClientConfig, ReqwestUpstreamClient, RetryPolicy, Worker};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::state::AppState;

pub async fn serve(config: crate::Config, host_override: Option<String>, port_override: Option<u16>) -> Result<()> {
    tracing::info!("starting schedcore server");

    let host = host_override.unwrap_or_else(|| config.server.host.clone());
    let port = port_override.unwrap_or(config.server.port);

    let write_pool = crate::db::create_write_pool(&config.database.url).await?;
    let read_pool = crate::db::create_read_pool(&config.database.url, config.database.max_connections).await?;

    let executor: evento::sql::RwSqlite = (
        evento::Sqlite::from(read_pool.clone()),
        evento::Sqlite::from(write_pool.clone()),
    )
        .into();

    tracing::info!("starting evento subscriptions");
    let sub_scheduling = schedcore_scheduling::subscription()
        .data(write_pool.clone())
        .start(&executor)
        .await?;

    let state = AppState {
        executor: executor.clone(),
        read_db: read_pool.clone(),
        write_db: write_pool.clone(),
    };

    let local_offset = time::UtcOffset::from_whole_seconds(config.sync.local_utc_offset_hours as i32 * 3600)?;
    let client = Arc::new(ReqwestUpstreamClient::new(ClientConfig {
        base_url: config.sync.base_url.clone(),
        username: config.sync.username.clone(),
        password: config.sync.password.clone(),
        request_timeout: Duration::from_secs(config.sync.request_timeout_seconds),
        session_refresh_interval: Duration::from_secs(config.sync.session_refresh_interval_seconds),
    })?);

    let sync_worker = Arc::new(Worker {
        executor: executor.clone(),
        read_db: read_pool.clone(),
        write_db: write_pool.clone(),
        client: client.clone(),
        retry: RetryPolicy::default(),
        local_offset,
    });

    let scheduler = schedcore_sync::scheduler::start(write_pool.clone()).await?;

    let poll_interval = Duration::from_secs(config.sync.poll_interval_seconds);
    let batch_size = config.sync.batch_size;
    let worker_handle = {
        let worker = sync_worker.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(poll_interval);
            loop {
                ticker.tick().await;
                if let Err(err) = worker.run_once(batch_size).await {
                    tracing::error!(err = %err, "sync worker tick failed");
                }
            }
        })
    };

    let app = crate::routes::router(state, client, sync_worker)
        .layer(CompressionLayer::new().br(true).gzip(true))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "server listening");

    let shutdown_signal = async {
        let ctrl_c = async {
            tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => tracing::info!("received Ctrl+C signal"),
            _ = terminate => tracing::info!("received SIGTERM signal"),
        }

        tracing::info!("starting graceful shutdown");
    };

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal).await?;

    worker_handle.abort();
    scheduler.shutdown().await?;

    tracing::info!("shutting down evento projections");
    if let Err(err) = sub_scheduling.shutdown().await {
        tracing::error!("{err}");
    }

    read_pool.close().await;
    write_pool.close().await;
    tracing::info!("graceful shutdown complete");

    Ok(())
}
