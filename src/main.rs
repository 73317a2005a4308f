use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelcast::config::routes::RouteTable;
use reelcast::config::uploads::UploadPolicy;
use reelcast::config::AppConfig;
use reelcast::http;
use reelcast::infra::db::Db;
use reelcast::infra::identity::HttpIdentityResolver;
use reelcast::infra::media_sink::HttpMediaSink;
use reelcast::infra::video_store::PgVideoStore;
use reelcast::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    let db = Db::connect(&config).await?;
    sqlx::migrate!("./migrations").run(db.pool()).await?;

    let state = AppState {
        sink: Arc::new(HttpMediaSink::new(&config)),
        videos: Arc::new(PgVideoStore::new(db)),
        identity: Arc::new(HttpIdentityResolver::new(&config)),
        policy: UploadPolicy::new(config.image_max_bytes, config.video_max_bytes),
        routes: RouteTable::standard(),
        media_folder: config.media_folder.clone(),
    };

    let app: Router = http::router(state).layer(TraceLayer::new_for_http());
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!("listening on {}", config.http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
