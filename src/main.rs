use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use courseboard::api::router;
use courseboard::config::AppConfig;
use courseboard::notify::{EmailSink, LogSink};
use courseboard::services::CourseService;
use courseboard::state::AppState;
use courseboard::store::CsvStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "courseboard=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    let store = CsvStore::new(&config);
    let mut service = CourseService::new(store);
    service.add_sink(Box::new(EmailSink));
    service.add_sink(Box::new(LogSink));

    let state = AppState {
        service: Arc::new(Mutex::new(service)),
    };
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
