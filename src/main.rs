use std::env;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use attendance_engine::api::{AppState, create_router};
use attendance_engine::config::{ConfigLoader, load_roster};
use attendance_engine::notify::TracingNotifier;
use attendance_engine::service::WorkforceService;
use attendance_engine::store::{InMemoryEmployeeRepository, InMemoryShiftRepository};
use attendance_engine::time::SystemClock;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attendance_engine=info,axum=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path =
        env::var("ATTENDANCE_CONFIG").unwrap_or_else(|_| "./config/site.yaml".to_string());
    let config = ConfigLoader::load(&config_path)?.into_config();
    tracing::info!(
        path = %config_path,
        site = %config.site.name,
        timezone = %config.timezone(),
        "Configuration loaded"
    );

    let employees = match env::var("ATTENDANCE_EMPLOYEES") {
        Ok(path) => {
            let roster = load_roster(&path)?;
            tracing::info!(path = %path, employees = roster.len(), "Employee roster loaded");
            InMemoryEmployeeRepository::with_employees(roster)
        }
        Err(_) => InMemoryEmployeeRepository::default(),
    };

    let service = WorkforceService::new(
        config,
        Arc::new(employees),
        Arc::new(InMemoryShiftRepository::default()),
        Arc::new(TracingNotifier),
        Arc::new(SystemClock),
    );
    let app = create_router(AppState::new(service));

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(address = %bind_addr, "Listening");

    axum::serve(listener, app).await?;
    Ok(())
}
