use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seat_booking::{
    config::{Config, LogFormat},
    store::{MemorySnapshotStore, RedisSnapshotStore, SnapshotStore},
    AppState,
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("Failed to load configuration")?;

    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log));
    match config.app.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    info!(
        environment = %config.app.environment,
        rows = config.booking.grid.rows,
        seats_per_row = config.booking.grid.seats_per_row,
        max_seats = config.booking.max_seats_per_booking,
        "Starting Seat Booking API"
    );

    // Snapshot store: Redis when configured, process memory otherwise
    let store: Arc<dyn SnapshotStore> = match &config.redis {
        Some(redis) => Arc::new(
            RedisSnapshotStore::connect(&redis.url)
                .await
                .context("Failed to connect to Redis")?,
        ),
        None => {
            warn!("REDIS_URL not set, bookings will not survive a restart");
            Arc::new(MemorySnapshotStore::new())
        }
    };

    let addr: SocketAddr = format!("{}:{}", config.app.host, config.app.port)
        .parse()
        .context("HOST/PORT do not form a socket address")?;

    let app_state = AppState::new(config, store)
        .await
        .context("Failed to load seat snapshot")?;
    let app = seat_booking::app(app_state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;

    Ok(())
}
