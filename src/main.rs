//! courtside server entry point.
//!
//! Wires the stores, services, background tasks, and the Axum HTTP
//! server together.

use std::sync::Arc;

use axum::Router;
use chrono::{Duration, Utc};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use courtside::api;
use courtside::app_state::AppState;
use courtside::config::BookingConfig;
use courtside::domain::{
    BlackoutStore, CancellationPolicy, CourtDirectory, EventBus, ReservationStore,
    TransactionLedger,
};
use courtside::gateway::HttpPaymentGateway;
use courtside::persistence::{BookingPersistence, run_event_log};
use courtside::service::{BookingService, PaymentService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = BookingConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting courtside");

    // Build domain layer
    let courts = Arc::new(CourtDirectory::new());
    let reservations = Arc::new(ReservationStore::new());
    let blackouts = Arc::new(BlackoutStore::new());
    let ledger = Arc::new(TransactionLedger::new());
    let event_bus = EventBus::new(config.event_bus_capacity);
    let policy = CancellationPolicy::new(config.cancellation_cutoff_hours, config.late_fee_percent);

    // Build service layer
    let booking_service = Arc::new(BookingService::new(
        courts,
        Arc::clone(&reservations),
        blackouts,
        policy,
        event_bus.clone(),
    ));
    let payment_gateway = Arc::new(HttpPaymentGateway::new(
        &config.gateway_base_url,
        config.gateway_timeout_secs,
    )?);
    let payment_service = Arc::new(PaymentService::new(
        payment_gateway,
        reservations,
        ledger,
        event_bus.clone(),
    ));

    // Write-behind event log
    if config.persistence_enabled {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(std::time::Duration::from_secs(
                config.database_connect_timeout_secs,
            ))
            .connect(&config.database_url)
            .await?;
        sqlx::migrate!().run(&pool).await?;

        let persistence = BookingPersistence::new(pool);
        tokio::spawn(run_event_log(persistence.clone(), event_bus.subscribe()));
        tracing::info!("event log persistence enabled");

        if config.cleanup_after_days > 0 {
            let days = config.cleanup_after_days;
            tokio::spawn(async move {
                let mut ticker =
                    tokio::time::interval(std::time::Duration::from_secs(24 * 60 * 60));
                loop {
                    ticker.tick().await;
                    match persistence.delete_old_events(days).await {
                        Ok(deleted) if deleted > 0 => {
                            tracing::info!(deleted, "old event log rows removed");
                        }
                        Ok(_) => {}
                        Err(e) => tracing::error!(error = %e, "event log cleanup failed"),
                    }
                }
            });
        }
    }

    // Pending-expiry sweep
    if config.pending_ttl_hours > 0 {
        let sweeper = Arc::clone(&booking_service);
        let ttl = Duration::hours(i64::try_from(config.pending_ttl_hours).unwrap_or(24));
        let interval = std::time::Duration::from_secs(config.sweep_interval_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let expired = sweeper.expire_stale_pending(Utc::now(), ttl).await;
                if expired > 0 {
                    tracing::info!(expired, "stale pending reservations expired");
                }
            }
        });
    }

    // Build application state
    let app_state = AppState {
        booking_service,
        payment_service,
        event_bus,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(std::time::Duration::from_secs(30)))
        .with_state(app_state);

    #[cfg(feature = "swagger-ui")]
    let app = app.merge(
        utoipa_swagger_ui::SwaggerUi::new("/docs").url("/api-docs/openapi.json", {
            use utoipa::OpenApi;
            api::docs::ApiDoc::openapi()
        }),
    );

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
