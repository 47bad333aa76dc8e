//! # VetSync API
//!
//! The API crate provides the web server for the VetSync appointment service.
//! It exposes JSON endpoints to schedule, list, update and cancel veterinary
//! appointments.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into appointment service calls
//! - **Middleware**: Request validation and error-to-response mapping
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework. Business rules live in
//! `vetsync-core`; storage is injected through its repository traits.

/// Configuration module for API settings
pub mod config;
/// Request handlers for the appointment endpoints
pub mod handlers;
/// Validation and error handling shared by the handlers
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use eyre::{Result, WrapErr};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use vetsync_core::service::AppointmentService;
use vetsync_db::{
    DbPool,
    repositories::{appointment::PgAppointmentRepository, pet::PgPetRepository},
};

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```no_run
/// # async fn example(db_pool: vetsync_db::DbPool) {
/// use std::sync::Arc;
/// use vetsync_api::ApiState;
///
/// let state = Arc::new(ApiState::from_pool(db_pool));
/// let app = vetsync_api::app(state);
/// # }
/// ```
pub struct ApiState {
    /// Appointment business operations
    pub appointments: AppointmentService,
}

impl ApiState {
    pub fn new(appointments: AppointmentService) -> Self {
        Self { appointments }
    }

    /// Wires the service to the PostgreSQL repositories.
    pub fn from_pool(db_pool: DbPool) -> Self {
        let appointments = PgAppointmentRepository::new(db_pool.clone());
        let pets = PgPetRepository::new(db_pool);
        Self::new(AppointmentService::new(Arc::new(appointments), Arc::new(pets)))
    }
}

/// Builds the application router with all routes and request tracing.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Appointment endpoints
        .merge(routes::appointment::routes())
        // Attach shared state to all routes
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .wrap_err_with(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true))
}

/// Starts the API server with the provided configuration and database connection
///
/// This function initializes logging, wires the PostgreSQL repositories into
/// the appointment service, configures routes and starts the HTTP server.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> eyre::Result<()> {
/// use vetsync_api::config::ApiConfig;
///
/// let config = ApiConfig::from_env()?;
/// let db_pool = vetsync_db::create_pool(&config.database_url, config.database_max_connections).await?;
/// vetsync_api::start_server(config, db_pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_server(config: config::ApiConfig, db_pool: DbPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = Arc::new(ApiState::from_pool(db_pool));
    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new().layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout))),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
