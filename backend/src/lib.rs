//! # Baby Tracker Backend
//!
//! Record store, access gateway and REST API of the baby tracker.
//!
//! ## Architecture
//!
//! ```text
//! HTTP client (frontend crate)
//!     ↓
//! IO Layer (axum handlers, mappers, session extractor)
//!     ↓
//! Domain Layer (record, account, session and status services)
//!     ↓
//! Storage Layer (one JSON document, flushed on every write)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use chrono::Duration;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use crate::config::{ServerConfig, Settings};
use crate::domain::models::{
    Bath, BellyButtonDay, DiaperChange, FeedingSession, MedicationDose, SleepNight, VitaminDDay,
};
use crate::domain::{
    AccountService, DailyRecordService, EventLogService, SessionService, StatusService,
};
use crate::io::rest;
use crate::storage::JsonConnection;

/// Services shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub medications: EventLogService<MedicationDose>,
    pub feedings: EventLogService<FeedingSession>,
    pub baths: EventLogService<Bath>,
    pub diapers: EventLogService<DiaperChange>,
    pub vitamin_d: DailyRecordService<VitaminDDay>,
    pub belly_button: DailyRecordService<BellyButtonDay>,
    pub sleep: DailyRecordService<SleepNight>,
    pub status_service: StatusService,
    pub account_service: AccountService,
    pub session_service: SessionService,
}

impl AppState {
    pub fn new(connection: JsonConnection, invitation_code: &str, session_ttl: Duration) -> Self {
        let medications = EventLogService::new(connection.clone());
        let feedings = EventLogService::new(connection.clone());
        let baths = EventLogService::new(connection.clone());
        let diapers = EventLogService::new(connection.clone());
        let vitamin_d = DailyRecordService::new(connection.clone());
        let belly_button = DailyRecordService::new(connection.clone());
        let sleep = DailyRecordService::new(connection.clone());
        let status_service = StatusService::new(
            medications.clone(),
            feedings.clone(),
            baths.clone(),
            diapers.clone(),
            vitamin_d.clone(),
            belly_button.clone(),
            sleep.clone(),
        );

        Self {
            medications,
            feedings,
            baths,
            diapers,
            vitamin_d,
            belly_button,
            sleep,
            status_service,
            account_service: AccountService::new(connection, invitation_code),
            session_service: SessionService::new(session_ttl),
        }
    }
}

/// Open the record store and wire up all services
pub async fn initialize_backend(settings: &Settings) -> Result<AppState> {
    let invitation_code = settings.invitation_code()?;

    info!("Opening record store at {}", settings.storage.data_file.display());
    let connection = JsonConnection::open(&settings.storage.data_file).await?;

    info!("Setting up application state");
    Ok(AppState::new(
        connection,
        invitation_code,
        Duration::days(settings.auth.session_ttl_days),
    ))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, server: &ServerConfig) -> Result<Router> {
    // Credentialed requests need an explicit origin, never a wildcard
    let origin = server
        .allowed_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid allowed origin {}", server.allowed_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let api_routes = Router::new()
        .route("/register", post(rest::auth_apis::register))
        .route("/login", post(rest::auth_apis::login))
        .route("/logout", post(rest::auth_apis::logout))
        .route("/check-session", get(rest::auth_apis::check_session))
        .route("/status", get(rest::status_apis::get_status))
        .route(
            "/medications",
            get(rest::medication_apis::list_medications).post(rest::medication_apis::create_medication),
        )
        .route(
            "/medications/:id",
            put(rest::medication_apis::update_medication)
                .delete(rest::medication_apis::delete_medication),
        )
        .route(
            "/feedings",
            get(rest::feeding_apis::list_feedings).post(rest::feeding_apis::create_feeding),
        )
        .route(
            "/feedings/:id",
            put(rest::feeding_apis::update_feeding)
                .delete(rest::feeding_apis::delete_feeding),
        )
        .route(
            "/baths",
            get(rest::bath_apis::list_baths).post(rest::bath_apis::create_bath),
        )
        .route(
            "/baths/:id",
            put(rest::bath_apis::update_bath).delete(rest::bath_apis::delete_bath),
        )
        .route(
            "/diapers",
            get(rest::diaper_apis::list_diapers).post(rest::diaper_apis::create_diaper),
        )
        .route(
            "/diapers/:id",
            put(rest::diaper_apis::update_diaper)
                .delete(rest::diaper_apis::delete_diaper),
        )
        .route(
            "/vitamin-d",
            get(rest::vitamin_d_apis::list_vitamin_d).post(rest::vitamin_d_apis::upsert_vitamin_d),
        )
        .route(
            "/vitamin-d/:date",
            put(rest::vitamin_d_apis::update_vitamin_d)
                .delete(rest::vitamin_d_apis::delete_vitamin_d),
        )
        .route(
            "/belly-button",
            get(rest::belly_button_apis::list_belly_button)
                .post(rest::belly_button_apis::upsert_belly_button),
        )
        .route(
            "/belly-button/:date",
            put(rest::belly_button_apis::update_belly_button)
                .delete(rest::belly_button_apis::delete_belly_button),
        )
        .route(
            "/sleep",
            get(rest::sleep_apis::list_sleep).post(rest::sleep_apis::upsert_sleep),
        )
        .route(
            "/sleep/:date",
            put(rest::sleep_apis::update_sleep).delete(rest::sleep_apis::delete_sleep),
        );

    let mut router = Router::new().nest("/api", api_routes);

    if let Some(static_dir) = &server.static_dir {
        info!("Serving web UI from {}", static_dir.display());
        // Unknown paths get index.html so client-side routes resolve
        let index = ServeFile::new(static_dir.join("index.html"));
        router = router.fallback_service(ServeDir::new(static_dir).fallback(index));
    }

    Ok(router.layer(cors).with_state(app_state))
}
