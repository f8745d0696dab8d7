//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use medibook_auth::jwt::decoder::JwtDecoder;
use medibook_auth::jwt::encoder::JwtEncoder;
use medibook_auth::password::hasher::PasswordHasher;
use medibook_auth::password::validator::PasswordValidator;
use medibook_core::config::AppConfig;
use medibook_core::events::EventSink;

use medibook_database::repositories::appointment::AppointmentRepository;
use medibook_database::repositories::notification::NotificationRepository;
use medibook_database::repositories::rating::RatingRepository;
use medibook_database::repositories::slot::SlotRepository;
use medibook_database::repositories::user::UserRepository;

use medibook_realtime::connection::manager::ConnectionManager;
use medibook_realtime::notification::dispatcher::NotificationDispatcher;

use medibook_service::appointment::AppointmentService;
use medibook_service::notification::NotificationService;
use medibook_service::rating::RatingService;
use medibook_service::slot::SlotService;
use medibook_service::stats::StatsService;
use medibook_service::user::UserService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,

    /// JWT token decoder (REST extractor and WS handshake).
    pub jwt_decoder: Arc<JwtDecoder>,

    /// Account and login service.
    pub user_service: Arc<UserService>,
    /// Slot management service.
    pub slot_service: Arc<SlotService>,
    /// Appointment engine.
    pub appointment_service: Arc<AppointmentService>,
    /// Rating ledger.
    pub rating_service: Arc<RatingService>,
    /// Notification inbox reads.
    pub notification_service: Arc<NotificationService>,
    /// Admin dashboard counters.
    pub stats_service: Arc<StatsService>,

    /// Live WebSocket connections.
    pub connections: Arc<ConnectionManager>,
    /// Event consumer: persists and pushes notifications.
    pub dispatcher: Arc<NotificationDispatcher>,
}

impl AppState {
    /// Wires repositories, services, and the realtime engine together.
    pub fn build(config: AppConfig, db_pool: PgPool) -> Self {
        let config = Arc::new(config);

        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let slot_repo = Arc::new(SlotRepository::new(db_pool.clone()));
        let appointment_repo = Arc::new(AppointmentRepository::new(db_pool.clone()));
        let notification_repo = Arc::new(NotificationRepository::new(db_pool.clone()));
        let rating_repo = Arc::new(RatingRepository::new(db_pool.clone()));

        let hasher = Arc::new(PasswordHasher::new());
        let password_validator = Arc::new(PasswordValidator::new(&config.auth));
        let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth));
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        let connections = Arc::new(ConnectionManager::new(config.realtime.clone()));
        let dispatcher = Arc::new(NotificationDispatcher::new(
            Arc::clone(&connections),
            Arc::clone(&notification_repo),
        ));
        let events: Arc<dyn EventSink> = dispatcher.clone();

        let user_service = Arc::new(UserService::new(
            Arc::clone(&user_repo),
            Arc::clone(&hasher),
            password_validator,
            jwt_encoder,
        ));
        let slot_service = Arc::new(SlotService::new(
            Arc::clone(&slot_repo),
            Arc::clone(&appointment_repo),
            Arc::clone(&events),
        ));
        let appointment_service = Arc::new(AppointmentService::new(
            Arc::clone(&appointment_repo),
            Arc::clone(&slot_repo),
            Arc::clone(&events),
        ));
        let rating_service = Arc::new(RatingService::new(
            rating_repo,
            Arc::clone(&appointment_repo),
            Arc::clone(&user_repo),
            Arc::clone(&events),
        ));
        let notification_service = Arc::new(NotificationService::new(notification_repo));
        let stats_service = Arc::new(StatsService::new(user_repo, appointment_repo));

        Self {
            config,
            db_pool,
            jwt_decoder,
            user_service,
            slot_service,
            appointment_service,
            rating_service,
            notification_service,
            stats_service,
            connections,
            dispatcher,
        }
    }
}
