// NYSC posting portal API
// Application state, OpenAPI document and router assembly

pub mod activity;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod email;
pub mod error;
pub mod export;
pub mod notifications;
pub mod pricing;
pub mod submissions;
pub mod support;
pub mod users;
pub mod validation;

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, FromRef},
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use tower::{Layer, ServiceBuilder};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    set_header::{SetResponseHeader, SetResponseHeaderLayer},
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::activity::ActivityLogger;
use crate::auth::{AuthService, TokenRepository, TokenService, UserRepository};
use crate::config::{Config, PaymentDetails};
use crate::dashboard::DashboardRepository;
use crate::email::{EmailError, Mailer};
use crate::notifications::{ChangeFeed, NotificationRepository, NotificationService};
use crate::submissions::{ProofStorage, SubmissionRepository, SubmissionService, UPLOADS_ROUTE};
use crate::support::{SupportRepository, SupportService};
use crate::validation::MAX_PROOF_SIZE;

/// Multipart bodies carry the proof plus a handful of text fields
const MAX_BODY_SIZE: usize = MAX_PROOF_SIZE + 1024 * 1024;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        auth::handlers::refresh_handler,
        auth::handlers::logout_handler,
        auth::handlers::me_handler,
        auth::handlers::admin_setup_status_handler,
        auth::handlers::claim_admin_handler,
        pricing::handlers::get_pricing_table,
        pricing::handlers::get_quote,
        pricing::handlers::get_payment_details,
        submissions::handlers::create_submission,
        submissions::handlers::list_my_submissions,
        submissions::handlers::get_submission,
        submissions::handlers::admin_list_submissions,
        submissions::handlers::review_submission,
        submissions::handlers::bulk_update_submissions,
        submissions::handlers::export_submissions,
        support::handlers::create_message,
        support::handlers::list_my_messages,
        support::handlers::admin_list_messages,
        support::handlers::respond_to_message,
        support::handlers::export_messages,
        notifications::handlers::list_notifications,
        notifications::handlers::mark_notification_read,
        notifications::handlers::mark_all_notifications_read,
        notifications::handlers::get_preferences,
        notifications::handlers::update_preferences,
        notifications::handlers::get_alert_counts,
        notifications::handlers::notification_stream,
        dashboard::handlers::get_user_dashboard,
        dashboard::handlers::get_admin_dashboard,
        activity::handlers::list_activity,
        users::list_users,
        users::export_users,
    ),
    components(
        schemas(
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::RefreshRequest,
            auth::AuthResponse,
            auth::UserResponse,
            auth::AdminSetupStatus,
            auth::Role,
            pricing::ServiceType,
            pricing::Region,
            pricing::PricingEntry,
            pricing::QuoteResponse,
            PaymentDetails,
            submissions::Submission,
            submissions::SubmissionStatus,
            submissions::ReviewSubmissionRequest,
            submissions::BulkAction,
            submissions::BulkActionRequest,
            submissions::BulkActionResponse,
            submissions::SkippedSubmission,
            support::SupportMessage,
            support::MessageStatus,
            support::CreateMessageRequest,
            support::RespondMessageRequest,
            notifications::Notification,
            notifications::NotificationType,
            notifications::NotificationPreferences,
            notifications::UpdatePreferencesRequest,
            notifications::AlertCounts,
            notifications::UserAlertCounts,
            notifications::AdminAlertCounts,
            notifications::AlertEvent,
            notifications::MarkedRead,
            dashboard::UserDashboard,
            dashboard::AdminDashboard,
            dashboard::DailyCount,
            dashboard::StatusSlice,
            activity::ActivityEntry,
            activity::ActivityLog,
            activity::ActionType,
            activity::EntityType,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and token rotation"),
        (name = "pricing", description = "Service fees and payment instructions"),
        (name = "submissions", description = "Posting-service applications"),
        (name = "support", description = "Support messages"),
        (name = "notifications", description = "Notification history, preferences and live alerts"),
        (name = "dashboard", description = "User statistics"),
        (name = "admin", description = "Administration endpoints")
    ),
    info(
        title = "NYSC Posting Portal API",
        version = "1.0.0",
        description = "Submission, payment verification and support backend for the NYSC posting portal"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub token_service: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub user_repo: UserRepository,
    pub payment_details: Arc<PaymentDetails>,
    pub activity: ActivityLogger,
    pub change_feed: ChangeFeed,
    pub notifications: NotificationService,
    pub submissions: SubmissionService,
    pub support: SupportService,
    pub dashboard: DashboardRepository,
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.token_service.clone()
    }
}

impl AppState {
    /// Wire repositories and services over one pool
    pub fn new(db: PgPool, config: &Config) -> Result<Self, EmailError> {
        let token_service = Arc::new(TokenService::new(config.auth.jwt_secret.clone()));
        let user_repo = UserRepository::new(db.clone());
        let auth_service = Arc::new(AuthService::new(
            user_repo.clone(),
            TokenRepository::new(db.clone()),
            token_service.clone(),
        ));

        let mailer = Mailer::new(&config.email)?;
        if !mailer.is_enabled() {
            warn!("RESEND_API_KEY not set; notification emails will be logged and skipped");
        }
        let activity = ActivityLogger::new(db.clone());
        let change_feed = ChangeFeed::default();
        let submission_repo = SubmissionRepository::new(db.clone());
        let support_repo = SupportRepository::new(db.clone());

        let notifications = NotificationService::new(
            NotificationRepository::new(db.clone()),
            user_repo.clone(),
            submission_repo.clone(),
            support_repo.clone(),
            mailer,
        );

        let submissions = SubmissionService::new(
            submission_repo,
            ProofStorage::from_config(&config.storage),
            activity.clone(),
            notifications.clone(),
            change_feed.clone(),
        );

        let support = SupportService::new(
            support_repo,
            activity.clone(),
            notifications.clone(),
            change_feed.clone(),
        );

        Ok(Self {
            dashboard: DashboardRepository::new(db.clone()),
            db,
            token_service,
            auth_service,
            user_repo,
            payment_details: Arc::new(config.payment.clone()),
            activity,
            change_feed,
            notifications,
            submissions,
            support,
        })
    }
}

/// Router options that differ between the server and tests
#[derive(Debug, Clone)]
pub struct RouterOptions {
    pub cors_allowed_origins: Vec<String>,
    /// Per-IP limit on the public auth routes; needs peer address info
    pub rate_limit_auth: bool,
    pub upload_dir: std::path::PathBuf,
}

impl RouterOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cors_allowed_origins: config.server.cors_allowed_origins.clone(),
            rate_limit_auth: true,
            upload_dir: config.storage.upload_dir.clone(),
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(parsed))
}

fn auth_routes(rate_limited: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/refresh", post(auth::refresh_handler));

    if !rate_limited {
        return router;
    }

    // Five requests in a burst per client IP, one more every two seconds
    match GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(5)
        .finish()
    {
        Some(config) => router.layer(GovernorLayer {
            config: Arc::new(config),
        }),
        None => {
            warn!("Invalid rate limit configuration; auth routes are not rate limited");
            router
        }
    }
}

/// Stored proofs, served with their extension's type and no sniffing
fn uploads_service(upload_dir: &std::path::Path) -> SetResponseHeader<ServeDir, HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    )
    .layer(ServeDir::new(upload_dir))
}

/// Creates and configures the application router
pub fn create_router(state: AppState, options: &RouterOptions) -> Router {
    let api = Router::new()
        .merge(auth_routes(options.rate_limit_auth))
        .route("/api/auth/logout", post(auth::logout_handler))
        .route("/api/auth/me", get(auth::me_handler))
        // Pricing
        .route("/api/pricing", get(pricing::get_pricing_table))
        .route("/api/pricing/quote", get(pricing::get_quote))
        .route("/api/pricing/payment-details", get(pricing::get_payment_details))
        // Submissions
        .route(
            "/api/submissions",
            post(submissions::create_submission).get(submissions::list_my_submissions),
        )
        .route("/api/submissions/:id", get(submissions::get_submission))
        // Support
        .route(
            "/api/support",
            post(support::create_message).get(support::list_my_messages),
        )
        // Notifications
        .route("/api/notifications", get(notifications::list_notifications))
        .route(
            "/api/notifications/:id/read",
            post(notifications::mark_notification_read),
        )
        .route(
            "/api/notifications/read-all",
            post(notifications::mark_all_notifications_read),
        )
        .route(
            "/api/notifications/preferences",
            get(notifications::get_preferences).put(notifications::update_preferences),
        )
        .route("/api/notifications/alerts", get(notifications::get_alert_counts))
        .route("/api/notifications/stream", get(notifications::notification_stream))
        // Dashboard
        .route("/api/dashboard", get(dashboard::get_user_dashboard))
        // Admin
        .route("/api/admin/setup", get(auth::admin_setup_status_handler))
        .route("/api/admin/setup/claim", post(auth::claim_admin_handler))
        .route("/api/admin/dashboard", get(dashboard::get_admin_dashboard))
        .route("/api/admin/activity", get(activity::list_activity))
        .route("/api/admin/submissions", get(submissions::admin_list_submissions))
        .route(
            "/api/admin/submissions/bulk",
            post(submissions::bulk_update_submissions),
        )
        .route(
            "/api/admin/submissions/export.csv",
            get(submissions::export_submissions),
        )
        .route(
            "/api/admin/submissions/:id",
            patch(submissions::review_submission),
        )
        .route("/api/admin/messages", get(support::admin_list_messages))
        .route("/api/admin/messages/export.csv", get(support::export_messages))
        .route("/api/admin/messages/:id", patch(support::respond_to_message))
        .route("/api/admin/users", get(users::list_users))
        .route("/api/admin/users/export.csv", get(users::export_users))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api)
        .nest_service(UPLOADS_ROUTE, uploads_service(&options.upload_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&options.cors_allowed_origins)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests;
