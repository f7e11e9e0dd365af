use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use shared::jwt::JwtConfig;

use crate::config::Config;
use crate::middleware::{
    auth_rate_limit_middleware, metrics_handler, metrics_middleware, RateLimiterState,
};
use crate::routes::{
    applications, auth, engagements, events, health, internships, mentorships, offers,
};
use crate::services::{CalendarService, EmailService, PaymentService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtConfig>,
    pub email: EmailService,
    pub payment: PaymentService,
    pub calendar: CalendarService,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let jwt = Arc::new(JwtConfig::new(
        &config.jwt.secret,
        config.jwt.token_expiry_secs,
    ));
    let email = EmailService::new(config.email.clone());
    let payment = PaymentService::new(config.payment.clone());
    let calendar = CalendarService::new(config.calendar.clone());

    let rate_limiter = if config.security.auth_rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.auth_rate_limit_per_minute,
        )))
    } else {
        None
    };

    let request_timeout = config.server.request_timeout_secs;
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
        email,
        payment,
        calendar,
        rate_limiter,
    };

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Auth endpoints carry the per-IP limiter: OTP issuance must not be
    // free to hammer.
    let auth_routes = Router::new()
        .route("/api/v1/auth/signup/student", post(auth::signup_student))
        .route("/api/v1/auth/signup/alumnus", post(auth::signup_alumnus))
        .route("/api/v1/auth/verify-otp", post(auth::verify_otp))
        .route("/api/v1/auth/resend-otp", post(auth::resend_otp))
        .route("/api/v1/auth/login", post(auth::login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_rate_limit_middleware,
        ));

    let api_routes = Router::new()
        // Mentorships (owner-scoped)
        .route(
            "/api/v1/mentorships",
            post(mentorships::create_mentorship).get(mentorships::list_mentorships),
        )
        .route(
            "/api/v1/mentorships/:id",
            get(mentorships::get_mentorship)
                .patch(mentorships::update_mentorship)
                .delete(mentorships::delete_mentorship),
        )
        // Internships (owner-scoped)
        .route(
            "/api/v1/internships",
            post(internships::create_internship).get(internships::list_internships),
        )
        .route(
            "/api/v1/internships/:id",
            delete(internships::delete_internship),
        )
        .route(
            "/api/v1/internships/:id/toggle-active",
            post(internships::toggle_internship_active),
        )
        // Offers
        .route(
            "/api/v1/offers",
            post(offers::create_offer).get(offers::list_offers),
        )
        .route("/api/v1/offers/:id", get(offers::get_offer))
        .route("/api/v1/offers/:id/accept", post(offers::accept_offer))
        .route("/api/v1/offers/:id/reject", post(offers::reject_offer))
        .route("/api/v1/offers/:id/withdraw", post(offers::withdraw_offer))
        // Applications
        .route(
            "/api/v1/applications",
            post(applications::create_application).get(applications::list_applications),
        )
        .route(
            "/api/v1/applications/:id",
            get(applications::get_application),
        )
        .route(
            "/api/v1/applications/:id/accept",
            post(applications::accept_application),
        )
        .route(
            "/api/v1/applications/:id/reject",
            post(applications::reject_application),
        )
        .route(
            "/api/v1/applications/:id/withdraw",
            post(applications::withdraw_application),
        )
        // Engagements
        .route("/api/v1/engagements", get(engagements::list_engagements))
        .route("/api/v1/engagements/:id", get(engagements::get_engagement))
        .route(
            "/api/v1/engagements/:id/source",
            get(engagements::get_engagement_source),
        )
        .route(
            "/api/v1/engagements/:id/complete",
            post(engagements::complete_engagement),
        )
        .route(
            "/api/v1/engagements/:id/terminate",
            post(engagements::terminate_engagement),
        )
        // Events and tickets
        .route(
            "/api/v1/events",
            post(events::create_event).get(events::list_events),
        )
        .route("/api/v1/events/:id/publish", post(events::publish_event))
        .route(
            "/api/v1/tickets/:id/register",
            post(events::register_for_ticket),
        )
        .route("/api/v1/payments/confirm", post(events::confirm_payment));

    Router::new()
        .route("/health", get(health::health))
        .route("/metrics", get(metrics_handler))
        .merge(auth_routes)
        .merge(api_routes)
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(request_timeout)))
        .layer(CompressionLayer::new())
        .layer(cors)
}
