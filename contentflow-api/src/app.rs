/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware.
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Liveness (public)
/// └── /v1/                             # API v1
///     ├── /auth/                       # Signup/login/refresh (public)
///     ├── /users, /creators, /customers
///     ├── /content/...                 # Lifecycle operations
///     ├── /submissions
///     └── /calendars/...               # Calendar aggregate operations
/// ```
///
/// Every non-auth v1 route sits behind the authentication layer, which
/// resolves the bearer token to an active user and attaches the
/// role-derived scope filter to the request.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use contentflow_shared::{
    auth::{jwt, middleware::{bearer_token, AuthContext, AuthError}},
    models::user::User,
    store::{Collection, DocumentStore, StoreError},
};

use crate::{config::Config, error::ApiError, routes};

/// Shared application state
///
/// Cloned per request via Axum's `State` extractor; the store and config
/// sit behind `Arc` so the clone is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Document store collaborator
    pub store: Arc<dyn DocumentStore>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn DocumentStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/signup/admin", post(routes::auth::signup_admin))
        .route("/signup/customer", post(routes::auth::signup_customer))
        .route("/signup/creator", post(routes::auth::signup_creator))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Everything else requires authentication
    let protected_routes = Router::new()
        .route("/users", get(routes::users::list_users))
        .route("/creators", get(routes::users::list_creators))
        .route("/creators/:id", get(routes::users::get_creator))
        .route("/customers/:id", get(routes::users::get_customer))
        .route(
            "/content",
            post(routes::content::assign_content).get(routes::content::list_content),
        )
        .route("/content/:id", get(routes::content::get_content))
        .route("/content/:id/status", put(routes::content::update_status))
        .route("/content/:id/comments", post(routes::content::add_comment))
        .route("/content/:id/revisions", post(routes::content::add_revision))
        .route(
            "/submissions",
            post(routes::submissions::create_submission)
                .get(routes::submissions::list_submissions),
        )
        .route(
            "/calendars",
            post(routes::calendars::create_calendar).get(routes::calendars::list_calendars),
        )
        .route(
            "/calendars/customer/:customer_id",
            get(routes::calendars::list_customer_calendars),
        )
        .route(
            "/calendars/:id",
            get(routes::calendars::get_calendar)
                .put(routes::calendars::update_calendar)
                .delete(routes::calendars::delete_calendar),
        )
        .route(
            "/calendars/:id/items",
            post(routes::calendars::add_item).delete(routes::calendars::remove_item),
        )
        .route(
            "/calendars/:id/items/:date/:description",
            put(routes::calendars::update_item).delete(routes::calendars::delete_item),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Authentication middleware layer
///
/// Resolves the `Authorization: Bearer ...` token to an active user via the
/// store, then injects an [`AuthContext`] (user plus role-derived scope
/// filter) into request extensions. Inactive or unresolvable users are
/// rejected before any handler runs.
async fn auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = bearer_token(header)?;
    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    // The token subject must still resolve to an active user
    let doc = state
        .store
        .get(Collection::Users, &claims.sub.to_string())
        .await
        .map_err(|e| match e {
            StoreError::NotFound => AuthError::InvalidOrInactiveUser,
            other => AuthError::StoreError(other.to_string()),
        })?;
    let user: User = doc
        .parse()
        .map_err(|e| AuthError::StoreError(e.to_string()))?;

    if !user.is_active {
        return Err(AuthError::InvalidOrInactiveUser.into());
    }

    req.extensions_mut().insert(AuthContext::for_user(user));

    Ok(next.run(req).await)
}
