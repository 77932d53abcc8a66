/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/signup/admin` - Register an agency admin
/// - `POST /v1/auth/signup/customer` - Register a customer account
/// - `POST /v1/auth/signup/creator` - Register a content creator
/// - `POST /v1/auth/login` - Login and get tokens
/// - `POST /v1/auth/refresh` - Refresh access token
///
/// Signup normalizes the email (trim + lowercase), enforces the strength
/// rule, hashes the password, and relies on the store's unique-field insert
/// for atomic email uniqueness. Login deliberately reports the same message
/// for an unknown email and a wrong password.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use contentflow_shared::{
    auth::{jwt, password},
    models::user::{
        normalize_email, AdminProfile, CreatorProfile, CustomerProfile, RoleProfile, User,
        UserView,
    },
    store::{Collection, Selector, FindOptions},
};

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};

/// Admin signup request
#[derive(Debug, Deserialize, Validate)]
pub struct AdminSignupRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    pub name: Option<String>,
    pub department: Option<String>,
}

/// Customer signup request
#[derive(Debug, Deserialize, Validate)]
pub struct CustomerSignupRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gst_number: Option<String>,
}

/// Content creator signup request
#[derive(Debug, Deserialize, Validate)]
pub struct CreatorSignupRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    pub name: Option<String>,
    pub specialization: Option<String>,
    pub experience: Option<String>,
}

/// Signup response
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub user_id: Uuid,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserView,
    /// Access token (24h)
    pub access_token: String,
    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Shared signup path: strength check, hash, atomic unique insert
async fn register_user(
    state: &AppState,
    email: &str,
    plaintext: &str,
    profile: RoleProfile,
) -> ApiResult<User> {
    password::validate_password_strength(plaintext).map_err(|message| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message,
        }])
    })?;

    let password_hash = password::hash_password(plaintext)?;
    let user = User::new(email, password_hash, profile);

    let body = serde_json::to_value(&user)
        .map_err(|e| ApiError::InternalError(format!("Failed to encode user: {}", e)))?;
    state
        .store
        .insert_unique(Collection::Users, &user.id.to_string(), body, "email")
        .await?;

    Ok(user)
}

/// Register an agency admin
///
/// # Errors
///
/// - `409 Conflict`: email already registered
/// - `422 Unprocessable Entity`: malformed email or weak password
pub async fn signup_admin(
    State(state): State<AppState>,
    Json(mut req): Json<AdminSignupRequest>,
) -> ApiResult<(StatusCode, Json<SignupResponse>)> {
    // Normalize before validating so a padded address is not rejected
    req.email = normalize_email(&req.email);
    req.validate().map_err(ApiError::from)?;

    let user = register_user(
        &state,
        &req.email,
        &req.password,
        RoleProfile::Admin(AdminProfile {
            name: req.name,
            department: req.department,
        }),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "Admin registered".to_string(),
            user_id: user.id,
        }),
    ))
}

/// Register a customer account
pub async fn signup_customer(
    State(state): State<AppState>,
    Json(mut req): Json<CustomerSignupRequest>,
) -> ApiResult<(StatusCode, Json<SignupResponse>)> {
    req.email = normalize_email(&req.email);
    req.validate().map_err(ApiError::from)?;

    let user = register_user(
        &state,
        &req.email,
        &req.password,
        RoleProfile::Customer(CustomerProfile {
            company_name: req.company_name,
            contact_person: req.contact_person,
            phone: req.phone,
            address: req.address,
            gst_number: req.gst_number,
            ..Default::default()
        }),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "Customer registered".to_string(),
            user_id: user.id,
        }),
    ))
}

/// Register a content creator
pub async fn signup_creator(
    State(state): State<AppState>,
    Json(mut req): Json<CreatorSignupRequest>,
) -> ApiResult<(StatusCode, Json<SignupResponse>)> {
    req.email = normalize_email(&req.email);
    req.validate().map_err(ApiError::from)?;

    let user = register_user(
        &state,
        &req.email,
        &req.password,
        RoleProfile::ContentCreator(CreatorProfile {
            name: req.name,
            specialization: req.specialization,
            experience: req.experience,
            ..Default::default()
        }),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "Content Creator registered".to_string(),
            user_id: user.id,
        }),
    ))
}

/// Login with email and password
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password (same message)
/// - `403 Forbidden`: account deactivated
pub async fn login(
    State(state): State<AppState>,
    Json(mut req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.email = normalize_email(&req.email);
    req.validate().map_err(ApiError::from)?;

    let selector = Selector::new().field("email", json!(req.email));
    let docs = state
        .store
        .find(Collection::Users, &selector, FindOptions::limit(1))
        .await?;

    let user: User = docs
        .first()
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?
        .parse()?;

    if !user.is_active {
        return Err(ApiError::Forbidden("Account is inactive".to_string()));
    }

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let access_claims = jwt::Claims::new(user.id, user.role(), jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.id, user.role(), jwt::TokenType::Refresh);
    let access_token = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh_token = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user: user.to_safe_view(),
        access_token,
        refresh_token,
    }))
}

/// Exchange a refresh token for a new access token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}
