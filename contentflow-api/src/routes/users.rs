/// User directory endpoints
///
/// # Endpoints
///
/// - `GET /v1/users?role=` - List users, optionally by role (admin only)
/// - `GET /v1/creators` - Creator directory
/// - `GET /v1/creators/:id` - One creator
/// - `GET /v1/customers/:id` - One customer (admin or the customer itself)
///
/// Every response goes through the safe user projection; credential hashes
/// never appear in a body. Lookups the caller may not see render as plain
/// not-found.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use contentflow_shared::{
    auth::{authorization::authorize, middleware::AuthContext},
    models::user::{Role, User, UserView},
    store::{Collection, FindOptions, Selector, StoreError},
};

use crate::{app::AppState, error::{ApiError, ApiResult}};

/// Query parameters for the user listing
#[derive(Debug, Deserialize)]
pub struct UsersQuery {
    /// Restrict to one role (`admin`, `customer`, `content_creator`)
    pub role: Option<String>,
}

/// List users, optionally filtered by role (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<UsersQuery>,
) -> ApiResult<Json<Vec<UserView>>> {
    authorize(&ctx.user, &[Role::Admin])?;

    let mut selector = Selector::new();
    if let Some(role) = &query.role {
        let role = Role::parse(role)
            .ok_or_else(|| ApiError::BadRequest(format!("Unknown role: {}", role)))?;
        selector = selector.field("role", json!(role.as_str()));
    }

    let docs = state
        .store
        .find(Collection::Users, &selector, FindOptions::default())
        .await?;

    let views = docs
        .iter()
        .map(|doc| doc.parse::<User>().map(|u| u.to_safe_view()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(views))
}

/// Creator directory
pub async fn list_creators(
    State(state): State<AppState>,
    Extension(_ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<UserView>>> {
    let selector = Selector::new().field("role", json!(Role::ContentCreator.as_str()));
    let docs = state
        .store
        .find(Collection::Users, &selector, FindOptions::default())
        .await?;

    let views = docs
        .iter()
        .map(|doc| doc.parse::<User>().map(|u| u.to_safe_view()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(views))
}

/// One creator by id
///
/// A user that exists but is not a creator renders as not-found.
pub async fn get_creator(
    State(state): State<AppState>,
    Extension(_ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserView>> {
    let doc = state
        .store
        .get(Collection::Users, &id.to_string())
        .await
        .map_err(|e| match e {
            StoreError::NotFound => {
                ApiError::NotFound("Content creator not found".to_string())
            }
            other => other.into(),
        })?;
    let user: User = doc.parse()?;

    if !user.is_content_creator() {
        return Err(ApiError::NotFound("Content creator not found".to_string()));
    }

    Ok(Json(user.to_safe_view()))
}

/// One customer by id (admin or the customer itself)
///
/// Out-of-scope lookups are indistinguishable from true absence.
pub async fn get_customer(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserView>> {
    if !ctx.scope.allows_customer(id) {
        return Err(ApiError::NotFound("Customer not found".to_string()));
    }

    let doc = state
        .store
        .get(Collection::Users, &id.to_string())
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::NotFound("Customer not found".to_string()),
            other => other.into(),
        })?;
    let user: User = doc.parse()?;

    if !user.is_customer() {
        return Err(ApiError::NotFound("Customer not found".to_string()));
    }

    Ok(Json(user.to_safe_view()))
}
