/// Content calendar endpoints
///
/// # Endpoints
///
/// - `POST /v1/calendars` - Create a calendar
/// - `GET /v1/calendars` - List calendars in the caller's scope
/// - `GET /v1/calendars/customer/:customer_id` - One customer's calendars
/// - `GET/PUT/DELETE /v1/calendars/:id` - One calendar
/// - `POST/DELETE /v1/calendars/:id/items` - Add or remove an item by value
/// - `PUT/DELETE /v1/calendars/:id/items/:date/:description` - Item by quasi-key
///
/// Item paths address scheduled entries by value: the `(date, description)`
/// pair in the URL, percent-decoded by the router, selects the item. The
/// scope check runs before the aggregate is touched, so a calendar outside
/// the caller's scope is indistinguishable from one that does not exist.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use contentflow_shared::{
    auth::{authorization::authorize, middleware::AuthContext},
    models::{
        calendar::{CalendarItem, ContentCalendar, CreateCalendar},
        user::Role,
    },
    store::{Collection, Document, FindOptions, Selector, StoreError},
};

use crate::{app::AppState, error::{ApiError, ApiResult}};

/// Calendar creation request
///
/// Customers may omit `customer_id`; it is pinned to their own id either
/// way. Admins must name the owning customer.
#[derive(Debug, Deserialize)]
pub struct CreateCalendarRequest {
    pub customer_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub content_items: Vec<CalendarItem>,
}

/// Calendar update request
#[derive(Debug, Deserialize)]
pub struct UpdateCalendarRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Loads one calendar, rendering out-of-scope lookups as not-found
async fn load_scoped(
    state: &AppState,
    ctx: &AuthContext,
    id: Uuid,
) -> ApiResult<(ContentCalendar, Document)> {
    let doc = state
        .store
        .get(Collection::Calendars, &id.to_string())
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::NotFound("Calendar not found".to_string()),
            other => other.into(),
        })?;
    let calendar: ContentCalendar = doc.parse()?;

    if !ctx.scope.allows_customer(calendar.customer_id) {
        return Err(ApiError::NotFound("Calendar not found".to_string()));
    }

    Ok((calendar, doc))
}

/// Writes a calendar back with the last-read revision
async fn save(state: &AppState, calendar: &ContentCalendar, revision: u64) -> ApiResult<()> {
    let body = serde_json::to_value(calendar)
        .map_err(|e| ApiError::InternalError(format!("Failed to encode calendar: {}", e)))?;
    state
        .store
        .insert(
            Collection::Calendars,
            &calendar.id.to_string(),
            body,
            Some(revision),
        )
        .await?;
    Ok(())
}

/// Create a calendar
///
/// # Errors
///
/// - `400 Bad Request`: admin request without a `customer_id`
/// - `403 Forbidden`: caller is a creator
pub async fn create_calendar(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(req): Json<CreateCalendarRequest>,
) -> ApiResult<(StatusCode, Json<ContentCalendar>)> {
    authorize(&ctx.user, &[Role::Admin, Role::Customer])?;

    // Customers own what they create, whatever the body says
    let customer_id = if ctx.user.is_customer() {
        ctx.user.id
    } else {
        req.customer_id.ok_or_else(|| {
            ApiError::BadRequest("customer_id is required".to_string())
        })?
    };

    let calendar = ContentCalendar::new(CreateCalendar {
        customer_id,
        name: req.name,
        description: req.description,
        content_items: req.content_items,
    });

    let body = serde_json::to_value(&calendar)
        .map_err(|e| ApiError::InternalError(format!("Failed to encode calendar: {}", e)))?;
    state
        .store
        .insert(Collection::Calendars, &calendar.id.to_string(), body, None)
        .await?;

    Ok((StatusCode::CREATED, Json(calendar)))
}

/// List calendars in the caller's scope
pub async fn list_calendars(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<ContentCalendar>>> {
    let selector = ctx.scope.apply(Selector::new());
    let docs = state
        .store
        .find(Collection::Calendars, &selector, FindOptions::default())
        .await?;

    let calendars = docs
        .iter()
        .map(|doc| doc.parse::<ContentCalendar>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(calendars))
}

/// One customer's calendars
///
/// A customer asking for another customer's calendars sees an empty-handed
/// not-found, never a forbidden.
pub async fn list_customer_calendars(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(customer_id): Path<Uuid>,
) -> ApiResult<Json<Vec<ContentCalendar>>> {
    if !ctx.scope.allows_customer(customer_id) {
        return Err(ApiError::NotFound("Calendar not found".to_string()));
    }

    let selector = Selector::new().field("customer_id", json!(customer_id.to_string()));
    let docs = state
        .store
        .find(Collection::Calendars, &selector, FindOptions::default())
        .await?;

    let calendars = docs
        .iter()
        .map(|doc| doc.parse::<ContentCalendar>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(calendars))
}

/// One calendar by id
pub async fn get_calendar(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ContentCalendar>> {
    let (calendar, _) = load_scoped(&state, &ctx, id).await?;
    Ok(Json(calendar))
}

/// Update a calendar's own fields (not its items)
pub async fn update_calendar(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCalendarRequest>,
) -> ApiResult<Json<ContentCalendar>> {
    let (mut calendar, doc) = load_scoped(&state, &ctx, id).await?;

    if let Some(name) = req.name {
        calendar.name = name;
    }
    if let Some(description) = req.description {
        calendar.description = description;
    }
    if let Some(is_active) = req.is_active {
        calendar.is_active = is_active;
    }
    calendar.updated_at = chrono::Utc::now();

    save(&state, &calendar, doc.revision).await?;

    Ok(Json(calendar))
}

/// Delete a calendar
pub async fn delete_calendar(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let _ = load_scoped(&state, &ctx, id).await?;

    state
        .store
        .delete(Collection::Calendars, &id.to_string())
        .await?;

    Ok(Json(json!({ "success": true })))
}

/// Add a scheduled item (idempotent by value)
pub async fn add_item(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(item): Json<CalendarItem>,
) -> ApiResult<Json<ContentCalendar>> {
    let (mut calendar, doc) = load_scoped(&state, &ctx, id).await?;

    calendar.add_content_item(item);
    save(&state, &calendar, doc.revision).await?;

    Ok(Json(calendar))
}

/// Remove every item equal to the one in the body
pub async fn remove_item(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(item): Json<CalendarItem>,
) -> ApiResult<Json<ContentCalendar>> {
    let (mut calendar, doc) = load_scoped(&state, &ctx, id).await?;

    calendar.remove_content_item(&item);
    save(&state, &calendar, doc.revision).await?;

    Ok(Json(calendar))
}

/// Patch the item addressed by `(date, description)`
///
/// The path segments are percent-decoded by the router before they reach
/// the aggregate's matching rules.
pub async fn update_item(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path((id, date, description)): Path<(Uuid, String, String)>,
    Json(patch): Json<Map<String, Value>>,
) -> ApiResult<Json<ContentCalendar>> {
    let (mut calendar, doc) = load_scoped(&state, &ctx, id).await?;

    calendar.update_item(&date, &description, patch)?;
    save(&state, &calendar, doc.revision).await?;

    Ok(Json(calendar))
}

/// Delete the item addressed by `(date, description)`
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path((id, date, description)): Path<(Uuid, String, String)>,
) -> ApiResult<Json<Value>> {
    let (mut calendar, doc) = load_scoped(&state, &ctx, id).await?;

    calendar.delete_item(&date, &description)?;
    save(&state, &calendar, doc.revision).await?;

    Ok(Json(json!({ "success": true })))
}
