/// Content lifecycle endpoints
///
/// # Endpoints
///
/// - `POST /v1/content` - Assign content to a creator (admin)
/// - `GET /v1/content` - List content in the caller's scope
/// - `GET /v1/content/:id` - One content item (visibility-gated)
/// - `PUT /v1/content/:id/status` - Transition the lifecycle status
/// - `POST /v1/content/:id/comments` - Append a comment
/// - `POST /v1/content/:id/revisions` - Submit a revision (forces review)
///
/// Handlers apply the gates in a fixed order: visibility first (failures
/// render as not-found), then the edit/approve gate for mutations
/// (failures render as forbidden). Writes go back to the store with the
/// last-read revision, so concurrent updates surface as conflicts instead
/// of silently overwriting each other.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use contentflow_shared::{
    auth::{
        authorization::{authorize, require_permission},
        middleware::AuthContext,
    },
    models::{
        content::{Comment, CommentKind, Content, ContentStatus, CreateContent, Revision},
        user::{permissions, Role},
    },
    store::{Collection, Document, FindOptions, StoreError},
};

use crate::{app::AppState, error::{ApiError, ApiResult}};

/// Status update request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ContentStatus,
    #[serde(default)]
    pub notes: String,
}

/// Comment request
#[derive(Debug, Deserialize, Validate)]
pub struct AddCommentRequest {
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,

    #[serde(rename = "type", default)]
    pub kind: CommentKind,
}

/// Revision request
#[derive(Debug, Deserialize, Validate)]
pub struct AddRevisionRequest {
    #[validate(length(min = 1, message = "Changes description is required"))]
    pub changes: String,

    #[serde(default)]
    pub files: Vec<String>,
}

/// Loads one content item, rendering both absence and invisibility as 404
async fn load_visible(
    state: &AppState,
    ctx: &AuthContext,
    id: Uuid,
) -> ApiResult<(Content, Document)> {
    let doc = state
        .store
        .get(Collection::Content, &id.to_string())
        .await
        .map_err(|e| match e {
            StoreError::NotFound => ApiError::NotFound("Content not found".to_string()),
            other => other.into(),
        })?;
    let content: Content = doc.parse()?;

    if !content.can_view(&ctx.user) {
        return Err(ApiError::NotFound("Content not found".to_string()));
    }

    Ok((content, doc))
}

/// Writes a content item back with the last-read revision
async fn save(state: &AppState, content: &Content, revision: u64) -> ApiResult<()> {
    let body = serde_json::to_value(content)
        .map_err(|e| ApiError::InternalError(format!("Failed to encode content: {}", e)))?;
    state
        .store
        .insert(
            Collection::Content,
            &content.id.to_string(),
            body,
            Some(revision),
        )
        .await?;
    Ok(())
}

/// Assign content to a creator (admin only)
pub async fn assign_content(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(mut req): Json<CreateContent>,
) -> ApiResult<(StatusCode, Json<Content>)> {
    authorize(&ctx.user, &[Role::Admin])?;
    require_permission(&ctx.user, permissions::ASSIGN_CONTENT)?;

    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }

    // The assigner is always the caller, whatever the body says
    req.assigned_by = ctx.user.id;
    let content = Content::new(req);

    let body = serde_json::to_value(&content)
        .map_err(|e| ApiError::InternalError(format!("Failed to encode content: {}", e)))?;
    state
        .store
        .insert(Collection::Content, &content.id.to_string(), body, None)
        .await?;

    Ok((StatusCode::CREATED, Json(content)))
}

/// List content in the caller's scope
///
/// Admins see everything; customers and creators only their own side of
/// the assignment.
pub async fn list_content(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Content>>> {
    let selector = ctx.scope.apply(Default::default());
    let docs = state
        .store
        .find(Collection::Content, &selector, FindOptions::default())
        .await?;

    let items = docs
        .iter()
        .map(|doc| doc.parse::<Content>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(items))
}

/// One content item
pub async fn get_content(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Content>> {
    let (content, _) = load_visible(&state, &ctx, id).await?;
    Ok(Json(content))
}

/// Transition the lifecycle status
///
/// Setting a verdict status (`approved`/`rejected`/`revision_requested`)
/// requires the approve gate; everything else requires the edit gate.
/// Admins pass both.
pub async fn update_status(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<Content>> {
    let (mut content, doc) = load_visible(&state, &ctx, id).await?;

    let allowed = if req.status.is_verdict() {
        content.can_approve(&ctx.user)
    } else {
        content.can_edit(&ctx.user)
    };
    if !allowed {
        return Err(ApiError::Forbidden("Access denied".to_string()));
    }

    content.update_status(req.status, ctx.user.id, &req.notes);
    save(&state, &content, doc.revision).await?;

    Ok(Json(content))
}

/// Append a comment to a content item
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    req.validate().map_err(ApiError::from)?;

    let (mut content, doc) = load_visible(&state, &ctx, id).await?;

    let comment = content
        .add_comment(ctx.user.id, req.message, req.kind)
        .clone();
    save(&state, &content, doc.revision).await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Submit a revision
///
/// Requires the edit gate; the item is forced to `under_review` whatever
/// its prior status was.
pub async fn add_revision(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddRevisionRequest>,
) -> ApiResult<(StatusCode, Json<Revision>)> {
    req.validate().map_err(ApiError::from)?;

    let (mut content, doc) = load_visible(&state, &ctx, id).await?;

    if !content.can_edit(&ctx.user) {
        return Err(ApiError::Forbidden("Access denied".to_string()));
    }

    let revision = content
        .add_revision(ctx.user.id, req.changes, req.files)
        .clone();
    save(&state, &content, doc.revision).await?;

    Ok((StatusCode::CREATED, Json(revision)))
}
