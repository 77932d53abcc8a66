/// Creator submission endpoints
///
/// # Endpoints
///
/// - `POST /v1/submissions` - Record upload metadata for an assignment
/// - `GET /v1/submissions` - List the caller's submission records
///
/// Binary uploads happen out of band; these endpoints only store and serve
/// the metadata (caption, hashtags, notes, asset URLs). Creators see their
/// own records, admins see everything.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use contentflow_shared::{
    auth::{
        authorization::{authorize, ScopeFilter},
        middleware::AuthContext,
    },
    models::{
        submission::{CreateSubmission, Submission},
        user::Role,
    },
    store::{Collection, FindOptions, Selector},
};

use crate::{app::AppState, error::{ApiError, ApiResult}};

/// Submission creation response
#[derive(Debug, Serialize)]
pub struct CreateSubmissionResponse {
    pub message: String,
    pub id: Uuid,
}

/// Record upload metadata for an assignment
pub async fn create_submission(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(req): Json<CreateSubmission>,
) -> ApiResult<(StatusCode, Json<CreateSubmissionResponse>)> {
    authorize(&ctx.user, &[Role::Admin, Role::ContentCreator])?;

    if req.images.is_empty() {
        return Err(ApiError::BadRequest(
            "At least one image is required".to_string(),
        ));
    }

    let submission = Submission::new(req, ctx.user.id);

    let body = serde_json::to_value(&submission)
        .map_err(|e| ApiError::InternalError(format!("Failed to encode submission: {}", e)))?;
    state
        .store
        .insert(
            Collection::Submissions,
            &submission.id.to_string(),
            body,
            None,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSubmissionResponse {
            message: "saved".to_string(),
            id: submission.id,
        }),
    ))
}

/// List the caller's submission records
///
/// Admins see all records; creators only those they recorded.
pub async fn list_submissions(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Submission>>> {
    authorize(&ctx.user, &[Role::Admin, Role::ContentCreator])?;

    let selector = match ctx.scope {
        ScopeFilter::All => Selector::new(),
        _ => Selector::new().field("created_by", json!(ctx.user.id.to_string())),
    };

    let docs = state
        .store
        .find(Collection::Submissions, &selector, FindOptions::default())
        .await?;

    let records = docs
        .iter()
        .map(|doc| doc.parse::<Submission>())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(records))
}
