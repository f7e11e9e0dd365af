//! Mentorship routes, owner-scoped.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::opportunity::{
    CreateMentorshipRequest, Mentorship, UpdateMentorshipRequest,
};
use persistence::repositories::mentorship::MentorshipChanges;
use persistence::repositories::MentorshipRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{require_alumnus, AuthUser};

#[derive(Debug, Serialize)]
pub struct ListMentorshipsResponse {
    pub data: Vec<Mentorship>,
}

/// Create a mentorship listing.
///
/// POST /api/v1/mentorships
pub async fn create_mentorship(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateMentorshipRequest>,
) -> Result<(StatusCode, Json<Mentorship>), ApiError> {
    request.validate()?;
    let profile = require_alumnus(&state, &auth).await?;

    let mentorship = MentorshipRepository::new(state.pool.clone())
        .create(
            profile.id,
            &request.title,
            &request.description,
            &request.focus_areas,
            request.max_slots,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(mentorship.into())))
}

/// List the caller's mentorships.
///
/// GET /api/v1/mentorships
pub async fn list_mentorships(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ListMentorshipsResponse>, ApiError> {
    let profile = require_alumnus(&state, &auth).await?;

    let rows = MentorshipRepository::new(state.pool.clone())
        .list_by_owner(profile.id)
        .await?;

    Ok(Json(ListMentorshipsResponse {
        data: rows.into_iter().map(Into::into).collect(),
    }))
}

/// Fetch one of the caller's mentorships.
///
/// GET /api/v1/mentorships/:id
pub async fn get_mentorship(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Mentorship>, ApiError> {
    let profile = require_alumnus(&state, &auth).await?;
    let mentorship = find_owned(&state, id, profile.id).await?;
    Ok(Json(mentorship))
}

/// Update one of the caller's mentorships.
///
/// PATCH /api/v1/mentorships/:id
pub async fn update_mentorship(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateMentorshipRequest>,
) -> Result<Json<Mentorship>, ApiError> {
    request.validate()?;
    let profile = require_alumnus(&state, &auth).await?;
    find_owned(&state, id, profile.id).await?;

    let updated = MentorshipRepository::new(state.pool.clone())
        .update(
            id,
            MentorshipChanges {
                title: request.title,
                description: request.description,
                focus_areas: request.focus_areas,
                is_active: request.is_active,
            },
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Mentorship not found".to_string()))?;

    Ok(Json(updated.into()))
}

/// Soft-delete one of the caller's mentorships.
///
/// DELETE /api/v1/mentorships/:id
pub async fn delete_mentorship(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let profile = require_alumnus(&state, &auth).await?;
    find_owned(&state, id, profile.id).await?;

    MentorshipRepository::new(state.pool.clone())
        .soft_delete(id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn find_owned(
    state: &AppState,
    id: Uuid,
    alumnus_id: Uuid,
) -> Result<Mentorship, ApiError> {
    let mentorship: Mentorship = MentorshipRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Mentorship not found".to_string()))?
        .into();

    // Non-owners get the same 404 as a missing row.
    if mentorship.alumnus_id != alumnus_id {
        return Err(ApiError::NotFound("Mentorship not found".to_string()));
    }

    Ok(mentorship)
}
