//! Internship routes, owner-scoped.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::opportunity::{CreateInternshipRequest, Internship};
use persistence::repositories::internship::NewInternship;
use persistence::repositories::InternshipRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{require_alumnus, AuthUser};

#[derive(Debug, Serialize)]
pub struct ListInternshipsResponse {
    pub data: Vec<Internship>,
}

/// Create an internship listing.
///
/// POST /api/v1/internships
pub async fn create_internship(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateInternshipRequest>,
) -> Result<(StatusCode, Json<Internship>), ApiError> {
    request.validate()?;
    request
        .check_dates()
        .map_err(|msg| ApiError::Validation(msg.to_string()))?;
    let profile = require_alumnus(&state, &auth).await?;

    let internship = InternshipRepository::new(state.pool.clone())
        .create(NewInternship {
            alumnus_id: profile.id,
            title: request.title,
            description: request.description,
            work_mode: request.work_mode.into(),
            engagement_type: request.engagement_type.into(),
            location: request.location,
            industry: request.industry,
            skills_required: request.skills_required,
            duration_weeks: request.duration_weeks,
            start_date: request.start_date,
            end_date: request.end_date,
            is_paid: request.is_paid,
            stipend_minor: request.stipend_minor,
            require_resume: request.require_resume,
            require_cover_letter: request.require_cover_letter,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(internship.into())))
}

/// List the caller's internships.
///
/// GET /api/v1/internships
pub async fn list_internships(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ListInternshipsResponse>, ApiError> {
    let profile = require_alumnus(&state, &auth).await?;

    let rows = InternshipRepository::new(state.pool.clone())
        .list_by_owner(profile.id)
        .await?;

    Ok(Json(ListInternshipsResponse {
        data: rows.into_iter().map(Into::into).collect(),
    }))
}

/// Toggle whether an internship accepts new offers/applications.
///
/// POST /api/v1/internships/:id/toggle-active
pub async fn toggle_internship_active(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Internship>, ApiError> {
    let profile = require_alumnus(&state, &auth).await?;

    let repo = InternshipRepository::new(state.pool.clone());
    let internship: Internship = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Internship not found".to_string()))?
        .into();

    if internship.alumnus_id != profile.id {
        return Err(ApiError::NotFound("Internship not found".to_string()));
    }

    let updated = repo
        .set_active(id, !internship.is_active)
        .await?
        .ok_or_else(|| ApiError::NotFound("Internship not found".to_string()))?;

    Ok(Json(updated.into()))
}

/// Soft-delete one of the caller's internships.
///
/// DELETE /api/v1/internships/:id
pub async fn delete_internship(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let profile = require_alumnus(&state, &auth).await?;

    let repo = InternshipRepository::new(state.pool.clone());
    let internship: Internship = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Internship not found".to_string()))?
        .into();

    if internship.alumnus_id != profile.id {
        return Err(ApiError::NotFound("Internship not found".to_string()));
    }

    repo.soft_delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
