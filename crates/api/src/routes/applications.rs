//! Application routes: student-initiated proposals to opportunities.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::engagement::Engagement;
use domain::models::proposal::{
    ensure_resume_attached, Application, CreateApplicationRequest, CreationError,
};
use domain::services::visibility::{ProposalScope, ProposalViewer};
use persistence::entities::{ApplicationEntity, OpportunityKindDb, ProposalStatusDb};
use persistence::repositories::{ApplicationRepository, EngagementRepository};
use shared::pagination::{PageMeta, PageQuery};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{require_alumnus, require_student, resolve_viewer, AuthUser};
use crate::routes::resolve_opportunity;

#[derive(Debug, Serialize)]
pub struct ListApplicationsResponse {
    pub data: Vec<Application>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct AcceptApplicationResponse {
    pub detail: &'static str,
    pub application: Application,
    pub engagement: Engagement,
}

#[derive(Debug, Serialize)]
pub struct ApplicationActionResponse {
    pub detail: &'static str,
    pub application: Application,
}

/// Apply for an opportunity.
///
/// POST /api/v1/applications
pub async fn create_application(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateApplicationRequest>,
) -> Result<(StatusCode, Json<Application>), ApiError> {
    request.validate()?;
    let student = require_student(&state, &auth).await?;

    let opportunity =
        resolve_opportunity(&state, request.opportunity_kind, request.opportunity_id).await?;
    if !opportunity.accepts_proposals {
        return Err(CreationError::OpportunityInactive.into());
    }

    // A resume attached to the application wins; the profile's stored
    // resume is the fallback.
    let resume_url = request.resume_url.or(student.resume_url);
    ensure_resume_attached(opportunity.require_resume, resume_url.as_deref())?;

    let kind: OpportunityKindDb = request.opportunity_kind.into();
    let repo = ApplicationRepository::new(state.pool.clone());

    if repo
        .pending_exists(kind, request.opportunity_id, student.id)
        .await?
    {
        return Err(CreationError::Duplicate.into());
    }

    let application = repo
        .create(
            kind,
            request.opportunity_id,
            student.id,
            resume_url.as_deref(),
            request.cover_letter.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(application.into())))
}

/// List applications visible to the caller.
///
/// GET /api/v1/applications
pub async fn list_applications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<ListApplicationsResponse>, ApiError> {
    let viewer = resolve_viewer(&state, &auth).await?;

    let (rows, total) = ApplicationRepository::new(state.pool.clone())
        .list(viewer.scope(), &page)
        .await?;

    Ok(Json(ListApplicationsResponse {
        data: rows.into_iter().map(Into::into).collect(),
        pagination: PageMeta::new(&page, total),
    }))
}

/// Fetch an application visible to the caller.
///
/// GET /api/v1/applications/:id
pub async fn get_application(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Application>, ApiError> {
    let viewer = resolve_viewer(&state, &auth).await?;
    let (entity, _) = find_visible(&state, id, &viewer).await?;
    Ok(Json(entity.into()))
}

/// Accept an application (the opportunity owner).
///
/// POST /api/v1/applications/:id/accept
pub async fn accept_application(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<AcceptApplicationResponse>), ApiError> {
    let profile = require_alumnus(&state, &auth).await?;

    let repo = ApplicationRepository::new(state.pool.clone());
    let entity = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;
    let application: Application = entity.clone().into();

    let opportunity = resolve_opportunity(
        &state,
        application.opportunity_kind,
        application.opportunity_id,
    )
    .await?;
    application.ensure_may_respond(opportunity.owner_id, profile.id)?;

    if !opportunity.accepts_proposals {
        return Err(CreationError::OpportunityInactive.into());
    }

    if EngagementRepository::new(state.pool.clone())
        .exists_for_pair(
            entity.opportunity_kind,
            application.opportunity_id,
            application.student_id,
        )
        .await?
    {
        return Err(ApiError::Conflict {
            code: "already_engaged",
            message: "The student is already engaged in this opportunity".into(),
        });
    }

    let (accepted, engagement) = repo.accept(&entity, opportunity.owner_id).await?;
    let engagement: Engagement = engagement
        .try_into()
        .map_err(|e: String| ApiError::Internal(e))?;

    Ok((
        StatusCode::CREATED,
        Json(AcceptApplicationResponse {
            detail: "Application accepted successfully",
            application: accepted.into(),
            engagement,
        }),
    ))
}

/// Reject an application (the opportunity owner).
///
/// POST /api/v1/applications/:id/reject
pub async fn reject_application(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationActionResponse>, ApiError> {
    let profile = require_alumnus(&state, &auth).await?;

    let repo = ApplicationRepository::new(state.pool.clone());
    let application: Application = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?
        .into();

    let opportunity = resolve_opportunity(
        &state,
        application.opportunity_kind,
        application.opportunity_id,
    )
    .await?;
    application.ensure_may_respond(opportunity.owner_id, profile.id)?;

    let rejected = repo.resolve(id, ProposalStatusDb::Rejected).await?;

    Ok(Json(ApplicationActionResponse {
        detail: "Application rejected successfully",
        application: rejected.into(),
    }))
}

/// Withdraw a pending application (the applying student).
///
/// POST /api/v1/applications/:id/withdraw
pub async fn withdraw_application(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationActionResponse>, ApiError> {
    let student = require_student(&state, &auth).await?;

    let repo = ApplicationRepository::new(state.pool.clone());
    let application: Application = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?
        .into();

    application.ensure_may_withdraw(student.id)?;

    let withdrawn = repo.resolve(id, ProposalStatusDb::Withdrawn).await?;

    Ok(Json(ApplicationActionResponse {
        detail: "Application withdrawn successfully",
        application: withdrawn.into(),
    }))
}

/// Fetch an application and verify the viewer is a participant.
async fn find_visible(
    state: &AppState,
    id: Uuid,
    viewer: &ProposalViewer,
) -> Result<(ApplicationEntity, Application), ApiError> {
    let entity = ApplicationRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;
    let application: Application = entity.clone().into();

    let visible = match viewer.scope() {
        ProposalScope::ByStudent(profile_id) => application.student_id == profile_id,
        ProposalScope::ByOwner(profile_id) => {
            let opportunity = resolve_opportunity(
                state,
                application.opportunity_kind,
                application.opportunity_id,
            )
            .await?;
            opportunity.owner_id == profile_id
        }
    };

    if !visible {
        return Err(ApiError::NotFound("Application not found".to_string()));
    }

    Ok((entity, application))
}
