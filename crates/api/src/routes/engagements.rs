//! Engagement routes: the ledger of active relationships.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use domain::models::engagement::{Engagement, EngagementSource};
use domain::models::proposal::{Application, Offer};
use domain::services::visibility::{ProposalScope, ProposalViewer};
use persistence::entities::EngagementStatusDb;
use persistence::repositories::{
    ApplicationRepository, EngagementRepository, OfferRepository,
};
use shared::pagination::{PageMeta, PageQuery};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{require_alumnus, resolve_viewer, AuthUser};

#[derive(Debug, Serialize)]
pub struct ListEngagementsResponse {
    pub data: Vec<Engagement>,
    pub pagination: PageMeta,
}

/// The resolved proposal an engagement was created from.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "record")]
pub enum EngagementSourceResponse {
    Offer(Offer),
    Application(Application),
}

/// List engagements visible to the caller.
///
/// GET /api/v1/engagements
pub async fn list_engagements(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<ListEngagementsResponse>, ApiError> {
    let viewer = resolve_viewer(&state, &auth).await?;

    let (rows, total) = EngagementRepository::new(state.pool.clone())
        .list(viewer.scope(), &page)
        .await?;

    let data = rows
        .into_iter()
        .map(|row| row.try_into().map_err(ApiError::Internal))
        .collect::<Result<Vec<Engagement>, _>>()?;

    Ok(Json(ListEngagementsResponse {
        data,
        pagination: PageMeta::new(&page, total),
    }))
}

/// Fetch an engagement visible to the caller.
///
/// GET /api/v1/engagements/:id
pub async fn get_engagement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Engagement>, ApiError> {
    let viewer = resolve_viewer(&state, &auth).await?;
    let engagement = find_visible(&state, id, &viewer).await?;
    Ok(Json(engagement))
}

/// Resolve the weak back-reference to the originating proposal.
///
/// GET /api/v1/engagements/:id/source
pub async fn get_engagement_source(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<EngagementSourceResponse>, ApiError> {
    let viewer = resolve_viewer(&state, &auth).await?;
    let engagement = find_visible(&state, id, &viewer).await?;

    // Lookup only: the source row's lifecycle is independent of the
    // engagement, so a missing row is a plain 404, never a cascade.
    let source = match engagement.source {
        EngagementSource::Offer(offer_id) => {
            let offer = OfferRepository::new(state.pool.clone())
                .find_by_id(offer_id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Source offer not found".to_string()))?;
            EngagementSourceResponse::Offer(offer.into())
        }
        EngagementSource::Application(application_id) => {
            let application = ApplicationRepository::new(state.pool.clone())
                .find_by_id(application_id)
                .await?
                .ok_or_else(|| {
                    ApiError::NotFound("Source application not found".to_string())
                })?;
            EngagementSourceResponse::Application(application.into())
        }
    };

    Ok(Json(source))
}

/// Mark an engagement completed (the owning alumnus).
///
/// POST /api/v1/engagements/:id/complete
pub async fn complete_engagement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Engagement>, ApiError> {
    close_engagement(state, auth, id, EngagementStatusDb::Completed).await
}

/// Mark an engagement terminated (the owning alumnus).
///
/// POST /api/v1/engagements/:id/terminate
pub async fn terminate_engagement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Engagement>, ApiError> {
    close_engagement(state, auth, id, EngagementStatusDb::Terminated).await
}

async fn close_engagement(
    state: AppState,
    auth: AuthUser,
    id: Uuid,
    status: EngagementStatusDb,
) -> Result<Json<Engagement>, ApiError> {
    let profile = require_alumnus(&state, &auth).await?;

    let repo = EngagementRepository::new(state.pool.clone());
    let engagement: Engagement = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Engagement not found".to_string()))?
        .try_into()
        .map_err(ApiError::Internal)?;

    if engagement.alumnus_id != profile.id {
        return Err(ApiError::Forbidden(
            "Only the owning alumnus may close this engagement".to_string(),
        ));
    }

    let closed = repo
        .close(id, status)
        .await?
        .ok_or(ApiError::Conflict {
            code: "already_resolved",
            message: "Engagement is not active".into(),
        })?;

    Ok(Json(closed.try_into().map_err(ApiError::Internal)?))
}

async fn find_visible(
    state: &AppState,
    id: Uuid,
    viewer: &ProposalViewer,
) -> Result<Engagement, ApiError> {
    let engagement: Engagement = EngagementRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Engagement not found".to_string()))?
        .try_into()
        .map_err(ApiError::Internal)?;

    let visible = match viewer.scope() {
        ProposalScope::ByStudent(profile_id) => engagement.student_id == profile_id,
        ProposalScope::ByOwner(profile_id) => engagement.alumnus_id == profile_id,
    };

    if !visible {
        return Err(ApiError::NotFound("Engagement not found".to_string()));
    }

    Ok(engagement)
}
