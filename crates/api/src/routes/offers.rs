//! Offer routes: owner-initiated proposals to students.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::engagement::Engagement;
use domain::models::proposal::{CreateOfferRequest, CreationError, Offer};
use domain::services::visibility::{ProposalScope, ProposalViewer};
use persistence::entities::{OfferEntity, OpportunityKindDb, ProposalStatusDb};
use persistence::repositories::{EngagementRepository, OfferRepository, ProfileRepository};
use shared::pagination::{PageMeta, PageQuery};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{require_alumnus, require_student, resolve_viewer, AuthUser};
use crate::routes::resolve_opportunity;

#[derive(Debug, Serialize)]
pub struct ListOffersResponse {
    pub data: Vec<Offer>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct AcceptOfferResponse {
    pub detail: &'static str,
    pub offer: Offer,
    pub engagement: Engagement,
}

#[derive(Debug, Serialize)]
pub struct OfferActionResponse {
    pub detail: &'static str,
    pub offer: Offer,
}

/// Create an offer to a student.
///
/// POST /api/v1/offers
pub async fn create_offer(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateOfferRequest>,
) -> Result<(StatusCode, Json<Offer>), ApiError> {
    request.validate()?;
    let profile = require_alumnus(&state, &auth).await?;

    let opportunity =
        resolve_opportunity(&state, request.opportunity_kind, request.opportunity_id).await?;
    if opportunity.owner_id != profile.id {
        return Err(ApiError::Forbidden(
            "Only the opportunity owner may create offers".to_string(),
        ));
    }
    if !opportunity.accepts_proposals {
        return Err(CreationError::OpportunityInactive.into());
    }

    ProfileRepository::new(state.pool.clone())
        .find_student_by_id(request.student_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    let kind: OpportunityKindDb = request.opportunity_kind.into();

    // Advisory pre-checks; the unique indexes stay authoritative under
    // concurrency and surface the same reason codes via the 23505 mapping.
    if EngagementRepository::new(state.pool.clone())
        .exists_for_pair(kind, request.opportunity_id, request.student_id)
        .await?
    {
        return Err(ApiError::Conflict {
            code: "already_engaged",
            message: "The student is already engaged in this opportunity".into(),
        });
    }

    let offer_repo = OfferRepository::new(state.pool.clone());
    if offer_repo
        .pending_exists(kind, request.opportunity_id, request.student_id)
        .await?
    {
        return Err(CreationError::Duplicate.into());
    }

    let offer = offer_repo
        .create(kind, request.opportunity_id, request.student_id)
        .await?;

    Ok((StatusCode::CREATED, Json(offer.into())))
}

/// List offers visible to the caller.
///
/// GET /api/v1/offers
pub async fn list_offers(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<ListOffersResponse>, ApiError> {
    let viewer = resolve_viewer(&state, &auth).await?;

    let (rows, total) = OfferRepository::new(state.pool.clone())
        .list(viewer.scope(), &page)
        .await?;

    Ok(Json(ListOffersResponse {
        data: rows.into_iter().map(Into::into).collect(),
        pagination: PageMeta::new(&page, total),
    }))
}

/// Fetch an offer visible to the caller.
///
/// GET /api/v1/offers/:id
pub async fn get_offer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Offer>, ApiError> {
    let viewer = resolve_viewer(&state, &auth).await?;
    let (entity, _) = find_visible(&state, id, &viewer).await?;
    Ok(Json(entity.into()))
}

/// Accept an offer (the addressed student).
///
/// POST /api/v1/offers/:id/accept
pub async fn accept_offer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<AcceptOfferResponse>), ApiError> {
    let student = require_student(&state, &auth).await?;

    let offer_repo = OfferRepository::new(state.pool.clone());
    let entity = offer_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Offer not found".to_string()))?;
    let offer: Offer = entity.clone().into();

    offer.ensure_may_respond(student.id)?;

    let opportunity =
        resolve_opportunity(&state, offer.opportunity_kind, offer.opportunity_id).await?;
    if !opportunity.accepts_proposals {
        return Err(CreationError::OpportunityInactive.into());
    }

    // Explicit pre-check; the engagement insert still hits the unique
    // constraint if a concurrent accept slips past it.
    if EngagementRepository::new(state.pool.clone())
        .exists_for_pair(entity.opportunity_kind, offer.opportunity_id, offer.student_id)
        .await?
    {
        return Err(ApiError::Conflict {
            code: "already_engaged",
            message: "You are already engaged in this opportunity".into(),
        });
    }

    let (accepted, engagement) = offer_repo.accept(&entity, opportunity.owner_id).await?;
    let engagement: Engagement = engagement
        .try_into()
        .map_err(|e: String| ApiError::Internal(e))?;

    Ok((
        StatusCode::CREATED,
        Json(AcceptOfferResponse {
            detail: "Offer accepted successfully",
            offer: accepted.into(),
            engagement,
        }),
    ))
}

/// Reject an offer (the addressed student).
///
/// POST /api/v1/offers/:id/reject
pub async fn reject_offer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OfferActionResponse>, ApiError> {
    let student = require_student(&state, &auth).await?;

    let offer_repo = OfferRepository::new(state.pool.clone());
    let offer: Offer = offer_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Offer not found".to_string()))?
        .into();

    offer.ensure_may_respond(student.id)?;

    let rejected = offer_repo.resolve(id, ProposalStatusDb::Rejected).await?;

    Ok(Json(OfferActionResponse {
        detail: "Offer rejected successfully",
        offer: rejected.into(),
    }))
}

/// Withdraw a pending offer (the proposing owner).
///
/// POST /api/v1/offers/:id/withdraw
pub async fn withdraw_offer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<OfferActionResponse>, ApiError> {
    let profile = require_alumnus(&state, &auth).await?;

    let offer_repo = OfferRepository::new(state.pool.clone());
    let offer: Offer = offer_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Offer not found".to_string()))?
        .into();

    let opportunity =
        resolve_opportunity(&state, offer.opportunity_kind, offer.opportunity_id).await?;
    offer.ensure_may_withdraw(opportunity.owner_id, profile.id)?;

    let withdrawn = offer_repo.resolve(id, ProposalStatusDb::Withdrawn).await?;

    Ok(Json(OfferActionResponse {
        detail: "Offer withdrawn successfully",
        offer: withdrawn.into(),
    }))
}

/// Fetch an offer and verify the viewer is a participant.
async fn find_visible(
    state: &AppState,
    id: Uuid,
    viewer: &ProposalViewer,
) -> Result<(OfferEntity, Offer), ApiError> {
    let entity = OfferRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Offer not found".to_string()))?;
    let offer: Offer = entity.clone().into();

    let visible = match viewer.scope() {
        ProposalScope::ByStudent(profile_id) => offer.student_id == profile_id,
        ProposalScope::ByOwner(profile_id) => {
            let opportunity =
                resolve_opportunity(state, offer.opportunity_kind, offer.opportunity_id).await?;
            opportunity.owner_id == profile_id
        }
    };

    if !visible {
        return Err(ApiError::NotFound("Offer not found".to_string()));
    }

    Ok((entity, offer))
}
