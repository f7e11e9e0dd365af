//! Event and ticket routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain::models::event::{CreateEventRequest, Event, RegistrationOutcome, Ticket, TicketPurchase};
use persistence::repositories::event::{NewEvent, NewTicket};
use persistence::repositories::{EventRepository, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::services::RegistrationService;

#[derive(Debug, Serialize)]
pub struct CreateEventResponse {
    pub event: Event,
    pub tickets: Vec<Ticket>,
}

#[derive(Debug, Serialize)]
pub struct ListEventsResponse {
    pub data: Vec<Event>,
}

/// Provider callback body; the reference is the purchase UID.
#[derive(Debug, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub reference: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ConfirmPaymentResponse {
    pub detail: &'static str,
    pub purchase: TicketPurchase,
}

/// Create an event with its ticket tiers.
///
/// POST /api/v1/events
pub async fn create_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<CreateEventResponse>), ApiError> {
    request.validate()?;

    let tickets = request
        .tickets
        .into_iter()
        .map(|t| NewTicket {
            name: t.name,
            description: t.description,
            price_minor: t.price_minor,
            quantity: t.quantity,
            sales_start: t.sales_start,
            sales_end: t.sales_end,
            is_default: false,
        })
        .collect();

    let (event, tickets) = EventRepository::new(state.pool.clone())
        .create_with_tickets(
            NewEvent {
                creator_id: auth.user_id,
                title: request.title,
                description: request.description,
                category: request.category.into(),
                mode: request.mode.into(),
                venue: request.venue,
                starts_at: request.starts_at,
                duration_mins: request.duration_mins,
                external_calendar_event_id: request.external_calendar_event_id,
            },
            tickets,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateEventResponse {
            event: event.into(),
            tickets: tickets.into_iter().map(Into::into).collect(),
        }),
    ))
}

/// List published events.
///
/// GET /api/v1/events
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<ListEventsResponse>, ApiError> {
    let rows = EventRepository::new(state.pool.clone())
        .list_published()
        .await?;

    Ok(Json(ListEventsResponse {
        data: rows.into_iter().map(Into::into).collect(),
    }))
}

/// Publish an event (the creator).
///
/// POST /api/v1/events/:id/publish
pub async fn publish_event(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let published = EventRepository::new(state.pool.clone())
        .publish(id, auth.user_id)
        .await?;

    if published == 0 {
        return Err(ApiError::NotFound("Event not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Register for a ticket: a confirmation for free tickets, a checkout URL
/// for paid ones.
///
/// POST /api/v1/tickets/:id/register
pub async fn register_for_ticket(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(ticket_id): Path<Uuid>,
) -> Result<(StatusCode, Json<RegistrationOutcome>), ApiError> {
    let user = UserRepository::new(state.pool.clone())
        .find_by_id(auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Unknown account".to_string()))?;

    let service = RegistrationService::new(
        EventRepository::new(state.pool.clone()),
        state.email.clone(),
        state.payment.clone(),
        state.calendar.clone(),
    );

    let outcome = service.register(ticket_id, &user).await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Settle a purchase after external payment confirmation.
///
/// POST /api/v1/payments/confirm
pub async fn confirm_payment(
    State(state): State<AppState>,
    Json(request): Json<ConfirmPaymentRequest>,
) -> Result<Json<ConfirmPaymentResponse>, ApiError> {
    let service = RegistrationService::new(
        EventRepository::new(state.pool.clone()),
        state.email.clone(),
        state.payment.clone(),
        state.calendar.clone(),
    );

    let purchase = service.confirm_payment(request.reference).await?;

    Ok(Json(ConfirmPaymentResponse {
        detail: "Payment confirmed",
        purchase,
    }))
}
