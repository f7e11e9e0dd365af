//! Event registration coordinator.
//!
//! Registration validates the ticket with ordered checks, records the
//! purchase claim, then branches: a free ticket completes on the spot
//! (atomic claim, mark paid, side effects); a paid ticket defers the claim
//! until the provider confirms and returns a checkout URL instead.

use chrono::Utc;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use domain::models::event::{
    Event, RegistrationOutcome, Ticket, TicketPurchase, TicketRejection,
};
use persistence::entities::UserEntity;
use persistence::repositories::EventRepository;

use crate::error::ApiError;
use crate::services::{CalendarService, EmailService, PaymentService};

/// Why a registration or confirmation failed.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Ticket not found")]
    TicketNotFound,

    #[error("Purchase not found")]
    PurchaseNotFound,

    #[error(transparent)]
    Rejected(#[from] TicketRejection),

    #[error("Failed to initialize payment: {0}")]
    Payment(#[from] crate::services::payment::PaymentError),

    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::TicketNotFound => ApiError::NotFound("Ticket not found".into()),
            RegistrationError::PurchaseNotFound => {
                ApiError::NotFound("Purchase not found".into())
            }
            RegistrationError::Rejected(rejection) => rejection.into(),
            RegistrationError::Payment(e) => {
                ApiError::ServiceUnavailable(format!("Payment initialization failed: {}", e))
            }
            RegistrationError::Db(e) => e.into(),
        }
    }
}

/// Coordinates ticket registration across the store and the collaborators.
#[derive(Clone)]
pub struct RegistrationService {
    events: EventRepository,
    email: EmailService,
    payment: PaymentService,
    calendar: CalendarService,
}

impl RegistrationService {
    pub fn new(
        events: EventRepository,
        email: EmailService,
        payment: PaymentService,
        calendar: CalendarService,
    ) -> Self {
        Self {
            events,
            email,
            payment,
            calendar,
        }
    }

    /// Register a user for a ticket.
    pub async fn register(
        &self,
        ticket_id: Uuid,
        user: &UserEntity,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let ticket_row = self
            .events
            .find_ticket_by_id(ticket_id)
            .await?
            .ok_or(RegistrationError::TicketNotFound)?;
        let event_row = self
            .events
            .find_event_by_id(ticket_row.event_id)
            .await?
            .ok_or(RegistrationError::TicketNotFound)?;

        let ticket: Ticket = ticket_row.into();
        let event: Event = event_row.into();

        ticket.purchasable_at(Utc::now())?;

        // The claim row exists for both branches; only the free branch pays
        // it immediately.
        let purchase = self
            .events
            .create_purchase(ticket.id, user.id, &user.email)
            .await?;

        if ticket.is_free() {
            self.complete_free(&ticket, &event, purchase, user).await
        } else {
            let checkout_url = self
                .payment
                .initialize(
                    ticket.price_minor,
                    &user.email,
                    &purchase.ticket_uid.to_string(),
                )
                .await?;

            Ok(RegistrationOutcome::CheckoutRequired {
                purchase: purchase.into(),
                checkout_url,
            })
        }
    }

    async fn complete_free(
        &self,
        ticket: &Ticket,
        event: &Event,
        purchase: persistence::entities::TicketPurchaseEntity,
        user: &UserEntity,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        // Conditional increment backstops the pre-check under concurrency.
        if !self.events.claim_ticket_unit(ticket.id).await? {
            return Err(RegistrationError::Rejected(TicketRejection::SoldOut));
        }

        let purchase = self.events.mark_purchase_paid(purchase.id, None).await?;

        let user_name = format!("{} {}", user.firstname, user.lastname);
        self.run_side_effects(event, &purchase.clone().into(), &user_name)
            .await;

        Ok(RegistrationOutcome::Confirmed {
            purchase: purchase.into(),
        })
    }

    /// Payment provider callback: settle a purchase by its reference.
    ///
    /// Idempotent on the purchase UID; a purchase already paid is returned
    /// unchanged. A sold-out race at confirmation leaves the purchase
    /// unpaid and reports sold_out.
    pub async fn confirm_payment(
        &self,
        reference: Uuid,
    ) -> Result<TicketPurchase, RegistrationError> {
        let purchase = self
            .events
            .find_purchase_by_uid(reference)
            .await?
            .ok_or(RegistrationError::PurchaseNotFound)?;

        if purchase.is_paid {
            return Ok(purchase.into());
        }

        if !self.events.claim_ticket_unit(purchase.ticket_id).await? {
            return Err(RegistrationError::Rejected(TicketRejection::SoldOut));
        }

        let paid = self
            .events
            .mark_purchase_paid(purchase.id, Some(&reference.to_string()))
            .await?;

        let ticket_row = self.events.find_ticket_by_id(paid.ticket_id).await?;
        let event_row = match &ticket_row {
            Some(t) => self.events.find_event_by_id(t.event_id).await?,
            None => None,
        };
        if let Some(event_row) = event_row {
            let event: Event = event_row.into();
            let purchase: TicketPurchase = paid.clone().into();
            // No user context in the callback; greet by the purchase email.
            let user_name = purchase.email.clone();
            self.run_side_effects(&event, &purchase, &user_name).await;
        }

        Ok(paid.into())
    }

    /// Post-registration side effects, all best-effort.
    async fn run_side_effects(&self, event: &Event, purchase: &TicketPurchase, user_name: &str) {
        if event.mode.has_virtual_component() {
            if let Some(external_id) = &event.external_calendar_event_id {
                match self.events.paid_attendee_emails(event.id).await {
                    Ok(emails) => self.calendar.add_attendees(external_id, &emails).await,
                    Err(e) => warn!(event_id = %event.id, error = %e, "Attendee lookup failed"),
                }
            }
        }

        let location = if event.mode.has_virtual_component() {
            "Virtual Meeting".to_string()
        } else {
            event.venue.clone().unwrap_or_else(|| "TBA".to_string())
        };
        let event_date = event.starts_at.format("%B %d, %Y at %H:%M").to_string();

        if let Err(e) = self
            .email
            .send_ticket_confirmation(
                &purchase.email,
                user_name,
                &event.title,
                &event_date,
                &location,
                &purchase.ticket_uid.to_string(),
            )
            .await
        {
            warn!(purchase_id = %purchase.id, error = %e, "Ticket confirmation email failed");
        }
    }
}
