//! Event, ticket and ticket-purchase models.
//!
//! A ticket defines price (minor units), quantity and a sales window;
//! a purchase is the immutable record of one person claiming one unit.
//! `quantity_sold` must never exceed `quantity`; the repositories enforce
//! this with conditional increments, while the ordered checks here give each
//! refusal its specific reason.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

/// Delivery mode of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventMode {
    Virtual,
    Physical,
    Hybrid,
}

impl EventMode {
    /// Whether attendees join through a virtual meeting (drives calendar sync).
    pub fn has_virtual_component(&self) -> bool {
        matches!(self, EventMode::Virtual | EventMode::Hybrid)
    }
}

/// Event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Workshop,
    Talk,
    Career,
    Networking,
    Symposium,
    Training,
    Other,
}

/// An event listing with its tickets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Event {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub mode: EventMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub duration_mins: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_calendar_event_id: Option<String>,
    pub is_published: bool,
    pub is_cancelled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Why a ticket cannot be purchased right now.
///
/// Checks are evaluated in declaration order; the first failing check wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TicketRejection {
    #[error("Ticket is not active")]
    Inactive,

    #[error("Ticket sales have not started yet")]
    SalesNotStarted,

    #[error("Ticket sales have ended")]
    SalesEnded,

    #[error("Ticket is sold out")]
    SoldOut,
}

/// A ticket tier for an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Ticket {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Price in minor currency units; 0 means free.
    pub price_minor: i64,
    pub quantity: i32,
    pub quantity_sold: i32,
    pub sales_start: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_end: Option<DateTime<Utc>>,
    pub is_active: bool,
    /// The implicit ticket created for events listed without tiers.
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// A free ticket completes registration without a payment leg.
    pub fn is_free(&self) -> bool {
        self.price_minor == 0 || self.is_default
    }

    /// Ordered purchasability checks: active, window, quantity.
    pub fn purchasable_at(&self, now: DateTime<Utc>) -> Result<(), TicketRejection> {
        if !self.is_active {
            return Err(TicketRejection::Inactive);
        }

        if self.sales_start > now {
            return Err(TicketRejection::SalesNotStarted);
        }

        if self.sales_end.is_some_and(|end| end < now) {
            return Err(TicketRejection::SalesEnded);
        }

        if self.quantity_sold >= self.quantity {
            return Err(TicketRejection::SoldOut);
        }

        Ok(())
    }
}

/// Immutable record of one claimed ticket unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TicketPurchase {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    /// Unique reference handed to the payment provider for idempotent retry.
    pub ticket_uid: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
    pub is_paid: bool,
    pub checked_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// What the registration endpoint hands back to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum RegistrationOutcome {
    /// Free ticket: the purchase is complete.
    Confirmed { purchase: TicketPurchase },
    /// Paid ticket: the caller must complete checkout externally.
    CheckoutRequired {
        purchase: TicketPurchase,
        checkout_url: String,
    },
}

/// Ticket fields supplied when creating an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateTicketRequest {
    #[validate(length(min = 1, max = 255, message = "Ticket name is required"))]
    pub name: String,

    pub description: Option<String>,

    #[validate(range(min = 0, message = "price_minor must not be negative"))]
    pub price_minor: i64,

    #[validate(range(min = 0, message = "quantity must not be negative"))]
    pub quantity: i32,

    pub sales_start: Option<DateTime<Utc>>,
    pub sales_end: Option<DateTime<Utc>>,
}

/// Request to create an event, optionally with ticket tiers.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateEventRequest {
    #[validate(length(min = 3, max = 320, message = "Title must be 3-320 characters"))]
    pub title: String,

    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,

    pub category: EventCategory,
    pub mode: EventMode,

    #[validate(length(max = 255, message = "Venue is too long"))]
    pub venue: Option<String>,

    pub starts_at: DateTime<Utc>,

    #[validate(range(min = 1, max = 1440, message = "duration_mins must be 1-1440"))]
    pub duration_mins: i32,

    pub external_calendar_event_id: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub tickets: Vec<CreateTicketRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ticket(now: DateTime<Utc>) -> Ticket {
        Ticket {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            name: "General".into(),
            description: None,
            price_minor: 5000,
            quantity: 100,
            quantity_sold: 0,
            sales_start: now - Duration::hours(1),
            sales_end: Some(now + Duration::hours(1)),
            is_active: true,
            is_default: false,
            created_at: now,
        }
    }

    #[test]
    fn test_purchasable_ticket_passes() {
        let now = Utc::now();
        assert_eq!(ticket(now).purchasable_at(now), Ok(()));
    }

    #[test]
    fn test_inactive_wins_over_every_other_check() {
        let now = Utc::now();
        let mut t = ticket(now);
        t.is_active = false;
        t.sales_start = now + Duration::hours(1);
        t.quantity = 0;
        assert_eq!(t.purchasable_at(now), Err(TicketRejection::Inactive));
    }

    #[test]
    fn test_window_checked_before_quantity() {
        let now = Utc::now();
        let mut t = ticket(now);
        t.sales_start = now + Duration::minutes(30);
        t.quantity = 0;
        assert_eq!(t.purchasable_at(now), Err(TicketRejection::SalesNotStarted));

        let mut t = ticket(now);
        t.sales_end = Some(now - Duration::minutes(1));
        t.quantity = 0;
        assert_eq!(t.purchasable_at(now), Err(TicketRejection::SalesEnded));
    }

    #[test]
    fn test_zero_quantity_is_sold_out() {
        let now = Utc::now();
        let mut t = ticket(now);
        t.quantity = 0;
        assert_eq!(t.purchasable_at(now), Err(TicketRejection::SoldOut));
    }

    #[test]
    fn test_exhausted_quantity_is_sold_out() {
        let now = Utc::now();
        let mut t = ticket(now);
        t.quantity_sold = t.quantity;
        assert_eq!(t.purchasable_at(now), Err(TicketRejection::SoldOut));
    }

    #[test]
    fn test_open_ended_sales_window() {
        let now = Utc::now();
        let mut t = ticket(now);
        t.sales_end = None;
        assert_eq!(t.purchasable_at(now + Duration::days(365)), Ok(()));
    }

    #[test]
    fn test_free_ticket_predicate() {
        let now = Utc::now();
        let mut t = ticket(now);
        assert!(!t.is_free());

        t.price_minor = 0;
        assert!(t.is_free());

        t.price_minor = 5000;
        t.is_default = true;
        assert!(t.is_free());
    }

    #[test]
    fn test_virtual_component() {
        assert!(EventMode::Virtual.has_virtual_component());
        assert!(EventMode::Hybrid.has_virtual_component());
        assert!(!EventMode::Physical.has_virtual_component());
    }
}
