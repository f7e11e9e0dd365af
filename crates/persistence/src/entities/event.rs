//! Event, ticket and purchase entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::event::{
    Event, EventCategory, EventMode, Ticket, TicketPurchase,
};
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for event_mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "event_mode", rename_all = "lowercase")]
pub enum EventModeDb {
    Virtual,
    Physical,
    Hybrid,
}

impl From<EventModeDb> for EventMode {
    fn from(db: EventModeDb) -> Self {
        match db {
            EventModeDb::Virtual => EventMode::Virtual,
            EventModeDb::Physical => EventMode::Physical,
            EventModeDb::Hybrid => EventMode::Hybrid,
        }
    }
}

impl From<EventMode> for EventModeDb {
    fn from(mode: EventMode) -> Self {
        match mode {
            EventMode::Virtual => EventModeDb::Virtual,
            EventMode::Physical => EventModeDb::Physical,
            EventMode::Hybrid => EventModeDb::Hybrid,
        }
    }
}

/// Database enum for event_category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "event_category", rename_all = "lowercase")]
pub enum EventCategoryDb {
    Workshop,
    Talk,
    Career,
    Networking,
    Symposium,
    Training,
    Other,
}

impl From<EventCategoryDb> for EventCategory {
    fn from(db: EventCategoryDb) -> Self {
        match db {
            EventCategoryDb::Workshop => EventCategory::Workshop,
            EventCategoryDb::Talk => EventCategory::Talk,
            EventCategoryDb::Career => EventCategory::Career,
            EventCategoryDb::Networking => EventCategory::Networking,
            EventCategoryDb::Symposium => EventCategory::Symposium,
            EventCategoryDb::Training => EventCategory::Training,
            EventCategoryDb::Other => EventCategory::Other,
        }
    }
}

impl From<EventCategory> for EventCategoryDb {
    fn from(category: EventCategory) -> Self {
        match category {
            EventCategory::Workshop => EventCategoryDb::Workshop,
            EventCategory::Talk => EventCategoryDb::Talk,
            EventCategory::Career => EventCategoryDb::Career,
            EventCategory::Networking => EventCategoryDb::Networking,
            EventCategory::Symposium => EventCategoryDb::Symposium,
            EventCategory::Training => EventCategoryDb::Training,
            EventCategory::Other => EventCategoryDb::Other,
        }
    }
}

/// Database row mapping for the events table.
#[derive(Debug, Clone, FromRow)]
pub struct EventEntity {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: EventCategoryDb,
    pub mode: EventModeDb,
    pub venue: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub duration_mins: i32,
    pub external_calendar_event_id: Option<String>,
    pub is_published: bool,
    pub is_cancelled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventEntity> for Event {
    fn from(entity: EventEntity) -> Self {
        Self {
            id: entity.id,
            creator_id: entity.creator_id,
            title: entity.title,
            description: entity.description,
            category: entity.category.into(),
            mode: entity.mode.into(),
            venue: entity.venue,
            starts_at: entity.starts_at,
            duration_mins: entity.duration_mins,
            external_calendar_event_id: entity.external_calendar_event_id,
            is_published: entity.is_published,
            is_cancelled: entity.is_cancelled,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the tickets table.
#[derive(Debug, Clone, FromRow)]
pub struct TicketEntity {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_minor: i64,
    pub quantity: i32,
    pub quantity_sold: i32,
    pub sales_start: DateTime<Utc>,
    pub sales_end: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl From<TicketEntity> for Ticket {
    fn from(entity: TicketEntity) -> Self {
        Self {
            id: entity.id,
            event_id: entity.event_id,
            name: entity.name,
            description: entity.description,
            price_minor: entity.price_minor,
            quantity: entity.quantity,
            quantity_sold: entity.quantity_sold,
            sales_start: entity.sales_start,
            sales_end: entity.sales_end,
            is_active: entity.is_active,
            is_default: entity.is_default,
            created_at: entity.created_at,
        }
    }
}

/// Database row mapping for the ticket_purchases table.
#[derive(Debug, Clone, FromRow)]
pub struct TicketPurchaseEntity {
    pub id: Uuid,
    pub ticket_id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub ticket_uid: Uuid,
    pub payment_reference: Option<String>,
    pub is_paid: bool,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<TicketPurchaseEntity> for TicketPurchase {
    fn from(entity: TicketPurchaseEntity) -> Self {
        Self {
            id: entity.id,
            ticket_id: entity.ticket_id,
            user_id: entity.user_id,
            email: entity.email,
            ticket_uid: entity.ticket_uid,
            payment_reference: entity.payment_reference,
            is_paid: entity.is_paid,
            checked_in: entity.checked_in,
            checked_in_at: entity.checked_in_at,
            created_at: entity.created_at,
        }
    }
}
