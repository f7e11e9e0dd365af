//! Event, ticket and purchase repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::event::{EventCategoryDb, EventModeDb};
use crate::entities::{EventEntity, TicketEntity, TicketPurchaseEntity};
use crate::metrics::QueryTimer;

const EVENT_COLUMNS: &str = "id, creator_id, title, description, category, mode, venue, \
     starts_at, duration_mins, external_calendar_event_id, is_published, is_cancelled, \
     created_at, updated_at";

const TICKET_COLUMNS: &str = "id, event_id, name, description, price_minor, quantity, \
     quantity_sold, sales_start, sales_end, is_active, is_default, created_at";

const PURCHASE_COLUMNS: &str = "id, ticket_id, user_id, email, ticket_uid, payment_reference, \
     is_paid, checked_in, checked_in_at, created_at";

/// Fields for inserting a new event row.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub creator_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: EventCategoryDb,
    pub mode: EventModeDb,
    pub venue: Option<String>,
    pub starts_at: chrono::DateTime<chrono::Utc>,
    pub duration_mins: i32,
    pub external_calendar_event_id: Option<String>,
}

/// Fields for inserting a ticket row.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub name: String,
    pub description: Option<String>,
    pub price_minor: i64,
    pub quantity: i32,
    pub sales_start: Option<chrono::DateTime<chrono::Utc>>,
    pub sales_end: Option<chrono::DateTime<chrono::Utc>>,
    pub is_default: bool,
}

/// Repository for events, tickets and ticket purchases.
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an event with its ticket tiers in one transaction.
    ///
    /// An event listed without tiers gets a single default free ticket so
    /// registration always has something to claim.
    pub async fn create_with_tickets(
        &self,
        event: NewEvent,
        tickets: Vec<NewTicket>,
    ) -> Result<(EventEntity, Vec<TicketEntity>), sqlx::Error> {
        let timer = QueryTimer::new("create_event_with_tickets");
        let mut tx = self.pool.begin().await?;

        let event_row = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            INSERT INTO events
                (creator_id, title, description, category, mode, venue, starts_at,
                 duration_mins, external_calendar_event_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event.creator_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.category)
        .bind(event.mode)
        .bind(&event.venue)
        .bind(event.starts_at)
        .bind(event.duration_mins)
        .bind(&event.external_calendar_event_id)
        .fetch_one(&mut *tx)
        .await?;

        let tickets = if tickets.is_empty() {
            vec![NewTicket {
                name: "Free".to_string(),
                description: Some("Standard".to_string()),
                price_minor: 0,
                quantity: i32::MAX,
                sales_start: None,
                sales_end: None,
                is_default: true,
            }]
        } else {
            tickets
        };

        let mut ticket_rows = Vec::with_capacity(tickets.len());
        for ticket in &tickets {
            let row = sqlx::query_as::<_, TicketEntity>(&format!(
                r#"
                INSERT INTO tickets
                    (event_id, name, description, price_minor, quantity,
                     sales_start, sales_end, is_default)
                VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()), $7, $8)
                RETURNING {TICKET_COLUMNS}
                "#
            ))
            .bind(event_row.id)
            .bind(&ticket.name)
            .bind(&ticket.description)
            .bind(ticket.price_minor)
            .bind(ticket.quantity)
            .bind(ticket.sales_start)
            .bind(ticket.sales_end)
            .bind(ticket.is_default)
            .fetch_one(&mut *tx)
            .await?;
            ticket_rows.push(row);
        }

        tx.commit().await?;
        timer.record();
        Ok((event_row, ticket_rows))
    }

    /// Find an event by ID.
    pub async fn find_event_by_id(&self, id: Uuid) -> Result<Option<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_event_by_id");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List published, non-cancelled events, soonest first.
    pub async fn list_published(&self) -> Result<Vec<EventEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_published_events");
        let result = sqlx::query_as::<_, EventEntity>(&format!(
            r#"
            SELECT {EVENT_COLUMNS} FROM events
            WHERE is_published = true AND is_cancelled = false
            ORDER BY starts_at ASC
            "#
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Publish an event.
    pub async fn publish(&self, id: Uuid, creator_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("publish_event");
        let result = sqlx::query(
            r#"
            UPDATE events
            SET is_published = true, updated_at = NOW()
            WHERE id = $1 AND creator_id = $2 AND is_cancelled = false
            "#,
        )
        .bind(id)
        .bind(creator_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Find a ticket by ID.
    pub async fn find_ticket_by_id(&self, id: Uuid) -> Result<Option<TicketEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_ticket_by_id");
        let result = sqlx::query_as::<_, TicketEntity>(&format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Claim one unit: conditional increment guarded against oversell.
    ///
    /// Returns false when the ticket is inactive or exhausted, whichever
    /// concurrent claim got there first.
    pub async fn claim_ticket_unit(&self, ticket_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("claim_ticket_unit");
        let result = sqlx::query(
            r#"
            UPDATE tickets
            SET quantity_sold = quantity_sold + 1
            WHERE id = $1 AND is_active = true AND quantity_sold < quantity
            "#,
        )
        .bind(ticket_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected() > 0)
    }

    /// Record a purchase claim; unpaid until the free or payment path
    /// completes it.
    pub async fn create_purchase(
        &self,
        ticket_id: Uuid,
        user_id: Uuid,
        email: &str,
    ) -> Result<TicketPurchaseEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_ticket_purchase");
        let result = sqlx::query_as::<_, TicketPurchaseEntity>(&format!(
            r#"
            INSERT INTO ticket_purchases (ticket_id, user_id, email)
            VALUES ($1, $2, $3)
            RETURNING {PURCHASE_COLUMNS}
            "#
        ))
        .bind(ticket_id)
        .bind(user_id)
        .bind(email)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a purchase by its unique UID (the payment reference).
    pub async fn find_purchase_by_uid(
        &self,
        ticket_uid: Uuid,
    ) -> Result<Option<TicketPurchaseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_purchase_by_uid");
        let result = sqlx::query_as::<_, TicketPurchaseEntity>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM ticket_purchases WHERE ticket_uid = $1"
        ))
        .bind(ticket_uid)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark a purchase paid, stamping the provider reference.
    pub async fn mark_purchase_paid(
        &self,
        id: Uuid,
        payment_reference: Option<&str>,
    ) -> Result<TicketPurchaseEntity, sqlx::Error> {
        let timer = QueryTimer::new("mark_purchase_paid");
        let result = sqlx::query_as::<_, TicketPurchaseEntity>(&format!(
            r#"
            UPDATE ticket_purchases
            SET is_paid = true, payment_reference = COALESCE($2, payment_reference)
            WHERE id = $1
            RETURNING {PURCHASE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(payment_reference)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Emails of everyone holding a paid ticket for an event.
    pub async fn paid_attendee_emails(&self, event_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
        let timer = QueryTimer::new("paid_attendee_emails");
        let result = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT p.email
            FROM ticket_purchases p
            JOIN tickets t ON p.ticket_id = t.id
            WHERE t.event_id = $1 AND p.is_paid = true
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
