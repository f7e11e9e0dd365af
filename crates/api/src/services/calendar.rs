//! Calendar service for syncing attendees to an external calendar event.
//!
//! Strictly best-effort: the purchase has already succeeded by the time
//! this runs, so failures are logged and swallowed, never raised.

use std::sync::Arc;
use tracing::warn;

use crate::config::CalendarConfig;

/// Calendar service for attendee sync.
#[derive(Clone)]
pub struct CalendarService {
    config: Arc<CalendarConfig>,
    client: reqwest::Client,
}

impl CalendarService {
    pub fn new(config: CalendarConfig) -> Self {
        Self {
            config: Arc::new(config),
            client: reqwest::Client::new(),
        }
    }

    /// Patch the attendee list of an external calendar event.
    pub async fn add_attendees(&self, external_event_id: &str, emails: &[String]) {
        if !self.config.enabled || self.config.api_url.is_empty() {
            return;
        }

        let body = serde_json::json!({
            "attendees": emails.iter().map(|e| serde_json::json!({ "email": e })).collect::<Vec<_>>(),
        });

        let result = self
            .client
            .patch(format!(
                "{}/events/{}/attendees",
                self.config.api_url, external_event_id
            ))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await;

        match result {
            Ok(response) if !response.status().is_success() => {
                warn!(
                    external_event_id,
                    status = %response.status(),
                    "Calendar sync failed"
                );
            }
            Err(e) => {
                warn!(external_event_id, error = %e, "Calendar sync failed");
            }
            Ok(_) => {}
        }
    }
}
