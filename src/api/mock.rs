use super::EventApi;
use crate::models::Event;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

/// An in-memory backend used in tests and with `--mock`.
/// Search matches band member names case-insensitively, the same contract as the remote API.
pub struct MockEventApi {
    events: Mutex<Vec<Event>>,
    fail: Mutex<bool>,
}

impl MockEventApi {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events: Mutex::new(events),
            fail: Mutex::new(false),
        }
    }

    /// Make every subsequent call fail until reset.
    pub async fn set_failing(&self, failing: bool) {
        *self.fail.lock().await = failing;
    }

    /// Snapshot of the backend's current events.
    pub async fn stored(&self) -> Vec<Event> {
        self.events.lock().await.clone()
    }

    async fn check_failing(&self, op: &str) -> Result<()> {
        if *self.fail.lock().await {
            return Err(anyhow!("{} failed: mock backend unavailable", op));
        }
        Ok(())
    }
}

impl Default for MockEventApi {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl EventApi for MockEventApi {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        self.check_failing("list events").await?;
        let events = self.events.lock().await.clone();
        info!("MockEventApi: list_events -> {} event(s)", events.len());
        Ok(events)
    }

    async fn search_events(&self, query: &str) -> Result<Vec<Event>> {
        self.check_failing("search events").await?;
        let needle = query.trim().to_lowercase();
        let found: Vec<Event> = self
            .events
            .lock()
            .await
            .iter()
            .filter(|e| e.member_names().any(|n| n.to_lowercase().contains(&needle)))
            .cloned()
            .collect();
        info!("MockEventApi: search '{}' -> {} event(s)", query, found.len());
        Ok(found)
    }

    async fn delete_event(&self, id: i64) -> Result<()> {
        self.check_failing("delete event").await?;
        info!("MockEventApi: delete_event {}", id);
        self.events.lock().await.retain(|e| e.id != id);
        Ok(())
    }

    async fn update_event(&self, event: &Event) -> Result<()> {
        self.check_failing("update event").await?;
        info!("MockEventApi: update_event {} stars={:?}", event.id, event.nb_stars);
        let mut events = self.events.lock().await;
        if let Some(existing) = events.iter_mut().find(|e| e.id == event.id) {
            // the remote only applies the rating and the comment, and ignores nulls
            if event.nb_stars.is_some() {
                existing.nb_stars = event.nb_stars;
            }
            if event.comment.is_some() {
                existing.comment = event.comment.clone();
            }
        }
        Ok(())
    }
}
