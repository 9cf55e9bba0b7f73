use crate::api::EventApi;
use crate::models::{validate_stars, Event};
use anyhow::{anyhow, Result};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Reverts a local edit when the backend rejects it.
type Undo = Box<dyn FnOnce(&mut Event) + Send>;

/// In-memory list of events backing the on-screen view.
///
/// The list is only changed after the backend accepted the corresponding call,
/// except for rating/comment edits, which are applied first and rolled back if
/// the update is rejected.
pub struct EventsViewModel {
    api: Arc<dyn EventApi>,
    events: Vec<Event>,
    search_query: String,
}

impl EventsViewModel {
    pub fn new(api: Arc<dyn EventApi>) -> Self {
        Self {
            api,
            events: Vec::new(),
            search_query: String::new(),
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn find(&self, id: i64) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Load every event, replacing the current list.
    pub async fn activate(&mut self) -> Result<&[Event]> {
        let events = self.api.list_events().await?;
        info!("loaded {} event(s) from {}", events.len(), self.api.name());
        self.events = events;
        Ok(&self.events)
    }

    /// Replace the list with the backend's matches for the current query.
    /// A blank query is a no-op and returns `Ok(false)`.
    pub async fn search(&mut self) -> Result<bool> {
        let query = self.search_query.trim();
        if query.is_empty() {
            debug!("search skipped: empty query");
            return Ok(false);
        }
        match self.api.search_events(query).await {
            Ok(found) => {
                info!("search '{}' matched {} event(s)", query, found.len());
                self.events.clear();
                self.events.extend(found);
                Ok(true)
            }
            Err(e) => {
                error!("search '{}' failed: {:#}", query, e);
                Err(e)
            }
        }
    }

    /// Clear the query and reload everything.
    pub async fn show_all(&mut self) -> Result<&[Event]> {
        self.search_query.clear();
        self.activate().await
    }

    /// Delete on the backend, then drop the event from the list.
    pub async fn delete_event(&mut self, id: i64) -> Result<()> {
        self.api.delete_event(id).await?;
        match self.events.iter().position(|e| e.id == id) {
            Some(index) => {
                self.events.remove(index);
                info!("deleted event {}", id);
            }
            None => debug!("deleted event {} was not in the list", id),
        }
        Ok(())
    }

    /// Set the rating of a listed event and push it to the backend.
    pub async fn update_stars(&mut self, id: i64, stars: i32) -> Result<()> {
        validate_stars(stars)?;
        self.edit_and_push(id, |e| {
            let previous = e.nb_stars;
            e.nb_stars = Some(stars);
            let undo: Undo = Box::new(move |e: &mut Event| e.nb_stars = previous);
            undo
        })
        .await?;
        info!("event {} rated {} star(s)", id, stars);
        Ok(())
    }

    /// Set the comment of a listed event and push it to the backend.
    pub async fn update_comment(&mut self, id: i64, comment: &str) -> Result<()> {
        let comment = comment.to_string();
        self.edit_and_push(id, move |e| {
            let previous = e.comment.replace(comment);
            let undo: Undo = Box::new(move |e: &mut Event| e.comment = previous);
            undo
        })
        .await?;
        info!("event {} comment updated", id);
        Ok(())
    }

    /// Apply `edit` to the listed event, send it, and undo the edit if the backend refuses.
    async fn edit_and_push<F>(&mut self, id: i64, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Event) -> Undo,
    {
        let index = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| anyhow!("event {} is not in the list", id))?;
        let undo = edit(&mut self.events[index]);
        let snapshot = self.events[index].clone();
        if let Err(e) = self.api.update_event(&snapshot).await {
            error!("update of event {} failed: {:#}", id, e);
            undo(&mut self.events[index]);
            return Err(e);
        }
        Ok(())
    }
}
