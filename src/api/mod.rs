pub mod http;
pub mod mock;

use crate::models::Event;
use anyhow::Result;

/// EventApi trait: the operations the view-model needs from the events backend.
/// Implementations: http::HttpEventApi and mock::MockEventApi.
#[async_trait::async_trait]
pub trait EventApi: Send + Sync {
    /// Fetch every event.
    async fn list_events(&self) -> Result<Vec<Event>>;

    /// Fetch the events matching a free-text query. The backend decides what matches.
    async fn search_events(&self, query: &str) -> Result<Vec<Event>>;

    /// Delete the event with the given id.
    async fn delete_event(&self, id: i64) -> Result<()>;

    /// Send the whole event back; the backend applies its rating and comment.
    async fn update_event(&self, event: &Event) -> Result<()>;

    /// Return the implementation's name (for logging)
    fn name(&self) -> &str;
}
