use super::EventApi;
use crate::config::Config;
use crate::models::Event;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use url::Url;

/// Events backend reached over HTTP.
///
/// All endpoints hang off `base`:
/// `GET {base}/`, `GET {base}/search/{query}`, `DELETE {base}/{id}`, `PUT {base}/{id}`.
pub struct HttpEventApi {
    client: Client,
    base: Url,
}

impl HttpEventApi {
    pub fn new(base: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let base = Url::parse(base).with_context(|| format!("parsing api base '{}'", base))?;
        if base.cannot_be_a_base() {
            return Err(anyhow!("api base '{}' cannot be used as a base URL", base));
        }
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, base })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(
            &cfg.api_base,
            Duration::from_secs(cfg.request_timeout_secs),
            &cfg.user_agent,
        )
    }

    /// Build `{base}/{segments...}`, percent-encoding each segment.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| anyhow!("api base '{}' cannot be used as a base URL", self.base))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    pub fn list_url(&self) -> Result<Url> {
        // the list endpoint is mapped with a trailing slash
        self.endpoint(&[""])
    }

    pub fn search_url(&self, query: &str) -> Result<Url> {
        let query = query.trim();
        // URL normalisation drops `.` and `..` segments, even percent-encoded ones
        if query == "." || query == ".." {
            return Err(anyhow!("search query '{}' cannot be sent as a path segment", query));
        }
        self.endpoint(&["search", query])
    }

    pub fn event_url(&self, id: i64) -> Result<Url> {
        self.endpoint(&[&id.to_string()])
    }
}

/// Turn a non-success response into an error naming the operation.
async fn check(op: &str, resp: Response) -> Result<Response> {
    let status = resp.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = resp
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());
        warn!("{} rate limited, retry_after={:?}", op, retry_after);
        return Err(anyhow!("{} failed: rate_limited: retry_after={:?}", op, retry_after));
    }
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        return Err(anyhow!("{} failed: {} => {}", op, status, txt));
    }
    Ok(resp)
}

#[async_trait]
impl EventApi for HttpEventApi {
    fn name(&self) -> &str {
        "http"
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let url = self.list_url()?;
        debug!("GET {}", url);
        let resp = self.client.get(url).header(ACCEPT, "application/json").send().await?;
        let events: Vec<Event> = check("list events", resp)
            .await?
            .json()
            .await
            .context("decoding event list")?;
        debug!("list events returned {} event(s)", events.len());
        Ok(events)
    }

    async fn search_events(&self, query: &str) -> Result<Vec<Event>> {
        if query.trim().is_empty() {
            return Err(anyhow!("search query must not be empty"));
        }
        let url = self.search_url(query)?;
        debug!("GET {}", url);
        let resp = self.client.get(url).header(ACCEPT, "application/json").send().await?;
        let events: Vec<Event> = check("search events", resp)
            .await?
            .json()
            .await
            .context("decoding search results")?;
        debug!("search '{}' returned {} event(s)", query.trim(), events.len());
        Ok(events)
    }

    async fn delete_event(&self, id: i64) -> Result<()> {
        let url = self.event_url(id)?;
        debug!("DELETE {}", url);
        let resp = self.client.delete(url).send().await?;
        check("delete event", resp).await?;
        Ok(())
    }

    async fn update_event(&self, event: &Event) -> Result<()> {
        let url = self.event_url(event.id)?;
        debug!("PUT {} (nbStars={:?})", url, event.nb_stars);
        let resp = self.client.put(url).json(event).send().await?;
        check("update event", resp).await?;
        Ok(())
    }
}
