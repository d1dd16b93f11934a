use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use tracing::info;

use crate::error::FeedError;
use crate::event::{Event, FeedEvent};

const DEFAULT_BASE_URL: &str = "https://api.the-odds-api.com";

/// Odds feed REST client.
///
/// Fetches upcoming events with their h2h bookmaker prices. No retry or
/// backoff; failures surface to the caller.
#[derive(Clone)]
pub struct OddsClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl OddsClient {
    pub fn new(api_key: String) -> Self {
        // Pooled HTTP client with timeouts, built once
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http_client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Fetch upcoming events for a sport, decimal h2h odds already extracted.
    pub async fn fetch_events(&self, sport_key: &str) -> Result<Vec<Event>, FeedError> {
        let url = format!("{}/v4/sports/{}/odds/", self.base_url, sport_key);
        let commence_time_from = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", "eu"),
                ("markets", "h2h"),
                ("oddsFormat", "decimal"),
                ("dateFormat", "iso"),
                ("commenceTimeFrom", commence_time_from.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let body = response.text().await?;
        let feed: Vec<FeedEvent> = serde_json::from_str(&body)?;

        let events: Vec<Event> = feed.into_iter().map(FeedEvent::into_event).collect();
        info!(sport_key, count = events.len(), "Fetched odds feed");
        Ok(events)
    }
}
