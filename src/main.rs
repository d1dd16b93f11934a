use anyhow::{Context, Result};
use betcart::{
    analytics::{AnalyticsHub, LogAnalytics},
    bet_service::BetService,
    bet_store::BetStore,
    odds_client::OddsClient,
};
use std::sync::Arc;
use tracing::{info, warn, Level};

const SPORT_KEY: &str = "soccer_turkey_super_league";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Starting betcart odds browser");

    // Load environment variables
    dotenv::dotenv().ok();

    let api_key = std::env::var("ODDS_API_KEY")
        .context("ODDS_API_KEY not set - cannot reach the odds feed")?;

    let mut odds_client = OddsClient::new(api_key);
    if let Ok(base_url) = std::env::var("ODDS_API_BASE_URL") {
        odds_client = odds_client.with_base_url(base_url);
    }

    // Wire the cart core explicitly: store, analytics, service
    let bet_store = Arc::new(BetStore::new());
    let analytics = Arc::new(AnalyticsHub::new(vec![Arc::new(LogAnalytics)]));
    let bet_service = BetService::new(bet_store, analytics);

    // Fetch the current odds board
    let events = odds_client
        .fetch_events(SPORT_KEY)
        .await
        .context("Failed to fetch the odds board")?;

    if events.is_empty() {
        warn!("⚠️ No upcoming events returned for {}", SPORT_KEY);
        return Ok(());
    }

    info!("📋 {} upcoming events for {}", events.len(), SPORT_KEY);
    for event in &events {
        let odds: Vec<String> = event
            .outcomes
            .iter()
            .map(|o| format!("{} @ {:.2}", o.label.as_str(), o.price))
            .collect();
        info!(
            "  {} | {} | {}",
            event.commence_time.format("%Y-%m-%d %H:%M"),
            event.display_title(),
            if odds.is_empty() {
                "no h2h prices".to_string()
            } else {
                odds.join(", ")
            }
        );
    }

    info!(
        "🛒 Cart is empty, total price: {:.2}",
        bet_service.total_price()
    );

    Ok(())
}
