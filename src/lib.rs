// Core modules
pub mod analytics;
pub mod bet;
pub mod bet_service;
pub mod bet_store;
pub mod error;
pub mod event;
pub mod odds_client;

// Re-exports
pub use analytics::{AnalyticsAttributes, AnalyticsEvent, AnalyticsHub, AnalyticsProvider, LogAnalytics};
pub use bet::Bet;
pub use bet_service::BetService;
pub use bet_store::BetStore;
pub use error::FeedError;
pub use event::{extract_outcomes, Event, Outcome, OutcomeLabel};
pub use odds_client::OddsClient;
