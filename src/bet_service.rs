use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::warn;

use crate::analytics::{AnalyticsAttributes, AnalyticsEvent, AnalyticsHub};
use crate::bet::Bet;
use crate::bet_store::BetStore;

/// Cart-facing layer over the bet store.
///
/// Delegates reads and mutations to the store, reports cart actions to
/// analytics, and keeps a running total price (the product of every placed
/// bet's odds) that always reflects the most recently published bet set.
/// Must be constructed inside a tokio runtime; the total is recomputed by a
/// background task subscribed to the store's snapshot channel.
pub struct BetService {
    store: Arc<BetStore>,
    analytics: Arc<AnalyticsHub>,
    total_rx: watch::Receiver<f64>,
}

impl BetService {
    pub fn new(store: Arc<BetStore>, analytics: Arc<AnalyticsHub>) -> Self {
        let (total_tx, total_rx) = watch::channel(total_of(&store.get_all()));

        let mut bets_rx = store.subscribe_bets();
        // Weak handle only: the task must not keep the store (and with it
        // the snapshot channel) alive on its own.
        let weak_store = Arc::downgrade(&store);
        tokio::spawn(async move {
            loop {
                match bets_rx.recv().await {
                    Ok(bets) => {
                        let _ = total_tx.send(total_of(&bets));
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "total price recomputation lagged, resyncing");
                        let Some(store) = weak_store.upgrade() else {
                            break;
                        };
                        let _ = total_tx.send(total_of(&store.get_all()));
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Self {
            store,
            analytics,
            total_rx,
        }
    }

    pub fn get_all_bets(&self) -> Vec<Bet> {
        self.store.get_all()
    }

    pub fn get_bet_for_event(&self, event_id: &str) -> Option<Bet> {
        self.store.get(event_id)
    }

    /// Place (or replace) a bet and report the cart addition.
    pub fn place_bet(&self, bet: Bet) {
        let mut attributes = AnalyticsAttributes::new();
        attributes.insert("id".to_string(), bet.event.id.clone());
        attributes.insert("name".to_string(), bet.event.display_title());
        attributes.insert("value".to_string(), bet.outcome.label.as_str().to_string());

        self.store.place(bet);
        self.analytics.log_event(AnalyticsEvent::CartAdd, attributes);
    }

    /// Remove the bet for an event and report the cart removal.
    pub fn remove_bet_for_event(&self, event_id: &str) {
        let mut attributes = AnalyticsAttributes::new();
        attributes.insert("id".to_string(), event_id.to_string());

        self.store.remove(event_id);
        self.analytics
            .log_event(AnalyticsEvent::CartRemove, attributes);
    }

    /// Current combined payout multiplier. 0 when the cart is empty.
    pub fn total_price(&self) -> f64 {
        *self.total_rx.borrow()
    }

    /// Watch the running total; the receiver always holds the latest value.
    pub fn subscribe_total_price(&self) -> watch::Receiver<f64> {
        self.total_rx.clone()
    }

    pub fn subscribe_bets(&self) -> broadcast::Receiver<Vec<Bet>> {
        self.store.subscribe_bets()
    }

    pub fn subscribe_updates(&self) -> broadcast::Receiver<Bet> {
        self.store.subscribe_updates()
    }
}

// Empty product is 0, not 1: an empty cart has nothing staked.
fn total_of(bets: &[Bet]) -> f64 {
    if bets.is_empty() {
        return 0.0;
    }
    bets.iter().map(|b| b.outcome.price).product()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::AnalyticsProvider;
    use crate::event::{Event, Outcome, OutcomeLabel};
    use chrono::Utc;
    use parking_lot::Mutex;
    use std::time::Duration;
    use tokio::time::timeout;

    fn bet_with_price(id: &str, price: f64) -> Bet {
        let event = Event {
            id: id.to_string(),
            sport_key: "soccer_turkey_super_league".to_string(),
            sport_title: "Super League".to_string(),
            commence_time: Utc::now(),
            home_team: "Lakeside SK".to_string(),
            away_team: "Rivertown FC".to_string(),
            outcomes: vec![Outcome::new(OutcomeLabel::Home, "Lakeside SK", price)],
        };
        let outcome = event.outcomes[0].clone();
        Bet::new(event, outcome)
    }

    struct Recording {
        seen: Mutex<Vec<(AnalyticsEvent, AnalyticsAttributes)>>,
    }

    impl Recording {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl AnalyticsProvider for Recording {
        fn log_event(&self, event: AnalyticsEvent, attributes: &AnalyticsAttributes) {
            self.seen.lock().push((event, attributes.clone()));
        }
    }

    fn service_with_recorder() -> (BetService, Arc<Recording>) {
        let recorder = Recording::new();
        let hub = Arc::new(AnalyticsHub::new(vec![recorder.clone()]));
        let service = BetService::new(Arc::new(BetStore::new()), hub);
        (service, recorder)
    }

    async fn wait_for_total(service: &BetService, expected: f64) {
        let mut rx = service.subscribe_total_price();
        timeout(Duration::from_secs(1), async {
            while (*rx.borrow() - expected).abs() > 1e-9 {
                rx.changed().await.unwrap();
            }
        })
        .await
        .unwrap_or_else(|_| {
            panic!(
                "total never reached {expected}, last value {}",
                service.total_price()
            )
        });
    }

    #[tokio::test]
    async fn empty_cart_total_is_zero() {
        let (service, _) = service_with_recorder();
        assert_eq!(service.total_price(), 0.0);
    }

    #[tokio::test]
    async fn total_is_the_product_of_all_placed_odds() {
        let (service, _) = service_with_recorder();
        service.place_bet(bet_with_price("a", 1.5));
        service.place_bet(bet_with_price("b", 2.0));
        service.place_bet(bet_with_price("c", 2.5));

        wait_for_total(&service, 7.5).await;
    }

    #[tokio::test]
    async fn total_recomputes_after_removal_and_empties_back_to_zero() {
        let (service, _) = service_with_recorder();
        service.place_bet(bet_with_price("a", 1.5));
        service.place_bet(bet_with_price("b", 2.0));
        service.place_bet(bet_with_price("c", 2.5));
        wait_for_total(&service, 7.5).await;

        service.remove_bet_for_event("b");
        wait_for_total(&service, 3.75).await;

        service.remove_bet_for_event("a");
        service.remove_bet_for_event("c");
        wait_for_total(&service, 0.0).await;
    }

    #[tokio::test]
    async fn initial_total_reflects_preexisting_store_contents() {
        let store = Arc::new(BetStore::new());
        store.place(bet_with_price("a", 2.0));
        store.place(bet_with_price("b", 3.0));

        let hub = Arc::new(AnalyticsHub::new(Vec::new()));
        let service = BetService::new(store, hub);
        assert_eq!(service.total_price(), 6.0);
    }

    #[tokio::test]
    async fn cart_actions_reach_analytics_with_event_details() {
        let (service, recorder) = service_with_recorder();

        service.place_bet(bet_with_price("evt-1", 1.5));
        service.remove_bet_for_event("evt-1");

        let seen = recorder.seen.lock();
        assert_eq!(seen.len(), 2);

        let (event, attributes) = &seen[0];
        assert_eq!(event.kind(), "cart_add");
        assert_eq!(attributes.get("id").unwrap(), "evt-1");
        assert_eq!(attributes.get("name").unwrap(), "Lakeside SK - Rivertown FC");
        assert_eq!(attributes.get("value").unwrap(), "home");

        let (event, attributes) = &seen[1];
        assert_eq!(event.kind(), "cart_remove");
        assert_eq!(attributes.get("id").unwrap(), "evt-1");
    }

    #[tokio::test]
    async fn reads_delegate_to_the_store() {
        let (service, _) = service_with_recorder();
        service.place_bet(bet_with_price("a", 1.5));
        service.place_bet(bet_with_price("b", 2.0));

        assert_eq!(service.get_all_bets().len(), 2);
        let placed = service.get_bet_for_event("a").unwrap();
        assert_eq!(placed.outcome.price, 1.5);
        assert!(service.get_bet_for_event("missing").is_none());
    }

    #[tokio::test]
    async fn snapshot_subscribers_see_service_mutations() {
        let (service, _) = service_with_recorder();
        let mut bets_rx = service.subscribe_bets();

        service.place_bet(bet_with_price("a", 1.5));

        let snapshot = timeout(Duration::from_secs(1), bets_rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].event.id, "a");
    }
}
