use parking_lot::RwLock;
use std::collections::HashMap;
use tokio::sync::broadcast;
use tracing::info;

use crate::bet::Bet;

/// Buffered notifications per subscriber before a slow one starts lagging.
const CHANNEL_CAPACITY: usize = 64;

// Both a map and a vector: the map gives O(1) lookups, the vector keeps
// insertion/update order for the cart. They only ever change together under
// the write lock.
#[derive(Debug, Default)]
struct State {
    order: Vec<String>,
    bets: HashMap<String, Bet>,
}

impl State {
    fn snapshot(&self) -> Vec<Bet> {
        self.order
            .iter()
            .filter_map(|id| self.bets.get(id))
            .cloned()
            .collect()
    }
}

/// Thread-safe source of truth for the pending bet per event.
///
/// Holds at most one bet per event id. Placing a bet for an event that
/// already has one replaces it and moves it to the end of the order, so the
/// cart always lists the most recently touched bets last. Every committed
/// mutation broadcasts a full snapshot on the bets channel and the affected
/// bet on the update channel; each subscriber gets its own ordered stream.
pub struct BetStore {
    state: RwLock<State>,
    bets_tx: broadcast::Sender<Vec<Bet>>,
    update_tx: broadcast::Sender<Bet>,
}

impl BetStore {
    pub fn new() -> Self {
        let (bets_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (update_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(State::default()),
            bets_tx,
            update_tx,
        }
    }

    /// Snapshot of all placed bets in insertion/update order.
    pub fn get_all(&self) -> Vec<Bet> {
        self.state.read().snapshot()
    }

    /// The current bet for an event, if any.
    pub fn get(&self, event_id: &str) -> Option<Bet> {
        self.state.read().bets.get(event_id).cloned()
    }

    /// Insert or replace the bet for its event.
    ///
    /// A replaced bet moves to the end of the order. Subscribers are
    /// notified once the mutation is committed.
    pub fn place(&self, bet: Bet) {
        let mut state = self.state.write();
        let event_id = bet.event.id.clone();

        if state.bets.insert(event_id.clone(), bet.clone()).is_some() {
            if let Some(index) = state.order.iter().position(|id| *id == event_id) {
                let id = state.order.remove(index);
                state.order.push(id);
            }
        } else {
            state.order.push(event_id.clone());
        }

        info!(
            event_id = %event_id,
            outcome = %bet.outcome.label.as_str(),
            price = bet.outcome.price,
            "📝 Bet placed"
        );
        self.publish(&state, bet);
    }

    /// Remove the bet for an event. Silent no-op when absent.
    pub fn remove(&self, event_id: &str) {
        let mut state = self.state.write();
        let Some(bet) = state.bets.remove(event_id) else {
            return;
        };
        if let Some(index) = state.order.iter().position(|id| id == event_id) {
            state.order.remove(index);
        }

        info!(event_id = %event_id, "🗑 Bet removed");
        self.publish(&state, bet);
    }

    /// Subscribe to full-snapshot notifications (one per committed mutation).
    pub fn subscribe_bets(&self) -> broadcast::Receiver<Vec<Bet>> {
        self.bets_tx.subscribe()
    }

    /// Subscribe to single-bet notifications. Carries the placed bet on
    /// `place` and the removed bet on `remove`.
    pub fn subscribe_updates(&self) -> broadcast::Receiver<Bet> {
        self.update_tx.subscribe()
    }

    // Publishes while the write lock is still held so notifications go out
    // in commit order. Sends never block; no receivers is fine.
    fn publish(&self, state: &State, bet: Bet) {
        let _ = self.bets_tx.send(state.snapshot());
        let _ = self.update_tx.send(bet);
    }
}

impl Default for BetStore {
    fn default() -> Self {
        Self::new()
    }
}
