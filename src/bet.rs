use serde::{Deserialize, Serialize};

use crate::event::{Event, Outcome};

/// A chosen outcome for a single event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bet {
    pub event: Event,
    pub outcome: Outcome,
}

impl Bet {
    pub fn new(event: Event, outcome: Outcome) -> Self {
        Self { event, outcome }
    }

    pub fn event_id(&self) -> &str {
        &self.event.id
    }
}

// There can be only one bet per event, so identity and comparison are based
// on the event id; the attached outcome does not participate.
impl PartialEq for Bet {
    fn eq(&self, other: &Self) -> bool {
        self.event.id == other.event.id
    }
}

impl Eq for Bet {}

impl std::hash::Hash for Bet {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.event.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::OutcomeLabel;
    use chrono::Utc;

    fn event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            sport_key: "soccer_turkey_super_league".to_string(),
            sport_title: "Super League".to_string(),
            commence_time: Utc::now(),
            home_team: "Lakeside SK".to_string(),
            away_team: "Rivertown FC".to_string(),
            outcomes: vec![
                Outcome::new(OutcomeLabel::Home, "Lakeside SK", 1.5),
                Outcome::new(OutcomeLabel::Draw, "Draw", 3.0),
                Outcome::new(OutcomeLabel::Away, "Rivertown FC", 2.5),
            ],
        }
    }

    #[test]
    fn bets_on_the_same_event_are_equal_regardless_of_outcome() {
        let e = event("evt-1");
        let home = Bet::new(e.clone(), e.outcomes[0].clone());
        let draw = Bet::new(e.clone(), e.outcomes[1].clone());

        assert_eq!(home, draw);
    }

    #[test]
    fn bets_on_different_events_are_distinct() {
        let a = event("evt-1");
        let b = event("evt-2");
        let bet_a = Bet::new(a.clone(), a.outcomes[0].clone());
        let bet_b = Bet::new(b.clone(), b.outcomes[0].clone());

        assert_ne!(bet_a, bet_b);
    }
}
