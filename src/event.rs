use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Three-way match result market: home win / draw / away win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeLabel {
    Home,
    Draw,
    Away,
}

impl OutcomeLabel {
    /// Canonical ordering for display and storage.
    pub const ALL: [OutcomeLabel; 3] = [OutcomeLabel::Home, OutcomeLabel::Draw, OutcomeLabel::Away];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeLabel::Home => "home",
            OutcomeLabel::Draw => "draw",
            OutcomeLabel::Away => "away",
        }
    }
}

/// One selectable side of the match result market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub label: OutcomeLabel,
    pub team_name: String,
    pub price: f64,
}

impl Outcome {
    pub fn new(label: OutcomeLabel, team_name: impl Into<String>, price: f64) -> Self {
        Self {
            label,
            team_name: team_name.into(),
            price,
        }
    }
}

/// A single upcoming match with its extracted three-way odds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub sport_key: String,
    pub sport_title: String,
    pub commence_time: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    /// At most three outcomes, always in home / draw / away order.
    pub outcomes: Vec<Outcome>,
}

impl Event {
    pub fn display_title(&self) -> String {
        format!("{} - {}", self.home_team, self.away_team)
    }

    pub fn outcome(&self, label: OutcomeLabel) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.label == label)
    }
}

// One bet per event, so identity follows the event id alone.
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Event {}

impl std::hash::Hash for Event {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Raw odds-feed record, one per event. Bookmaker payloads are kept as-is
/// until the h2h prices are extracted.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEvent {
    pub id: String,
    pub sport_key: String,
    pub sport_title: String,
    pub commence_time: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Bookmaker {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub markets: Vec<Market>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Market {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<FeedOutcome>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedOutcome {
    pub name: String,
    pub price: f64,
}

impl FeedEvent {
    /// Normalize the feed record into an `Event` with extracted odds.
    pub fn into_event(self) -> Event {
        let outcomes = extract_outcomes(&self.home_team, &self.away_team, &self.bookmakers);
        Event {
            id: self.id,
            sport_key: self.sport_key,
            sport_title: self.sport_title,
            commence_time: self.commence_time,
            home_team: self.home_team,
            away_team: self.away_team,
            outcomes,
        }
    }
}

/// Pick the home/draw/away prices out of the raw bookmaker payloads.
///
/// Takes the first h2h market that actually carries outcomes, matches
/// outcome names against the team names (the draw side is the literal
/// "draw"), and returns the result in canonical order. Labels the feed
/// never priced are simply absent.
pub fn extract_outcomes(
    home_team: &str,
    away_team: &str,
    bookmakers: &[Bookmaker],
) -> Vec<Outcome> {
    let h2h = bookmakers
        .iter()
        .flat_map(|b| b.markets.iter())
        .find(|m| m.key == "h2h" && !m.outcomes.is_empty());

    let Some(market) = h2h else {
        return Vec::new();
    };

    let mut mapped: HashMap<OutcomeLabel, Outcome> = HashMap::new();
    for raw in &market.outcomes {
        let label = if raw.name == home_team {
            OutcomeLabel::Home
        } else if raw.name == away_team {
            OutcomeLabel::Away
        } else if raw.name.eq_ignore_ascii_case("draw") {
            OutcomeLabel::Draw
        } else {
            continue;
        };
        mapped.insert(label, Outcome::new(label, raw.name.clone(), raw.price));
    }

    OutcomeLabel::ALL
        .iter()
        .filter_map(|label| mapped.remove(label))
        .collect()
}
