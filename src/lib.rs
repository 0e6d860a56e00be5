//! Normalization, aggregation and scoring engine for the nightly sports
//! slate. Heterogeneous, partially-missing upstream records become a small
//! set of stable UI-ready entities: ranked [`Game`]s with a watchability
//! score, [`TeamDetail`] and [`PlayerDetail`] aggregates, and a daily
//! pick-the-winner [`Challenge`].
//!
//! Every operation recomputes from a fresh upstream fetch and returns either
//! a payload or a typed error — nothing here panics past its own boundary,
//! and upstream shape drift degrades to absent fields rather than failures.

pub mod challenge;
pub mod player;
pub mod roster;
pub mod score;
pub mod sport;
pub mod storage;
pub mod team;

pub use challenge::{Challenge, ChallengeOption, ChallengePhase, Side};
pub use league_api::Sport;
pub use league_api::client::LeagueApi;
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, PickStats, UserSettings};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the upstream wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    #[default]
    Scheduled,
    InProgress,
    Final,
}

impl GameStatus {
    /// Pattern-match an upstream status name. Upstream names drift
    /// ("STATUS_FINAL", "STATUS_FINAL_OT", "post"), so this matches on
    /// fragments rather than exact values.
    pub fn from_name(name: &str) -> GameStatus {
        let name = name.to_lowercase();
        if name.contains("final") || name.contains("post") {
            GameStatus::Final
        } else if name.is_empty() || name.contains("sched") || name.contains("pre") {
            GameStatus::Scheduled
        } else {
            GameStatus::InProgress
        }
    }
}

/// One team as seen inside a game or roster context.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub abbreviation: String,
    pub name: String,
    pub logo: Option<String>,
    pub record: Option<String>, // "6-2"
    pub location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlayoffImpact {
    High,
    Medium,
    Low,
}

/// Qualitative tags attached to a game. Only playoff impact is computed
/// today; the other slots are reserved for upcoming signal sources.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSignals {
    pub playoff_impact: PlayoffImpact,
    pub rivalry: Option<String>,
    pub star_power: Option<String>,
}

/// One scheduled or in-progress contest, normalized and scored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub date: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub network: Option<String>,
    pub status: GameStatus,
    pub status_name: String,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    pub home: TeamSummary,
    pub away: TeamSummary,
    /// Watchability rating; deterministic for a given upstream record.
    pub score: i64,
    pub why_watch: String,
    pub signals: GameSignals,
    /// Reserved for odds integration; always absent for now.
    pub betting: Option<Value>,
}

/// One ranked stat line from the team statistics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedStat {
    pub name: String,
    pub display_value: String,
    pub rank: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamRankings {
    /// Best 6 lines, ascending by rank.
    pub strengths: Vec<RankedStat>,
    /// Worst 3 lines, best-of-the-worst first.
    pub weaknesses: Vec<RankedStat>,
    /// Full kept set, no ordering guarantee.
    pub all: Vec<RankedStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedGame {
    pub date: Option<String>,
    pub opponent: String,
    pub score: String, // "112-104", own side first
    pub won: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamGameStatus {
    #[default]
    Off,
    Today,
    Tomorrow,
    Live,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LiveSide {
    pub abbreviation: String,
    pub score: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LiveScore {
    pub home: LiveSide,
    pub away: LiveSide,
}

/// One player as seen from a team roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    pub position: String,
    pub jersey: Option<String>,
    /// Years of experience; absent upstream sorts as 0.
    pub experience: i64,
    pub starter: bool,
    /// "Active" unless the upstream says otherwise.
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InjuryEntry {
    pub name: String,
    pub position: String,
    pub status: String,
}

/// Full aggregate for one team.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetail {
    pub id: String,
    pub abbreviation: String,
    pub name: String,
    pub logo: Option<String>,
    pub location: Option<String>,
    pub record: Option<String>,
    pub points_per_game: f64,
    pub points_allowed_per_game: f64,
    pub rankings: TeamRankings,
    /// Most recent first, at most five.
    pub last_five: Vec<CompletedGame>,
    pub game_status: TeamGameStatus,
    pub live_score: Option<LiveScore>,
    /// Sport-ordered; covers every normalized entry exactly once.
    pub roster: Vec<RosterEntry>,
    /// At most five non-active roster entries.
    pub injuries: Vec<InjuryEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentGame {
    pub date: Option<String>,
    pub opponent: Option<String>,
    pub result: Option<String>,
    /// Raw stat blob, passed through verbatim.
    pub stats: Value,
}

/// One player in full.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetail {
    pub id: String,
    pub name: String,
    pub position: Option<String>,
    pub jersey: Option<String>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub age: Option<i64>,
    pub team: Option<String>,
    /// Sport-specific stat fields; a key maps to `None` when the upstream
    /// dropped that stat.
    pub stats: BTreeMap<String, Option<String>>,
    /// Most recent first, at most five.
    pub recent_games: Vec<RecentGame>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, PartialEq, Eq)]
pub enum EngineError {
    /// The primary fetch of an operation failed.
    Upstream(String),
    /// A vote already exists for this challenge.
    AlreadyVoted,
    /// The underlying game has started; the vote window is closed.
    VotingClosed,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Upstream(msg) => write!(f, "Upstream error: {msg}"),
            EngineError::AlreadyVoted => write!(f, "Already voted on this challenge"),
            EngineError::VotingClosed => write!(f, "Voting closed — the game has started"),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine — the public surface the presentation layer consumes
// ---------------------------------------------------------------------------

/// The engine owns the upstream client and the injected key-value store.
/// Fetch operations recompute from fresh upstream data on every call; the
/// store only holds votes, pick counters, and user settings.
pub struct Engine<S: KeyValueStore> {
    api: LeagueApi,
    store: S,
}

impl<S: KeyValueStore> Engine<S> {
    pub fn new(api: LeagueApi, store: S) -> Self {
        Self { api, store }
    }

    /// Today's slate for a sport, ranked descending by watchability.
    pub async fn games_today(&self, sport: Sport) -> EngineResult<Vec<Game>> {
        let raw = self
            .api
            .fetch_scoreboard(sport)
            .await
            .map_err(|e| EngineError::Upstream(e.to_string()))?;
        let games = raw
            .events
            .unwrap_or_default()
            .iter()
            .filter_map(|event| score::transform_event(event, sport))
            .collect();
        Ok(score::rank_games(games))
    }

    /// The single highest-scored game of the day, if any.
    pub async fn pick_today(&self, sport: Sport) -> EngineResult<Option<Game>> {
        Ok(self.games_today(sport).await?.into_iter().next())
    }

    pub async fn team_detail(&self, sport: Sport, team_id: &str) -> EngineResult<TeamDetail> {
        team::aggregate_team(&self.api, sport, team_id, Utc::now()).await
    }

    pub async fn player_detail(&self, sport: Sport, player_id: &str) -> EngineResult<PlayerDetail> {
        player::aggregate_player(&self.api, sport, player_id, Utc::now()).await
    }

    /// The daily challenge, derived 1:1 from the day's pick.
    pub async fn challenge_today(&self, sport: Sport) -> EngineResult<Option<Challenge>> {
        let pick = self.pick_today(sport).await?;
        Ok(pick.map(|game| challenge::challenge_from_game(&game, sport, Utc::now())))
    }

    /// Lock in a side. First write wins; a second submission fails without
    /// altering the stored vote, and a started game closes the window.
    pub fn submit_vote(&mut self, challenge: &Challenge, side: Side) -> EngineResult<()> {
        challenge::submit_vote(&mut self.store, challenge, side)
    }

    pub fn vote_for(&self, challenge_id: &str) -> Option<Side> {
        challenge::vote_for(&self.store, challenge_id)
    }

    /// Whether the stored vote matched the winner. Presentation-only; never
    /// mutates the vote.
    pub fn outcome(&self, challenge: &Challenge) -> Option<bool> {
        challenge::outcome(&self.store, challenge)
    }

    /// Fold a finished challenge into the pick counters, once.
    pub fn settle(&mut self, challenge: &Challenge) -> Option<PickStats> {
        challenge::settle(&mut self.store, challenge)
    }

    pub fn pick_stats(&self) -> PickStats {
        PickStats::load(&self.store)
    }

    pub fn settings(&self) -> UserSettings {
        UserSettings::load(&self.store)
    }

    pub fn save_settings(&mut self, settings: &UserSettings) {
        settings.save(&mut self.store);
    }
}
