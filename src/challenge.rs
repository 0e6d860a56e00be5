//! Daily challenge engine. One challenge per sport per day, derived from
//! the slate's top-ranked game; the lifecycle runs `pending → started →
//! finished` off the wall clock and the upstream status text, and a vote is
//! a write-once record keyed by the challenge id.

use crate::storage::{KeyValueStore, PickStats};
use crate::{EngineError, EngineResult, Game};
use chrono::{DateTime, Utc};
use league_api::Sport;
use serde::Serialize;

const VOTE_KEY_PREFIX: &str = "prediction_";
const SETTLED_KEY_PREFIX: &str = "settled_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Away,
    Home,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Away => "away",
            Side::Home => "home",
        }
    }

    pub fn from_key(key: &str) -> Option<Side> {
        match key {
            "away" => Some(Side::Away),
            "home" => Some(Side::Home),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengePhase {
    Pending,
    Started,
    Finished,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChallengeOption {
    pub side: Side,
    pub abbreviation: String,
    pub name: String,
}

/// The single daily predictable event. Always tied to the day's top-scored
/// game — never created on its own.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    /// `{sport}-{gameId}`.
    pub id: String,
    pub sport: Sport,
    pub game_id: String,
    /// Away first, home second.
    pub options: [ChallengeOption; 2],
    pub phase: ChallengePhase,
    pub game_started: bool,
    pub game_finished: bool,
    /// Set once finished; the side with the strictly greater score.
    pub winner: Option<Side>,
    pub away_score: Option<i64>,
    pub home_score: Option<i64>,
}

/// Derive the challenge for a game. `now` drives the lifecycle so callers
/// (and tests) control the clock.
pub fn challenge_from_game(game: &Game, sport: Sport, now: DateTime<Utc>) -> Challenge {
    let phase = phase_of(game.start_time, &game.status_name, now);
    let winner = match phase {
        ChallengePhase::Finished => winner_of(game.away_score, game.home_score),
        _ => None,
    };
    Challenge {
        id: format!("{}-{}", sport.key(), game.id),
        sport,
        game_id: game.id.clone(),
        options: [
            ChallengeOption {
                side: Side::Away,
                abbreviation: game.away.abbreviation.clone(),
                name: game.away.name.clone(),
            },
            ChallengeOption {
                side: Side::Home,
                abbreviation: game.home.abbreviation.clone(),
                name: game.home.name.clone(),
            },
        ],
        phase,
        game_started: phase != ChallengePhase::Pending,
        game_finished: phase == ChallengePhase::Finished,
        winner,
        away_score: game.away_score,
        home_score: game.home_score,
    }
}

/// Finished on a final/post status text; started once the clock passes the
/// start time; pending otherwise (including when the start time is absent —
/// an unscheduled game cannot have started).
pub fn phase_of(start: Option<DateTime<Utc>>, status_name: &str, now: DateTime<Utc>) -> ChallengePhase {
    let status = status_name.to_lowercase();
    if status.contains("final") || status.contains("post") {
        return ChallengePhase::Finished;
    }
    match start {
        Some(start) if now >= start => ChallengePhase::Started,
        _ => ChallengePhase::Pending,
    }
}

fn winner_of(away: Option<i64>, home: Option<i64>) -> Option<Side> {
    let (away, home) = (away?, home?);
    if home > away {
        Some(Side::Home)
    } else if away > home {
        Some(Side::Away)
    } else {
        None // ties are not modeled in these sports
    }
}

fn vote_key(challenge_id: &str) -> String {
    format!("{VOTE_KEY_PREFIX}{challenge_id}")
}

/// Lock in a side while the challenge is still pending. First write wins.
pub fn submit_vote<S: KeyValueStore>(
    store: &mut S,
    challenge: &Challenge,
    side: Side,
) -> EngineResult<()> {
    if challenge.phase != ChallengePhase::Pending {
        return Err(EngineError::VotingClosed);
    }
    let key = vote_key(&challenge.id);
    if store.get(&key).is_some() {
        return Err(EngineError::AlreadyVoted);
    }
    store.set(&key, side.as_str());
    Ok(())
}

pub fn vote_for<S: KeyValueStore>(store: &S, challenge_id: &str) -> Option<Side> {
    store.get(&vote_key(challenge_id)).and_then(|raw| Side::from_key(&raw))
}

/// Whether the stored vote called the winner. Pure read — the stored vote
/// is never touched.
pub fn outcome<S: KeyValueStore>(store: &S, challenge: &Challenge) -> Option<bool> {
    let vote = vote_for(store, &challenge.id)?;
    let winner = challenge.winner?;
    Some(vote == winner)
}

/// Fold a finished, voted challenge into the pick counters exactly once.
/// Returns the updated counters on the first call, `None` after.
pub fn settle<S: KeyValueStore>(store: &mut S, challenge: &Challenge) -> Option<PickStats> {
    if !challenge.game_finished {
        return None;
    }
    let winner = challenge.winner?;
    let vote = vote_for(store, &challenge.id)?;
    let guard = format!("{SETTLED_KEY_PREFIX}{}", challenge.id);
    if store.get(&guard).is_some() {
        return None;
    }
    let mut stats = PickStats::load(store);
    stats.record(vote == winner);
    stats.save(store);
    store.set(&guard, "1");
    Some(stats)
}
