//! Player aggregator: one athlete id becomes a [`PlayerDetail`] with the
//! sport's headline stat fields and the latest game-log entries. The
//! statistics tree is the least stable payload the upstream serves, so
//! everything here reads through the probe with absent-as-default.

use crate::sport::{stat_category, stat_fields};
use crate::{EngineError, EngineResult, PlayerDetail, RecentGame};
use chrono::{DateTime, Datelike, Utc};
use league_api::client::LeagueApi;
use league_api::espn::EspnAthleteProfile;
use league_api::{Sport, probe};
use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;

/// Season label matched when the year probe misses.
const SEASON_LABEL: &str = "Regular Season";

const MAX_RECENT_GAMES: usize = 5;

pub async fn aggregate_player(
    api: &LeagueApi,
    sport: Sport,
    player_id: &str,
    now: DateTime<Utc>,
) -> EngineResult<PlayerDetail> {
    debug!("aggregating player {player_id} ({sport})");
    let profile = api
        .fetch_athlete(sport, player_id)
        .await
        .map_err(|e| EngineError::Upstream(e.to_string()))?;
    let athlete = profile
        .athlete
        .ok_or_else(|| EngineError::Upstream(format!("no athlete in profile response for {player_id}")))?;
    Ok(build_player(&athlete, sport, now))
}

pub fn build_player(athlete: &EspnAthleteProfile, sport: Sport, now: DateTime<Utc>) -> PlayerDetail {
    let stats = athlete
        .statistics
        .as_ref()
        .map(|tree| extract_stats(tree, sport, now.year()))
        .unwrap_or_default();
    let recent_games = athlete
        .gamelog
        .as_ref()
        .map(recent_games)
        .unwrap_or_default();

    PlayerDetail {
        id: athlete.id.as_ref().and_then(probe::coerce_string).unwrap_or_default(),
        name: athlete.display_name.clone().unwrap_or_default(),
        position: athlete.position.as_ref().and_then(|p| {
            p.abbreviation.clone().or_else(|| p.display_name.clone())
        }),
        jersey: athlete.jersey.clone(),
        height: athlete.display_height.clone(),
        weight: athlete.display_weight.clone(),
        age: athlete.age,
        team: athlete.team.as_ref().and_then(|t| t.display_name.clone()),
        stats,
        recent_games,
    }
}

/// The sport's named stat fields out of the current-season block. Every
/// field keeps its key; a missed probe leaves the value absent.
fn extract_stats(tree: &Value, sport: Sport, year: i32) -> BTreeMap<String, Option<String>> {
    let Some(category_name) = stat_category(sport) else {
        return BTreeMap::new();
    };

    let category = season_block(tree, year).and_then(|block| {
        probe::pluck_array(block, &["categories"])?
            .iter()
            .find(|c| probe::pluck_str(c, &["name"]) == Some(category_name))
    });

    stat_fields(sport)
        .iter()
        .map(|field| {
            let value = category
                .and_then(|c| probe::pluck_array(c, &["stats"]))
                .and_then(|stats| {
                    stats.iter().find(|s| probe::pluck_str(s, &["name"]) == Some(*field))
                })
                .and_then(|stat| {
                    probe::pluck_string(stat, &["displayValue"])
                        .or_else(|| probe::pluck_f64(stat, &["value"]).map(|v| v.to_string()))
                });
            ((*field).to_owned(), value)
        })
        .collect()
}

/// The current-season block: season year first, fixed label as fallback.
fn season_block<'a>(tree: &'a Value, year: i32) -> Option<&'a Value> {
    let seasons = probe::first_non_empty_array(tree, &[&["seasons"][..], &["splits"]])?;
    seasons.iter().find(|s| {
        probe::pluck_i64(s, &["season", "year"]) == Some(year as i64)
            || probe::pluck_str(s, &["displayName"]) == Some(SEASON_LABEL)
            || probe::pluck_str(s, &["label"]) == Some(SEASON_LABEL)
    })
}

/// The latest game-log entries, newest first, raw stat blob attached.
fn recent_games(gamelog: &Value) -> Vec<RecentGame> {
    let Some(entries) =
        probe::first_non_empty_array(gamelog, &[&["events"][..], &["entries"], &["games"]])
    else {
        return Vec::new();
    };

    let mut games: Vec<RecentGame> = entries
        .iter()
        .map(|entry| RecentGame {
            date: probe::pluck_string(entry, &["date"])
                .or_else(|| probe::pluck_string(entry, &["gameDate"])),
            opponent: probe::pluck_string(entry, &["opponent", "abbreviation"])
                .or_else(|| probe::pluck_string(entry, &["opponent", "displayName"]))
                .or_else(|| probe::pluck_string(entry, &["opponent"])),
            result: probe::pluck_string(entry, &["result"])
                .or_else(|| probe::pluck_string(entry, &["gameResult"])),
            stats: probe::pluck(entry, &["stats"]).cloned().unwrap_or(Value::Null),
        })
        .collect();

    // ISO dates order lexicographically; dateless entries sink to the back.
    games.sort_by(|a, b| b.date.cmp(&a.date));
    games.truncate(MAX_RECENT_GAMES);
    games
}
