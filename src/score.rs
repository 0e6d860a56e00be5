//! Game transformer: one raw upstream event becomes a normalized, scored
//! [`Game`]. Events with no resolvable competition or without both sides are
//! malformed upstream records and are dropped silently.

use crate::{Game, GameSignals, GameStatus, PlayoffImpact, TeamSummary};
use chrono::{DateTime, Utc};
use league_api::espn::{EspnCompetition, EspnCompetitor, EspnEvent};
use league_api::{Sport, probe};

/// Broadcast names containing any of these tokens count as national TV.
pub const NATIONAL_NETWORKS: [&str; 7] = ["ESPN", "TNT", "ABC", "NBC", "CBS", "FOX", "NBA TV"];

/// Combined win percentage above which a matchup reads as elite.
const ELITE_THRESHOLD: f64 = 0.55;

/// Convert one upstream event into a normalized game, or `None` for a
/// malformed record.
pub fn transform_event(event: &EspnEvent, _sport: Sport) -> Option<Game> {
    let competition = event.competitions.as_deref()?.first()?;
    let competitors = competition.competitors.as_deref().unwrap_or_default();
    let home = competitors.iter().find(|c| c.home_away.as_deref() == Some("home"))?;
    let away = competitors.iter().find(|c| c.home_away.as_deref() == Some("away"))?;

    let home_summary = team_summary(home);
    let away_summary = team_summary(away);

    let home_pct = record_win_pct(home_summary.record.as_deref());
    let away_pct = record_win_pct(away_summary.record.as_deref());
    let combined_pct = (home_pct + away_pct) / 2.0;

    let national = national_broadcast(competition);
    let status_name = event
        .status
        .as_ref()
        .and_then(|s| s.status_type.as_ref())
        .and_then(|t| t.name.clone())
        .unwrap_or_default();

    Some(Game {
        id: event.id.clone().unwrap_or_default(),
        date: event.date.clone(),
        start_time: parse_start(event.date.as_deref()),
        network: first_broadcast(competition),
        status: GameStatus::from_name(&status_name),
        status_name,
        home_score: competitor_score(home),
        away_score: competitor_score(away),
        score: watchability(combined_pct, national),
        why_watch: why_watch(competition, &away_summary, &home_summary, combined_pct),
        signals: GameSignals {
            playoff_impact: playoff_impact(combined_pct),
            rivalry: None,
            star_power: None,
        },
        home: home_summary,
        away: away_summary,
        betting: None,
    })
}

/// Sort a transformed batch descending by watchability. The head of the
/// ranked batch is the day's pick.
pub fn rank_games(mut games: Vec<Game>) -> Vec<Game> {
    games.sort_by(|a, b| b.score.cmp(&a.score));
    games
}

/// Parse a "W-L" record summary into a win percentage. Absent or malformed
/// records read as .500 so an unknown team neither boosts nor sinks a
/// matchup.
pub fn record_win_pct(summary: Option<&str>) -> f64 {
    let Some(summary) = summary else { return 0.5 };
    let mut parts = summary.split('-');
    let wins = parts.next().and_then(|p| p.trim().parse::<f64>().ok());
    let losses = parts.next().and_then(|p| p.trim().parse::<f64>().ok());
    match (wins, losses) {
        (Some(w), Some(l)) if w + l > 0.0 => w / (w + l),
        _ => 0.5,
    }
}

fn watchability(combined_pct: f64, national: bool) -> i64 {
    let mut score = 50.0 + combined_pct * 30.0;
    if national {
        score += 15.0;
    }
    score.round() as i64
}

fn playoff_impact(combined_pct: f64) -> PlayoffImpact {
    if combined_pct > ELITE_THRESHOLD {
        PlayoffImpact::High
    } else if combined_pct > 0.45 {
        PlayoffImpact::Medium
    } else {
        PlayoffImpact::Low
    }
}

/// Narrative line for the listing. An upstream headline wins over the
/// synthesized default, but the elite-matchup sentence overrides both.
fn why_watch(
    competition: &EspnCompetition,
    away: &TeamSummary,
    home: &TeamSummary,
    combined_pct: f64,
) -> String {
    if combined_pct > ELITE_THRESHOLD {
        return format!(
            "Elite matchup: {} ({}) at {} ({}).",
            away.name,
            away.record.as_deref().unwrap_or("-"),
            home.name,
            home.record.as_deref().unwrap_or("-"),
        );
    }
    headline(competition)
        .unwrap_or_else(|| format!("{} visits {} in tonight's action.", away.name, home.name))
}

fn headline(competition: &EspnCompetition) -> Option<String> {
    let first = competition.headlines.as_deref()?.first()?;
    first.short_link_text.clone().or_else(|| first.description.clone())
}

fn national_broadcast(competition: &EspnCompetition) -> bool {
    competition
        .broadcasts
        .iter()
        .flatten()
        .flat_map(|b| b.names.iter().flatten())
        .any(|name| {
            let name = name.to_uppercase();
            NATIONAL_NETWORKS.iter().any(|token| name.contains(token))
        })
}

fn first_broadcast(competition: &EspnCompetition) -> Option<String> {
    competition
        .broadcasts
        .iter()
        .flatten()
        .flat_map(|b| b.names.iter().flatten())
        .next()
        .cloned()
}

/// Scores arrive as strings, bare numbers, or `{value}` objects.
pub fn competitor_score(competitor: &EspnCompetitor) -> Option<i64> {
    let raw = competitor.score.as_ref()?;
    probe::coerce_i64(raw).or_else(|| probe::pluck_i64(raw, &["value"]))
}

pub fn parse_start(date: Option<&str>) -> Option<DateTime<Utc>> {
    date.and_then(|d| DateTime::parse_from_rfc3339(d).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn team_summary(competitor: &EspnCompetitor) -> TeamSummary {
    let team = competitor.team.as_ref();
    TeamSummary {
        abbreviation: team.and_then(|t| t.abbreviation.clone()).unwrap_or_default(),
        name: team.and_then(|t| t.display_name.clone()).unwrap_or_default(),
        logo: team.and_then(|t| {
            t.logo
                .clone()
                .or_else(|| t.logos.as_deref()?.first()?.href.clone())
        }),
        record: record_summary(competitor).map(str::to_owned),
        location: team.and_then(|t| t.location.clone()),
    }
}

/// The season record summary: the "total" entry when typed, else the first.
fn record_summary(competitor: &EspnCompetitor) -> Option<&str> {
    let records = competitor.records.as_deref()?;
    records
        .iter()
        .find(|r| r.record_type.as_deref() == Some("total"))
        .or_else(|| records.first())
        .and_then(|r| r.summary.as_deref())
}
