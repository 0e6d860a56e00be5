//! Team aggregator: one team id fans out to the profile, roster, and
//! schedule endpoints concurrently, then a sequential statistics fetch.
//! Only the profile is load-bearing — every other section degrades to its
//! empty default when the upstream drops it.

use crate::roster::{normalize_roster, sort_roster};
use crate::score::{competitor_score, parse_start};
use crate::{
    CompletedGame, EngineError, EngineResult, GameStatus, InjuryEntry, LiveScore, LiveSide,
    RankedStat, RosterEntry, TeamDetail, TeamGameStatus, TeamRankings,
};
use chrono::{DateTime, Utc};
use league_api::client::{ApiResult, LeagueApi};
use league_api::espn::{EspnEvent, EspnRecordItem, EspnTeamProfile};
use league_api::{Sport, probe};
use log::{debug, warn};
use serde_json::Value;

/// Roots the statistics endpoint may nest its category tree under,
/// probed in order.
const CATEGORY_PATHS: [&[&str]; 3] = [
    &["results", "stats", "categories"],
    &["stats", "categories"],
    &["statistics", "splits", "categories"],
];

const MAX_LAST_GAMES: usize = 5;
const MAX_INJURIES: usize = 5;
const WORST_RANK_KEPT: i64 = 30;

pub async fn aggregate_team(
    api: &LeagueApi,
    sport: Sport,
    team_id: &str,
    now: DateTime<Utc>,
) -> EngineResult<TeamDetail> {
    debug!("aggregating team {team_id} ({sport})");
    let (profile, roster, schedule) = tokio::join!(
        api.fetch_team(sport, team_id),
        api.fetch_roster(sport, team_id),
        api.fetch_schedule(sport, team_id),
    );

    let team = profile
        .map_err(|e| EngineError::Upstream(e.to_string()))?
        .team
        .ok_or_else(|| EngineError::Upstream(format!("no team in profile response for {team_id}")))?;
    let athletes = soft(roster, "roster").athletes.unwrap_or_default();
    let events = soft(schedule, "schedule").events.unwrap_or_default();

    // Statistics ride a separate endpoint and fail independently.
    let statistics = soft(api.fetch_team_statistics(sport, team_id).await, "statistics");

    let mut roster = normalize_roster(&athletes);
    sort_roster(&mut roster, sport);

    let record_item = total_record_item(&team);
    let (points_per_game, points_allowed_per_game) = per_game_averages(record_item);
    let (game_status, live_score) = game_status(next_event(&events), now);

    Ok(TeamDetail {
        id: team.id.clone().unwrap_or_default(),
        abbreviation: team.abbreviation.clone().unwrap_or_default(),
        name: team.display_name.clone().unwrap_or_default(),
        logo: team.logos.as_deref().and_then(|l| l.first()).and_then(|l| l.href.clone()),
        location: team.location.clone(),
        record: record_item.and_then(|item| item.summary.clone()),
        points_per_game,
        points_allowed_per_game,
        rankings: rankings_from(&statistics),
        last_five: last_five(&events, &team, now),
        game_status,
        live_score,
        injuries: injuries(&roster),
        roster,
    })
}

/// Absorb a sub-fetch failure: log it and degrade the section to default.
fn soft<T: Default>(result: ApiResult<T>, what: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("{what} fetch degraded to default: {e}");
            T::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Record and averages
// ---------------------------------------------------------------------------

/// The season-total record item; the upstream sometimes omits the type tag.
fn total_record_item(team: &EspnTeamProfile) -> Option<&EspnRecordItem> {
    let items = team.record.as_ref()?.items.as_deref()?;
    items
        .iter()
        .find(|i| i.record_type.as_deref() == Some("total"))
        .or_else(|| items.first())
}

fn record_stat(item: &EspnRecordItem, name: &str) -> Option<f64> {
    item.stats
        .as_deref()?
        .iter()
        .find(|s| s.name.as_deref() == Some(name))
        .and_then(|s| s.value)
}

/// Season-total points for/against divided down to per-game, one decimal.
fn per_game_averages(item: Option<&EspnRecordItem>) -> (f64, f64) {
    let Some(item) = item else { return (0.0, 0.0) };
    let wins = record_stat(item, "wins").unwrap_or(0.0);
    let losses = record_stat(item, "losses").unwrap_or(0.0);
    let mut games = record_stat(item, "gamesPlayed")
        .filter(|g| *g > 0.0)
        .unwrap_or(wins + losses);
    if games == 0.0 {
        games = 1.0;
    }
    let per_game = |total: f64| ((total / games) * 10.0).round() / 10.0;
    (
        per_game(record_stat(item, "pointsFor").unwrap_or(0.0)),
        per_game(record_stat(item, "pointsAgainst").unwrap_or(0.0)),
    )
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

/// Pull every ranked stat line out of the statistics payload, wherever the
/// category tree happens to live this season.
fn rankings_from(statistics: &Value) -> TeamRankings {
    let Some(categories) = probe::first_non_empty_array(statistics, &CATEGORY_PATHS) else {
        return TeamRankings::default();
    };

    let mut ranked: Vec<RankedStat> = categories
        .iter()
        .flat_map(|category| probe::pluck_array(category, &["stats"]).into_iter().flatten())
        .filter_map(|stat| {
            let rank = probe::pluck_i64(stat, &["rank"])?;
            let display_value = probe::pluck_string(stat, &["displayValue"])?;
            (rank <= WORST_RANK_KEPT).then(|| RankedStat {
                name: probe::pluck_string(stat, &["displayName"])
                    .or_else(|| probe::pluck_string(stat, &["name"]))
                    .unwrap_or_default(),
                display_value,
                rank,
            })
        })
        .collect();

    ranked.sort_by_key(|s| s.rank);
    let strengths = ranked.iter().take(6).cloned().collect();
    let weaknesses = ranked.iter().rev().take(3).rev().cloned().collect();
    TeamRankings { strengths, weaknesses, all: ranked }
}

// ---------------------------------------------------------------------------
// Schedule-derived sections
// ---------------------------------------------------------------------------

fn event_status(event: &EspnEvent) -> (Option<&str>, Option<bool>) {
    let status = event.status.as_ref().and_then(|s| s.status_type.as_ref());
    (status.and_then(|t| t.name.as_deref()), status.and_then(|t| t.completed))
}

/// Completed: the upstream says so, the status reads final, or the start
/// time has already passed.
fn is_completed(event: &EspnEvent, now: DateTime<Utc>) -> bool {
    let (name, completed) = event_status(event);
    completed == Some(true)
        || GameStatus::from_name(name.unwrap_or_default()) == GameStatus::Final
        || parse_start(event.date.as_deref()).map(|start| start < now).unwrap_or(false)
}

/// The team's most recent completed games, newest first.
fn last_five(events: &[EspnEvent], team: &EspnTeamProfile, now: DateTime<Utc>) -> Vec<CompletedGame> {
    let mut completed: Vec<&EspnEvent> =
        events.iter().filter(|e| is_completed(e, now)).collect();
    completed.sort_by_key(|e| std::cmp::Reverse(parse_start(e.date.as_deref())));
    completed
        .into_iter()
        .take(MAX_LAST_GAMES)
        .filter_map(|event| completed_game(event, team))
        .collect()
}

fn completed_game(event: &EspnEvent, team: &EspnTeamProfile) -> Option<CompletedGame> {
    let competition = event.competitions.as_deref()?.first()?;
    let competitors = competition.competitors.as_deref()?;
    let ours = competitors.iter().find(|c| is_our_side(c, team))?;
    let theirs = competitors.iter().find(|c| !is_our_side(c, team))?;

    let our_score = competitor_score(ours).unwrap_or(0);
    let their_score = competitor_score(theirs).unwrap_or(0);
    let opponent = theirs
        .team
        .as_ref()
        .and_then(|t| t.abbreviation.clone().or_else(|| t.display_name.clone()))
        .unwrap_or_default();

    Some(CompletedGame {
        date: event.date.clone(),
        opponent,
        score: format!("{our_score}-{their_score}"),
        won: ours.winner.unwrap_or(our_score > their_score),
    })
}

/// Side matching: abbreviation, then id, then a raw display-name match for
/// feeds that ship neither.
fn is_our_side(competitor: &league_api::espn::EspnCompetitor, team: &EspnTeamProfile) -> bool {
    let Some(side) = competitor.team.as_ref() else { return false };
    if side.abbreviation.is_some() && side.abbreviation == team.abbreviation {
        return true;
    }
    if side.id.is_some() && side.id == team.id {
        return true;
    }
    side.display_name.is_some() && side.display_name == team.display_name
}

/// The next event the team has not finished playing, earliest first.
fn next_event<'a>(events: &'a [EspnEvent]) -> Option<&'a EspnEvent> {
    events
        .iter()
        .filter(|e| {
            let (name, completed) = event_status(e);
            completed != Some(true)
                && GameStatus::from_name(name.unwrap_or_default()) != GameStatus::Final
        })
        .filter(|e| parse_start(e.date.as_deref()).is_some())
        .min_by_key(|e| parse_start(e.date.as_deref()))
}

/// `off → today → tomorrow → live`: calendar distance to the next event,
/// overridden to live while that event is underway.
fn game_status(next: Option<&EspnEvent>, now: DateTime<Utc>) -> (TeamGameStatus, Option<LiveScore>) {
    let Some(event) = next else { return (TeamGameStatus::Off, None) };
    let Some(start) = parse_start(event.date.as_deref()) else {
        return (TeamGameStatus::Off, None);
    };

    let mut status = match (start.date_naive() - now.date_naive()).num_days() {
        0 => TeamGameStatus::Today,
        1 => TeamGameStatus::Tomorrow,
        _ => TeamGameStatus::Off,
    };

    let (name, _) = event_status(event);
    let name = name.unwrap_or_default();
    let mut live_score = None;
    if !name.is_empty() && GameStatus::from_name(name) == GameStatus::InProgress {
        status = TeamGameStatus::Live;
        live_score = capture_live_score(event);
    }
    (status, live_score)
}

fn capture_live_score(event: &EspnEvent) -> Option<LiveScore> {
    let competitors = event.competitions.as_deref()?.first()?.competitors.as_deref()?;
    let side = |home_away: &str| -> LiveSide {
        competitors
            .iter()
            .find(|c| c.home_away.as_deref() == Some(home_away))
            .map(|c| LiveSide {
                abbreviation: c
                    .team
                    .as_ref()
                    .and_then(|t| t.abbreviation.clone())
                    .unwrap_or_default(),
                score: competitor_score(c).unwrap_or(0),
            })
            .unwrap_or_default()
    };
    Some(LiveScore { home: side("home"), away: side("away") })
}

// ---------------------------------------------------------------------------
// Injuries
// ---------------------------------------------------------------------------

/// Non-active entries from the sorted roster, capped.
fn injuries(roster: &[RosterEntry]) -> Vec<InjuryEntry> {
    roster
        .iter()
        .filter(|e| !e.status.is_empty() && !e.status.eq_ignore_ascii_case("active"))
        .take(MAX_INJURIES)
        .map(|e| InjuryEntry {
            name: e.name.clone(),
            position: e.position.clone(),
            status: e.status.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use league_api::espn::ScheduleResponse;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 11, 18, 0, 0).unwrap()
    }

    fn profile() -> EspnTeamProfile {
        serde_json::from_value(json!({
            "id": "2",
            "abbreviation": "BOS",
            "displayName": "Boston Celtics",
            "record": {"items": [{
                "type": "total",
                "summary": "40-12",
                "stats": [
                    {"name": "wins", "value": 40.0},
                    {"name": "losses", "value": 12.0},
                    {"name": "pointsFor", "value": 6136.0},
                    {"name": "pointsAgainst", "value": 5616.0}
                ]
            }]}
        }))
        .expect("profile fixture")
    }

    fn schedule_event(id: &str, date: &str, status: &str, completed: bool, our_score: i64, their_score: i64) -> Value {
        json!({
            "id": id,
            "date": date,
            "status": {"type": {"name": status, "completed": completed}},
            "competitions": [{
                "competitors": [
                    {"homeAway": "home", "score": our_score.to_string(),
                     "winner": our_score > their_score,
                     "team": {"id": "2", "abbreviation": "BOS", "displayName": "Boston Celtics"}},
                    {"homeAway": "away", "score": their_score.to_string(),
                     "winner": their_score > our_score,
                     "team": {"id": "5", "abbreviation": "NYK", "displayName": "New York Knicks"}}
                ]
            }]
        })
    }

    fn events(raw: Vec<Value>) -> Vec<EspnEvent> {
        let parsed: ScheduleResponse =
            serde_json::from_value(json!({"events": raw})).expect("schedule fixture");
        parsed.events.unwrap_or_default()
    }

    #[test]
    fn last_five_keeps_completed_games_newest_first() {
        let schedule = events(vec![
            schedule_event("1", "2026-02-01T00:00:00Z", "STATUS_FINAL", true, 100, 90),
            schedule_event("2", "2026-02-03T00:00:00Z", "STATUS_FINAL", true, 95, 99),
            schedule_event("3", "2026-02-05T00:00:00Z", "STATUS_FINAL", true, 120, 110),
            schedule_event("4", "2026-02-07T00:00:00Z", "STATUS_FINAL", true, 88, 87),
            schedule_event("5", "2026-02-09T00:00:00Z", "STATUS_FINAL", true, 104, 112),
            schedule_event("6", "2026-02-10T00:00:00Z", "STATUS_FINAL", true, 130, 90),
            schedule_event("7", "2026-02-20T00:00:00Z", "STATUS_SCHEDULED", false, 0, 0),
        ]);
        let five = last_five(&schedule, &profile(), now());
        assert_eq!(five.len(), 5);
        assert_eq!(five[0].score, "130-90");
        assert!(five[0].won);
        assert_eq!(five[0].opponent, "NYK");
        assert_eq!(five[4].score, "95-99");
        assert!(!five[4].won);
    }

    #[test]
    fn past_start_counts_as_completed_even_without_a_final_status() {
        // Some feeds never flip the completed flag.
        let schedule = events(vec![schedule_event(
            "1", "2026-02-10T00:00:00Z", "STATUS_SCHEDULED", false, 101, 99,
        )]);
        assert_eq!(last_five(&schedule, &profile(), now()).len(), 1);
    }

    #[test]
    fn side_matching_falls_back_to_the_display_name() {
        let schedule = events(vec![json!({
            "id": "1",
            "date": "2026-02-10T00:00:00Z",
            "status": {"type": {"name": "STATUS_FINAL", "completed": true}},
            "competitions": [{
                "competitors": [
                    {"homeAway": "home", "score": "77",
                     "team": {"displayName": "Boston Celtics"}},
                    {"homeAway": "away", "score": "70",
                     "team": {"displayName": "New York Knicks"}}
                ]
            }]
        })]);
        let five = last_five(&schedule, &profile(), now());
        assert_eq!(five.len(), 1);
        assert_eq!(five[0].opponent, "New York Knicks");
        assert!(five[0].won);
    }

    #[test]
    fn rankings_probe_all_three_category_roots() {
        let stat = |name: &str, rank: i64| {
            json!({"displayName": name, "rank": rank, "displayValue": format!("{rank}.0")})
        };
        let categories = json!([{"stats": [stat("Points Per Game", 3), stat("Rebounds", 28)]}]);
        for root in [
            json!({"results": {"stats": {"categories": categories.clone()}}}),
            json!({"stats": {"categories": categories.clone()}}),
            json!({"statistics": {"splits": {"categories": categories}}}),
        ] {
            let rankings = rankings_from(&root);
            assert_eq!(rankings.all.len(), 2, "root: {root}");
            assert_eq!(rankings.strengths[0].rank, 3);
        }
    }

    #[test]
    fn rankings_drop_unranked_and_deep_rank_entries() {
        let root = json!({"stats": {"categories": [{"stats": [
            {"displayName": "Assists", "rank": 31, "displayValue": "22.1"},
            {"displayName": "No Rank", "displayValue": "10.0"},
            {"displayName": "No Value", "rank": 4},
            {"displayName": "Steals", "rank": 7, "displayValue": "8.3"}
        ]}]}});
        let rankings = rankings_from(&root);
        assert_eq!(rankings.all.len(), 1);
        assert_eq!(rankings.all[0].name, "Steals");
    }

    #[test]
    fn strengths_and_weaknesses_slice_the_ranked_list() {
        let stats: Vec<Value> = (1..=10)
            .map(|rank| json!({"displayName": format!("Stat {rank}"), "rank": rank, "displayValue": "x"}))
            .collect();
        let root = json!({"stats": {"categories": [{"stats": stats}]}});
        let rankings = rankings_from(&root);
        let ranks = |list: &[RankedStat]| list.iter().map(|s| s.rank).collect::<Vec<_>>();
        assert_eq!(ranks(&rankings.strengths), vec![1, 2, 3, 4, 5, 6]);
        // Worst three, best of the worst first.
        assert_eq!(ranks(&rankings.weaknesses), vec![8, 9, 10]);
        assert_eq!(rankings.all.len(), 10);
    }

    #[test]
    fn absent_statistics_fall_back_to_empty_rankings() {
        let rankings = rankings_from(&Value::Null);
        assert!(rankings.strengths.is_empty() && rankings.weaknesses.is_empty());
    }

    #[test]
    fn averages_divide_season_totals_per_game() {
        let team = profile();
        let (ppg, papg) = per_game_averages(total_record_item(&team));
        assert_eq!(ppg, 118.0);
        assert_eq!(papg, 108.0);
    }

    #[test]
    fn winless_record_avoids_dividing_by_zero() {
        let team: EspnTeamProfile = serde_json::from_value(json!({
            "record": {"items": [{"stats": [
                {"name": "wins", "value": 0.0},
                {"name": "losses", "value": 0.0},
                {"name": "pointsFor", "value": 7.0},
                {"name": "pointsAgainst", "value": 0.0}
            ]}]}
        }))
        .expect("fixture");
        // gamesPlayed defaults to 1, not 0, when the record is empty.
        let (ppg, papg) = per_game_averages(total_record_item(&team));
        assert_eq!((ppg, papg), (7.0, 0.0));
    }

    #[test]
    fn game_status_walks_off_today_tomorrow() {
        let cases = [
            ("2026-02-11T23:00:00Z", TeamGameStatus::Today),
            ("2026-02-12T01:00:00Z", TeamGameStatus::Tomorrow),
            ("2026-02-14T01:00:00Z", TeamGameStatus::Off),
        ];
        for (date, expected) in cases {
            let schedule = events(vec![schedule_event("1", date, "STATUS_SCHEDULED", false, 0, 0)]);
            let (status, live) = game_status(next_event(&schedule), now());
            assert_eq!(status, expected, "date: {date}");
            assert!(live.is_none());
        }
        let (status, _) = game_status(None, now());
        assert_eq!(status, TeamGameStatus::Off);
    }

    #[test]
    fn in_progress_next_event_reads_live_and_captures_scores() {
        let schedule = events(vec![schedule_event(
            "1", "2026-02-11T17:30:00Z", "STATUS_IN_PROGRESS", false, 54, 61,
        )]);
        let (status, live) = game_status(next_event(&schedule), now());
        assert_eq!(status, TeamGameStatus::Live);
        let live = live.expect("live score");
        assert_eq!(live.home.abbreviation, "BOS");
        assert_eq!(live.home.score, 54);
        assert_eq!(live.away.score, 61);
    }

    #[test]
    fn injuries_skip_active_variants_and_cap_at_five() {
        let entry = |name: &str, status: &str| RosterEntry {
            id: name.to_owned(),
            name: name.to_owned(),
            position: "SF".to_owned(),
            jersey: None,
            experience: 0,
            starter: false,
            status: status.to_owned(),
        };
        let roster: Vec<RosterEntry> = [
            ("a", "Active"), ("b", "Out"), ("c", "Day-To-Day"), ("d", "ACTIVE"),
            ("e", "Questionable"), ("f", "Out"), ("g", "Doubtful"), ("h", "Out"),
        ]
        .iter()
        .map(|(n, s)| entry(n, s))
        .collect();
        let report = injuries(&roster);
        assert_eq!(report.len(), 5);
        assert!(report.iter().all(|i| !i.status.eq_ignore_ascii_case("active")));
        assert_eq!(report[0].name, "b");
    }

    #[tokio::test]
    async fn profile_failure_is_fatal_but_sections_degrade() {
        let mut server = mockito::Server::new_async().await;
        let _profile = server
            .mock("GET", "/basketball/nba/teams/2")
            .with_header("content-type", "application/json")
            .with_body(
                json!({"team": {"id": "2", "abbreviation": "BOS", "displayName": "Boston Celtics"}})
                    .to_string(),
            )
            .create_async()
            .await;
        // Roster and schedule 404, statistics 500: all soft.
        let _roster = server
            .mock("GET", "/basketball/nba/teams/2/roster")
            .with_status(404)
            .create_async()
            .await;
        let _schedule = server
            .mock("GET", "/basketball/nba/teams/2/schedule")
            .with_status(404)
            .create_async()
            .await;
        let _stats = server
            .mock("GET", "/basketball/nba/teams/2/statistics")
            .with_status(500)
            .create_async()
            .await;

        let api = LeagueApi::with_base_url(server.url());
        let detail = aggregate_team(&api, Sport::Basketball, "2", now()).await.expect("soft sections");
        assert_eq!(detail.abbreviation, "BOS");
        assert!(detail.roster.is_empty());
        assert!(detail.last_five.is_empty());
        assert_eq!(detail.game_status, TeamGameStatus::Off);

        let _bad_profile = server
            .mock("GET", "/basketball/nba/teams/9")
            .with_status(500)
            .create_async()
            .await;
        let err = aggregate_team(&api, Sport::Basketball, "9", now()).await.expect_err("fatal");
        assert!(matches!(err, EngineError::Upstream(_)));
    }
}
