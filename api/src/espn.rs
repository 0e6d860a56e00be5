/// ESPN site API raw wire types — serde shapes for deserializing upstream
/// responses. The provider's shape varies by sport, by endpoint, and even by
/// team, so every field is optional; the genuinely free-form subtrees
/// (rosters, statistics, game logs) stay as `serde_json::Value` and are read
/// through the [`crate::probe`] utility.
use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Scoreboard  (site v2 API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScoreboardResponse {
    pub events: Option<Vec<EspnEvent>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnEvent {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "shortName")]
    pub short_name: Option<String>,
    pub date: Option<String>, // ISO 8601
    pub status: Option<EspnStatus>,
    pub competitions: Option<Vec<EspnCompetition>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnStatus {
    #[serde(rename = "type")]
    pub status_type: Option<EspnStatusType>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnStatusType {
    pub name: Option<String>, // "STATUS_SCHEDULED", "STATUS_IN_PROGRESS", "STATUS_FINAL"
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnCompetition {
    pub date: Option<String>,
    pub competitors: Option<Vec<EspnCompetitor>>,
    pub broadcasts: Option<Vec<EspnBroadcast>>,
    pub headlines: Option<Vec<EspnHeadline>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnBroadcast {
    pub names: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnHeadline {
    #[serde(rename = "shortLinkText")]
    pub short_link_text: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnCompetitor {
    pub id: Option<String>,
    #[serde(rename = "homeAway")]
    pub home_away: Option<String>, // "home" | "away"
    pub team: Option<EspnTeam>,
    /// A string on most endpoints, a bare number or `{value, displayValue}`
    /// object on a few — coerced at the read site.
    pub score: Option<Value>,
    pub winner: Option<bool>,
    pub records: Option<Vec<EspnRecord>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnTeam {
    pub id: Option<String>,
    pub abbreviation: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "shortDisplayName")]
    pub short_display_name: Option<String>,
    pub location: Option<String>,
    pub logo: Option<String>,
    pub logos: Option<Vec<EspnLogo>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnLogo {
    pub href: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnRecord {
    #[serde(rename = "type")]
    pub record_type: Option<String>, // "total", "home", "road"
    pub summary: Option<String>,     // "6-2"
}

// ---------------------------------------------------------------------------
// Team profile  (site v2 API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamResponse {
    pub team: Option<EspnTeamProfile>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnTeamProfile {
    pub id: Option<String>,
    pub abbreviation: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub location: Option<String>,
    pub logos: Option<Vec<EspnLogo>>,
    pub record: Option<EspnTeamRecord>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnTeamRecord {
    pub items: Option<Vec<EspnRecordItem>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnRecordItem {
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub summary: Option<String>,
    pub stats: Option<Vec<EspnStatPair>>, // wins, losses, pointsFor, pointsAgainst, ...
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnStatPair {
    pub name: Option<String>,
    pub value: Option<f64>,
}

// ---------------------------------------------------------------------------
// Roster  (site v2 API) — two incompatible encodings share one field
// ---------------------------------------------------------------------------

/// `athletes` is either a flat list of player records or a list of position
/// groups each embedding a player list. The normalizer downstream inspects
/// the first element to tell them apart, so the payload stays raw here.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct RosterResponse {
    pub athletes: Option<Vec<Value>>,
}

// ---------------------------------------------------------------------------
// Schedule  (site v2 API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleResponse {
    pub events: Option<Vec<EspnEvent>>,
}

// ---------------------------------------------------------------------------
// Athlete  (site v2 API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct AthleteResponse {
    pub athlete: Option<EspnAthleteProfile>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnAthleteProfile {
    /// A string on some sports' endpoints, a number on others.
    pub id: Option<Value>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub position: Option<EspnPosition>,
    pub jersey: Option<String>,
    #[serde(rename = "displayHeight")]
    pub display_height: Option<String>,
    #[serde(rename = "displayWeight")]
    pub display_weight: Option<String>,
    pub age: Option<i64>,
    pub team: Option<EspnTeam>,
    /// Season blocks with per-sport category trees; shape varies by sport.
    pub statistics: Option<Value>,
    /// Recent game entries, raw.
    pub gamelog: Option<Value>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnPosition {
    pub abbreviation: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}
