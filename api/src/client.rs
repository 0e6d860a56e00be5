use crate::Sport;
use crate::espn::{
    AthleteResponse, RosterResponse, ScheduleResponse, ScoreboardResponse, TeamResponse,
};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const SITE_API_BASE: &str = "https://site.api.espn.com/apis/site/v2/sports";

/// League data client backed by ESPN's public site endpoints.
#[derive(Debug, Clone)]
pub struct LeagueApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for LeagueApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("slate/0.1 (nightly slate engine)")
                .build()
                .unwrap_or_default(),
            base_url: SITE_API_BASE.to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl LeagueApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at an alternate base URL (tests, proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    /// Today's slate of events for a sport.
    pub async fn fetch_scoreboard(&self, sport: Sport) -> ApiResult<ScoreboardResponse> {
        let url = format!("{}/{}/scoreboard", self.base_url, sport.api_path());
        self.get(&url).await
    }

    /// One team's profile (identity, record items with season totals).
    pub async fn fetch_team(&self, sport: Sport, team_id: &str) -> ApiResult<TeamResponse> {
        let url = format!("{}/{}/teams/{team_id}", self.base_url, sport.api_path());
        self.get(&url).await
    }

    /// One team's roster, in whichever of the two upstream encodings the
    /// sport happens to use.
    pub async fn fetch_roster(&self, sport: Sport, team_id: &str) -> ApiResult<RosterResponse> {
        let url = format!("{}/{}/teams/{team_id}/roster", self.base_url, sport.api_path());
        self.get(&url).await
    }

    /// One team's season schedule.
    pub async fn fetch_schedule(&self, sport: Sport, team_id: &str) -> ApiResult<ScheduleResponse> {
        let url = format!("{}/{}/teams/{team_id}/schedule", self.base_url, sport.api_path());
        self.get(&url).await
    }

    /// One team's ranked season statistics. The category tree moves between
    /// three different roots depending on sport, so the payload stays raw
    /// and the caller probes it.
    pub async fn fetch_team_statistics(&self, sport: Sport, team_id: &str) -> ApiResult<Value> {
        let url = format!("{}/{}/teams/{team_id}/statistics", self.base_url, sport.api_path());
        self.get(&url).await
    }

    /// One player's profile, season statistics tree, and game log.
    pub async fn fetch_athlete(&self, sport: Sport, athlete_id: &str) -> ApiResult<AthleteResponse> {
        let url = format!("{}/{}/athletes/{athlete_id}", self.base_url, sport.api_path());
        self.get(&url).await
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                // 4xx means the upstream has no data at this path (a renamed
                // or retired endpoint, an unknown id) — shape drift, not an
                // outage. Degrade to the empty response.
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}
