pub mod client;
pub mod espn;
pub mod probe;

use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Sports — the leagues the upstream provider serves
// ---------------------------------------------------------------------------

/// A league on the upstream site API. The wire shape varies per sport, so
/// everything downstream of the client dispatches on this key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Basketball,
    Football,
    Baseball,
    Hockey,
}

impl Sport {
    /// Short league key used in challenge ids and storage keys.
    pub fn key(self) -> &'static str {
        match self {
            Sport::Basketball => "nba",
            Sport::Football => "nfl",
            Sport::Baseball => "mlb",
            Sport::Hockey => "nhl",
        }
    }

    /// Path segment on the upstream site API, e.g. `basketball/nba`.
    pub fn api_path(self) -> &'static str {
        match self {
            Sport::Basketball => "basketball/nba",
            Sport::Football => "football/nfl",
            Sport::Baseball => "baseball/mlb",
            Sport::Hockey => "hockey/nhl",
        }
    }

    pub fn from_key(key: &str) -> Option<Sport> {
        match key.to_lowercase().as_str() {
            "nba" => Some(Sport::Basketball),
            "nfl" => Some(Sport::Football),
            "mlb" => Some(Sport::Baseball),
            "nhl" => Some(Sport::Hockey),
            _ => None,
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
