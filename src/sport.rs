//! Per-sport strategy tables: position ordering, stat category and stat
//! field selection. Data-driven dispatch so the aggregators stay free of
//! sport conditionals.

use league_api::Sport;

/// Ordering weight for positions not in a sport's table — they sort last.
pub const UNLISTED_POSITION: u8 = 99;

const BASKETBALL_POSITIONS: &[(&str, u8)] = &[
    ("PG", 1),
    ("SG", 2),
    ("SF", 3),
    ("PF", 4),
    ("C", 5),
    ("G", 6),
    ("F", 7),
];

const FOOTBALL_POSITIONS: &[(&str, u8)] = &[
    ("QB", 1),
    ("RB", 2),
    ("FB", 2),
    ("WR", 3),
    ("TE", 3),
    ("OT", 4),
    ("OG", 4),
    ("C", 4),
    ("G", 4),
    ("T", 4),
    ("OL", 4),
    ("DE", 5),
    ("DT", 5),
    ("NT", 5),
    ("DL", 5),
    ("LB", 6),
    ("OLB", 6),
    ("ILB", 6),
    ("MLB", 6),
    ("CB", 7),
    ("S", 7),
    ("FS", 7),
    ("SS", 7),
    ("DB", 7),
    ("K", 8),
    ("P", 8),
    ("LS", 8),
    ("PK", 8),
];

const BASEBALL_POSITIONS: &[(&str, u8)] = &[
    ("SP", 1),
    ("C", 2),
    ("1B", 3),
    ("2B", 4),
    ("3B", 5),
    ("SS", 6),
    ("LF", 7),
    ("CF", 8),
    ("RF", 9),
    ("OF", 10),
    ("DH", 11),
    ("RP", 12),
    ("CP", 12),
    ("P", 12),
];

/// Ordering weight of a position code within its sport.
pub fn position_priority(sport: Sport, position: &str) -> u8 {
    let table: &[(&str, u8)] = match sport {
        Sport::Basketball => BASKETBALL_POSITIONS,
        Sport::Football => FOOTBALL_POSITIONS,
        Sport::Baseball => BASEBALL_POSITIONS,
        Sport::Hockey => &[],
    };
    let code = position.trim().to_uppercase();
    table
        .iter()
        .find(|(p, _)| *p == code)
        .map(|(_, weight)| *weight)
        .unwrap_or(UNLISTED_POSITION)
}

/// The statistics category holding a sport's headline stat block on the
/// athlete endpoint. Sports without a mapping surface no player stats.
pub fn stat_category(sport: Sport) -> Option<&'static str> {
    match sport {
        Sport::Basketball => Some("perGame"),
        Sport::Football => Some("totals"),
        Sport::Baseball => Some("batting"),
        Sport::Hockey => None,
    }
}

/// Named stat fields surfaced on the player detail card, per sport.
pub fn stat_fields(sport: Sport) -> &'static [&'static str] {
    match sport {
        Sport::Basketball => &[
            "avgPoints",
            "avgRebounds",
            "avgAssists",
            "avgSteals",
            "avgBlocks",
            "avgMinutes",
        ],
        Sport::Football => &[
            "passingYards",
            "rushingYards",
            "receivingYards",
            "totalTouchdowns",
            "totalTackles",
            "sacks",
        ],
        Sport::Baseball => &["avg", "homeRuns", "RBIs", "hits", "runs", "stolenBases"],
        Sport::Hockey => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn football_ordering_follows_the_table() {
        let qb = position_priority(Sport::Football, "QB");
        let wr = position_priority(Sport::Football, "WR");
        let dt = position_priority(Sport::Football, "DT");
        let k = position_priority(Sport::Football, "K");
        assert!(qb < wr && wr < dt && dt < k);
    }

    #[test]
    fn unlisted_positions_sort_last() {
        assert_eq!(position_priority(Sport::Basketball, "QB"), UNLISTED_POSITION);
        assert_eq!(position_priority(Sport::Hockey, "C"), UNLISTED_POSITION);
    }

    #[test]
    fn position_codes_match_case_insensitively() {
        assert_eq!(position_priority(Sport::Basketball, "pg"), 1);
        assert_eq!(position_priority(Sport::Baseball, "sp "), 1);
    }

    #[test]
    fn center_means_different_things_per_sport() {
        assert_eq!(position_priority(Sport::Basketball, "C"), 5);
        assert_eq!(position_priority(Sport::Football, "C"), 4);
        assert_eq!(position_priority(Sport::Baseball, "C"), 2);
    }
}
