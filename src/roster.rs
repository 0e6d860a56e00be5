//! Roster normalizer and per-sport sorter. The upstream roster payload
//! arrives in one of two incompatible encodings — a flat player list, or
//! position groups each embedding a player list — and both flatten into the
//! same [`RosterEntry`] sequence here.

use crate::RosterEntry;
use crate::sport::position_priority;
use league_api::{Sport, probe};
use serde_json::Value;

/// Field names a grouped payload may nest its player list under.
const GROUP_ITEM_FIELDS: [&str; 2] = ["items", "athletes"];

/// Flatten either roster encoding into entries. Detection inspects the
/// first top-level element: an id plus a display name directly on it means
/// the whole payload is flat; an embedded list under a known field name
/// means position groups. Anything else is an empty roster.
pub fn normalize_roster(athletes: &[Value]) -> Vec<RosterEntry> {
    let Some(first) = athletes.first() else {
        return Vec::new();
    };

    if probe::pluck(first, &["id"]).is_some() && probe::pluck_str(first, &["displayName"]).is_some()
    {
        return athletes.iter().filter_map(|a| parse_entry(a, None)).collect();
    }

    if !GROUP_ITEM_FIELDS.into_iter().any(|f| probe::pluck_array(first, &[f]).is_some()) {
        return Vec::new();
    }

    let mut entries = Vec::new();
    for group in athletes {
        let label = group_label(group);
        for field in GROUP_ITEM_FIELDS {
            if let Some(items) = probe::pluck_array(group, &[field]) {
                entries.extend(items.iter().filter_map(|a| parse_entry(a, label.as_deref())));
                break;
            }
        }
    }
    entries
}

/// A group's position label — a bare string on some sports, an object on
/// others.
fn group_label(group: &Value) -> Option<String> {
    match probe::pluck(group, &["position"]) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(obj) => probe::pluck_string(obj, &["displayName"])
            .or_else(|| probe::pluck_string(obj, &["abbreviation"])),
        None => None,
    }
}

fn parse_entry(athlete: &Value, group_position: Option<&str>) -> Option<RosterEntry> {
    let id = probe::pluck_string(athlete, &["id"])?;
    let name = probe::pluck_string(athlete, &["displayName"])
        .or_else(|| probe::pluck_string(athlete, &["fullName"]))?;
    let position = probe::pluck_string(athlete, &["position", "abbreviation"])
        .or_else(|| probe::pluck_string(athlete, &["position", "displayName"]))
        .or_else(|| match probe::pluck(athlete, &["position"]) {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        })
        .or_else(|| group_position.map(str::to_owned))
        .unwrap_or_default();

    Some(RosterEntry {
        id,
        name,
        position,
        jersey: probe::pluck_string(athlete, &["jersey"]),
        experience: probe::pluck_i64(athlete, &["experience", "years"])
            .or_else(|| probe::pluck_i64(athlete, &["experience"]))
            .unwrap_or(0),
        starter: probe::pluck_bool(athlete, &["starter"]).unwrap_or(false),
        status: entry_status(athlete),
    })
}

/// Injury status — a bare string or a `{name}` / `{type}` object; absent
/// reads as Active.
fn entry_status(athlete: &Value) -> String {
    match probe::pluck(athlete, &["status"]) {
        Some(Value::String(s)) => s.clone(),
        Some(obj) => probe::pluck_string(obj, &["name"])
            .or_else(|| probe::pluck_string(obj, &["type"]))
            .unwrap_or_else(|| "Active".to_owned()),
        None => "Active".to_owned(),
    }
}

/// Reorder a flattened roster in place per the sport's conventions. The
/// sort is stable and total: every entry keeps exactly one slot.
pub fn sort_roster(roster: &mut [RosterEntry], sport: Sport) {
    match sport {
        Sport::Basketball => {
            // Starters first by position; bench by experience, then position.
            roster.sort_by(|a, b| {
                b.starter.cmp(&a.starter).then_with(|| {
                    let by_position = position_priority(sport, &a.position)
                        .cmp(&position_priority(sport, &b.position));
                    if a.starter {
                        by_position
                    } else {
                        b.experience.cmp(&a.experience).then(by_position)
                    }
                })
            });
        }
        Sport::Football | Sport::Baseball => {
            roster.sort_by(|a, b| {
                position_priority(sport, &a.position)
                    .cmp(&position_priority(sport, &b.position))
                    .then_with(|| b.experience.cmp(&a.experience))
            });
        }
        Sport::Hockey => {} // no ordering convention — passthrough
    }
}
