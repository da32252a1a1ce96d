use serde_json::Value;

use crate::projection::{count, entity_id, items};

/// Season record. Stats live under `data` on most payloads, at the top level on
/// some.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamRecord {
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub loses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
}

impl TeamRecord {
    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }
}

pub fn team_record(team: &Value) -> TeamRecord {
    let stats = match team.get("data") {
        Some(data) if data.is_object() => data,
        _ => team,
    };
    let wins = count(Some(stats), "wins");
    let draws = count(Some(stats), "draws");
    let loses = count(Some(stats), "loses");
    let points = if stats.get("points").is_some_and(|p| !p.is_null()) {
        count(Some(stats), "points")
    } else {
        wins.saturating_mul(3).saturating_add(draws)
    };
    let played = match count(Some(stats), "matches") {
        0 => wins.saturating_add(draws).saturating_add(loses),
        n => n,
    };
    TeamRecord {
        played,
        wins,
        draws,
        loses,
        goals_for: count(Some(stats), "goals_for"),
        goals_against: count(Some(stats), "goals_against"),
        points,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StandingRow<'a> {
    pub rank: usize,
    pub team: &'a Value,
    pub record: TeamRecord,
}

/// League table ordered by points, highest first; ties keep API order.
pub fn standings(payload: Option<&Value>) -> Vec<StandingRow<'_>> {
    let mut rows: Vec<(&Value, TeamRecord)> = items(payload)
        .iter()
        .map(|team| (team, team_record(team)))
        .collect();
    rows.sort_by(|a, b| b.1.points.cmp(&a.1.points));
    rows.into_iter()
        .enumerate()
        .map(|(idx, (team, record))| StandingRow {
            rank: idx + 1,
            team,
            record,
        })
        .collect()
}

/// The id the home dashboard's table hangs off.
pub fn first_league_id(leagues: Option<&Value>) -> Option<String> {
    items(leagues).first().and_then(entity_id)
}

pub fn league_ids(leagues: Option<&Value>) -> Vec<String> {
    items(leagues).iter().filter_map(entity_id).collect()
}

/// Leagues whose `tournament` reference points at `tournament_id`.
pub fn tournament_leagues<'a>(leagues: Option<&'a Value>, tournament_id: &str) -> Vec<&'a Value> {
    items(leagues)
        .iter()
        .filter(|league| {
            match league.get("tournament") {
                Some(Value::String(id)) => id == tournament_id,
                Some(Value::Number(n)) => n.to_string() == tournament_id,
                Some(obj @ Value::Object(_)) => entity_id(obj).is_some_and(|id| id == tournament_id),
                _ => false,
            }
        })
        .collect()
}
