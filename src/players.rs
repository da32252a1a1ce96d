use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};
use serde_json::Value;

use crate::locale::{Locale, resolve_field};
use crate::projection::{compare_localized, count, items, matches_text, parse_date, str_field};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::Goalkeeper,
        Position::Defender,
        Position::Midfielder,
        Position::Forward,
    ];

    pub const fn code(self) -> &'static str {
        match self {
            Position::Goalkeeper => "goalkeeper",
            Position::Defender => "defender",
            Position::Midfielder => "midfielder",
            Position::Forward => "forward",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|pos| pos.code().eq_ignore_ascii_case(raw))
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Uz, Position::Goalkeeper) => "Darvozabon",
            (Locale::Uz, Position::Defender) => "Himoyachi",
            (Locale::Uz, Position::Midfielder) => "Yarim himoyachi",
            (Locale::Uz, Position::Forward) => "Hujumchi",
            (Locale::Ru, Position::Goalkeeper) => "Вратарь",
            (Locale::Ru, Position::Defender) => "Защитник",
            (Locale::Ru, Position::Midfielder) => "Полузащитник",
            (Locale::Ru, Position::Forward) => "Нападающий",
            (Locale::En, Position::Goalkeeper) => "Goalkeeper",
            (Locale::En, Position::Defender) => "Defender",
            (Locale::En, Position::Midfielder) => "Midfielder",
            (Locale::En, Position::Forward) => "Forward",
        }
    }
}

/// Reads either a bare code (`"defender"`) or an object carrying one.
pub fn player_position(player: &Value) -> Option<Position> {
    match player.get("position")? {
        Value::String(code) => Position::parse(code),
        obj @ Value::Object(_) => ["code", "name", "name_en", "position_en"]
            .iter()
            .find_map(|key| str_field(Some(obj), key).and_then(Position::parse)),
        _ => None,
    }
}

/// Server-provided label for the active language, else the built-in one, else `-`.
pub fn position_label(player: &Value, locale: Locale) -> String {
    if let Some(obj) = player.get("position").filter(|v| v.is_object()) {
        let label = resolve_field(Some(obj), "position", locale);
        if !label.is_empty() {
            return label;
        }
    }
    player_position(player)
        .map(|pos| pos.label(locale).to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerEvents {
    pub goals: u32,
    pub assists: u32,
    pub yellows: u32,
    pub reds: u32,
}

/// Flat `goals_count` / `assists_count` win when non-zero; otherwise the nested
/// `events` summary is used.
pub fn player_events(player: &Value) -> PlayerEvents {
    let events = player.get("events");
    let flat_or_nested = |flat: &str, nested: &str| {
        let flat = count(Some(player), flat);
        if flat > 0 { flat } else { count(events, nested) }
    };
    PlayerEvents {
        goals: flat_or_nested("goals_count", "goals"),
        assists: flat_or_nested("assists_count", "assists"),
        yellows: count(events, "yellows"),
        reds: count(events, "reds"),
    }
}

/// Whole years lived as of `today`; `None` when born after `today`.
pub fn age(birthday: NaiveDate, today: NaiveDate) -> Option<u32> {
    let mut years = today.year() - birthday.year();
    if (today.month(), today.day()) < (birthday.month(), birthday.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

pub fn player_birthday(player: &Value) -> Option<NaiveDate> {
    str_field(Some(player), "birthday").and_then(parse_date)
}

pub fn player_age(player: &Value, today: NaiveDate) -> Option<u32> {
    age(player_birthday(player)?, today)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerSort {
    #[default]
    Goals,
    Assists,
    Name,
    Age,
}

impl PlayerSort {
    pub fn next(self) -> Self {
        match self {
            PlayerSort::Goals => PlayerSort::Assists,
            PlayerSort::Assists => PlayerSort::Name,
            PlayerSort::Name => PlayerSort::Age,
            PlayerSort::Age => PlayerSort::Goals,
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Uz, PlayerSort::Goals) => "Gollar bo'yicha",
            (Locale::Uz, PlayerSort::Assists) => "Uzatmalar bo'yicha",
            (Locale::Uz, PlayerSort::Name) => "Ism bo'yicha",
            (Locale::Uz, PlayerSort::Age) => "Yosh bo'yicha",
            (Locale::Ru, PlayerSort::Goals) => "По голам",
            (Locale::Ru, PlayerSort::Assists) => "По передачам",
            (Locale::Ru, PlayerSort::Name) => "По имени",
            (Locale::Ru, PlayerSort::Age) => "По возрасту",
            (Locale::En, PlayerSort::Goals) => "By Goals",
            (Locale::En, PlayerSort::Assists) => "By Assists",
            (Locale::En, PlayerSort::Name) => "By Name",
            (Locale::En, PlayerSort::Age) => "By Age",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerFilter {
    pub search: String,
    pub position: Option<Position>,
}

impl PlayerFilter {
    pub fn matches(&self, player: &Value, locale: Locale) -> bool {
        let position_ok = self
            .position
            .is_none_or(|wanted| player_position(player) == Some(wanted));
        position_ok && matches_text(player, "name", &self.search, locale)
    }
}

pub fn filter_players<'a>(
    payload: Option<&'a Value>,
    filter: &PlayerFilter,
    locale: Locale,
) -> Vec<&'a Value> {
    items(payload)
        .iter()
        .filter(|player| filter.matches(player, locale))
        .collect()
}

/// Stable: equal keys keep the API's order.
pub fn sort_players(players: &mut [&Value], sort: PlayerSort, locale: Locale) {
    match sort {
        PlayerSort::Goals => {
            players.sort_by(|a, b| player_events(b).goals.cmp(&player_events(a).goals))
        }
        PlayerSort::Assists => {
            players.sort_by(|a, b| player_events(b).assists.cmp(&player_events(a).assists))
        }
        PlayerSort::Name => players.sort_by(|a, b| {
            compare_localized(
                &resolve_field(Some(*a), "name", locale),
                &resolve_field(Some(*b), "name", locale),
            )
        }),
        // Younger first; players without a birthday go last.
        PlayerSort::Age => players.sort_by(|a, b| {
            match (player_birthday(a), player_birthday(b)) {
                (Some(da), Some(db)) => db.cmp(&da),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
    }
}

pub fn project_players<'a>(
    payload: Option<&'a Value>,
    filter: &PlayerFilter,
    sort: PlayerSort,
    locale: Locale,
) -> Vec<&'a Value> {
    let mut players = filter_players(payload, filter, locale);
    sort_players(&mut players, sort, locale);
    players
}

/// Leaders by goals, API order breaking ties.
pub fn top_scorers(payload: Option<&Value>, n: usize) -> Vec<&Value> {
    let mut players: Vec<&Value> = items(payload).iter().collect();
    sort_players(&mut players, PlayerSort::Goals, Locale::default());
    players.truncate(n);
    players
}

/// Current club, whichever of `current_team` / `team` the payload carries.
pub fn player_team(player: &Value, locale: Locale) -> String {
    let team = player
        .get("current_team")
        .filter(|v| v.is_object())
        .or_else(|| player.get("team"));
    resolve_field(team, "name", locale)
}
