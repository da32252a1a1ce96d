use serde_json::Value;

use crate::locale::{Locale, resolve_field};
use crate::projection::{contains_ci, count, entity_id, format_date, format_time, items, str_field};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStatus {
    Live,
    Upcoming,
    Finished,
}

impl MatchStatus {
    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Uz, MatchStatus::Live) => "Jonli",
            (Locale::Uz, MatchStatus::Upcoming) => "Kutilmoqda",
            (Locale::Uz, MatchStatus::Finished) => "Yakunlangan",
            (Locale::Ru, MatchStatus::Live) => "В эфире",
            (Locale::Ru, MatchStatus::Upcoming) => "Предстоящий",
            (Locale::Ru, MatchStatus::Finished) => "Завершён",
            (Locale::En, MatchStatus::Live) => "Live",
            (Locale::En, MatchStatus::Upcoming) => "Upcoming",
            (Locale::En, MatchStatus::Finished) => "Finished",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreOutcome {
    HomeWin,
    AwayWin,
    Draw,
}

pub fn classify_score(home: u32, away: u32) -> ScoreOutcome {
    match home.cmp(&away) {
        std::cmp::Ordering::Greater => ScoreOutcome::HomeWin,
        std::cmp::Ordering::Less => ScoreOutcome::AwayWin,
        std::cmp::Ordering::Equal => ScoreOutcome::Draw,
    }
}

pub fn has_live_link(m: &Value) -> bool {
    str_field(Some(m), "live_link").is_some()
}

/// A stream link means live no matter what `status` says.
pub fn match_status(m: &Value) -> MatchStatus {
    if has_live_link(m) {
        return MatchStatus::Live;
    }
    match str_field(Some(m), "status") {
        Some(status) if status.eq_ignore_ascii_case("upcoming") => MatchStatus::Upcoming,
        _ => MatchStatus::Finished,
    }
}

/// `(team1_score, team2_score)`; `None` when the match carries no score object.
pub fn match_score(m: &Value) -> Option<(u32, u32)> {
    let score = m.get("score").filter(|s| s.is_object())?;
    Some((count(Some(score), "team1_score"), count(Some(score), "team2_score")))
}

pub fn match_outcome(m: &Value) -> Option<ScoreOutcome> {
    let (home, away) = match_score(m)?;
    Some(classify_score(home, away))
}

/// A match as listed on the schedule, with the status its source list implies.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledMatch<'a> {
    pub source: &'a Value,
    pub status: MatchStatus,
}

/// Recent results followed by upcoming fixtures. Entries from the first list are
/// finished, entries from the second upcoming, unless a stream link marks them live.
pub fn combine_matches<'a>(
    last: Option<&'a Value>,
    upcoming: Option<&'a Value>,
) -> Vec<ScheduledMatch<'a>> {
    let tagged = |payload: Option<&'a Value>, default: MatchStatus| {
        items(payload).iter().map(move |source| ScheduledMatch {
            source,
            status: if has_live_link(source) {
                MatchStatus::Live
            } else {
                default
            },
        })
    };
    tagged(last, MatchStatus::Finished)
        .chain(tagged(upcoming, MatchStatus::Upcoming))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFilter {
    pub league: String,
    pub status: Option<MatchStatus>,
}

impl MatchFilter {
    pub fn matches(&self, row: &ScheduledMatch<'_>, locale: Locale) -> bool {
        let status_ok = self.status.is_none_or(|wanted| row.status == wanted);
        status_ok && contains_ci(&league_name(row.source, locale), &self.league)
    }
}

pub fn filter_matches<'a>(
    rows: &[ScheduledMatch<'a>],
    filter: &MatchFilter,
    locale: Locale,
) -> Vec<ScheduledMatch<'a>> {
    rows.iter()
        .filter(|row| filter.matches(row, locale))
        .copied()
        .collect()
}

pub fn league_name(m: &Value, locale: Locale) -> String {
    resolve_field(m.get("league"), "name", locale)
}

pub fn team_names(m: &Value, locale: Locale) -> (String, String) {
    (
        resolve_field(m.get("team1"), "name", locale),
        resolve_field(m.get("team2"), "name", locale),
    )
}

/// `dd.mm.yyyy HH:MM`, dropping whichever half is missing.
pub fn kickoff_label(m: &Value) -> String {
    let date = str_field(Some(m), "date").map(format_date);
    let time = str_field(Some(m), "time").map(format_time);
    match (date, time) {
        (Some(d), Some(t)) => format!("{d} {t}"),
        (Some(d), None) => d,
        (None, Some(t)) => t,
        (None, None) => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormResult {
    Win,
    Draw,
    Loss,
}

impl FormResult {
    pub fn letter(self) -> char {
        match self {
            FormResult::Win => 'W',
            FormResult::Draw => 'D',
            FormResult::Loss => 'L',
        }
    }
}

/// Last `n` results for a team, newest first, from finished scored matches only.
pub fn team_form(team_id: &str, matches: Option<&Value>, n: usize) -> Vec<FormResult> {
    let mut played: Vec<(String, FormResult)> = items(matches)
        .iter()
        .filter(|m| match_status(m) == MatchStatus::Finished)
        .filter_map(|m| {
            let (home, away) = match_score(m)?;
            let side_is = |side: &str| {
                m.get(side)
                    .and_then(entity_id)
                    .is_some_and(|id| id == team_id)
            };
            let result = if side_is("team1") {
                match classify_score(home, away) {
                    ScoreOutcome::HomeWin => FormResult::Win,
                    ScoreOutcome::AwayWin => FormResult::Loss,
                    ScoreOutcome::Draw => FormResult::Draw,
                }
            } else if side_is("team2") {
                match classify_score(home, away) {
                    ScoreOutcome::HomeWin => FormResult::Loss,
                    ScoreOutcome::AwayWin => FormResult::Win,
                    ScoreOutcome::Draw => FormResult::Draw,
                }
            } else {
                return None;
            };
            Some((sort_stamp(m), result))
        })
        .collect();
    played.sort_by(|a, b| b.0.cmp(&a.0));
    played.into_iter().take(n).map(|(_, r)| r).collect()
}

fn sort_stamp(m: &Value) -> String {
    format!(
        "{} {}",
        str_field(Some(m), "date").unwrap_or_default(),
        str_field(Some(m), "time").unwrap_or_default()
    )
}
