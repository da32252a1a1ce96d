use chrono::NaiveDate;
use serde_json::{Value, json};

use uzllf_terminal::locale::{Locale, resolve_field};
use uzllf_terminal::matches::{
    FormResult, MatchFilter, MatchStatus, ScoreOutcome, classify_score, combine_matches,
    filter_matches, kickoff_label, match_outcome, match_status, team_form,
};
use uzllf_terminal::media::{filter_gallery, other_news, published_on};
use uzllf_terminal::players::{
    PlayerFilter, PlayerSort, Position, age, filter_players, player_events, player_position,
    position_label, project_players, top_scorers,
};
use uzllf_terminal::projection::{
    compare_localized, count, entity_id, format_date, grow_size, items,
};
use uzllf_terminal::teams::{first_league_id, standings, team_record, tournament_leagues};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ids(list: &[&Value]) -> Vec<String> {
    list.iter().filter_map(|v| entity_id(v)).collect()
}

fn squad() -> Value {
    json!([
        {"uuid": "p1", "name": "Aziz", "name_ru": "Азиз", "position": "forward",
         "goals_count": 4, "assists_count": 1, "birthday": "1998-05-01"},
        {"uuid": "p2", "name": "Bobur", "position": {"code": "goalkeeper", "position_en": "Keeper"},
         "events": {"goals": 0, "assists": 0}, "birthday": "2003-01-20"},
        {"uuid": "p3", "name": "aziz jr", "position": "midfielder",
         "events": {"goals": 4, "assists": 3, "yellows": 2}},
        {"uuid": "p4", "name": "Dilshod", "position": "defender",
         "goals_count": 1, "birthday": "2001-11-30"}
    ])
}

#[test]
fn empty_filter_returns_every_player_in_api_order() {
    let payload = squad();
    let filter = PlayerFilter::default();
    let unsorted = filter_players(Some(&payload), &filter, Locale::Uz);
    assert_eq!(ids(&unsorted), vec!["p1", "p2", "p3", "p4"]);
    assert!(filter_players(None, &filter, Locale::Uz).is_empty());
}

#[test]
fn search_is_case_insensitive_on_localized_name() {
    let payload = squad();
    let filter = PlayerFilter {
        search: "AZIZ".to_string(),
        position: None,
    };
    let out = project_players(Some(&payload), &filter, PlayerSort::Name, Locale::Uz);
    assert_eq!(ids(&out), vec!["p1", "p3"]);

    let ru = PlayerFilter {
        search: "азиз".to_string(),
        position: None,
    };
    let out = project_players(Some(&payload), &ru, PlayerSort::Name, Locale::Ru);
    assert_eq!(ids(&out), vec!["p1"]);
}

#[test]
fn position_filter_reads_codes_and_objects() {
    let payload = squad();
    let keepers = PlayerFilter {
        search: String::new(),
        position: Some(Position::Goalkeeper),
    };
    let out = project_players(Some(&payload), &keepers, PlayerSort::Goals, Locale::En);
    assert_eq!(ids(&out), vec!["p2"]);

    let players = items(Some(&payload));
    assert_eq!(player_position(&players[0]), Some(Position::Forward));
    assert_eq!(position_label(&players[1], Locale::En), "Keeper");
    assert_eq!(position_label(&players[1], Locale::Ru), "Вратарь");
    assert_eq!(position_label(&json!({}), Locale::Uz), "-");
}

#[test]
fn goal_sort_is_stable_for_ties() {
    let payload = squad();
    let out = project_players(
        Some(&payload),
        &PlayerFilter::default(),
        PlayerSort::Goals,
        Locale::Uz,
    );
    assert_eq!(ids(&out), vec!["p1", "p3", "p4", "p2"]);

    let again = project_players(
        Some(&payload),
        &PlayerFilter::default(),
        PlayerSort::Goals,
        Locale::Uz,
    );
    assert_eq!(ids(&out), ids(&again));
}

#[test]
fn age_sort_puts_youngest_first_and_unknown_last() {
    let payload = squad();
    let out = project_players(
        Some(&payload),
        &PlayerFilter::default(),
        PlayerSort::Age,
        Locale::Uz,
    );
    assert_eq!(ids(&out), vec!["p2", "p4", "p1", "p3"]);
}

#[test]
fn name_sort_ignores_case() {
    let payload = squad();
    let out = project_players(
        Some(&payload),
        &PlayerFilter::default(),
        PlayerSort::Name,
        Locale::Uz,
    );
    assert_eq!(ids(&out), vec!["p1", "p3", "p2", "p4"]);
    assert!(compare_localized("ali", "Bek").is_lt());
}

#[test]
fn events_prefer_flat_counts_when_positive() {
    let payload = squad();
    let players = items(Some(&payload));
    let flat = player_events(&players[0]);
    assert_eq!((flat.goals, flat.assists), (4, 1));

    let nested = player_events(&players[2]);
    assert_eq!((nested.goals, nested.assists, nested.yellows), (4, 3, 2));

    let zero_flat = player_events(&json!({"goals_count": 0, "events": {"goals": 2}}));
    assert_eq!(zero_flat.goals, 2);
}

#[test]
fn age_counts_whole_years() {
    let born = date(2000, 3, 15);
    assert_eq!(age(born, date(2024, 3, 14)), Some(23));
    assert_eq!(age(born, date(2024, 3, 15)), Some(24));
    assert_eq!(age(born, date(1999, 1, 1)), None);
}

#[test]
fn top_scorers_takes_leaders() {
    let payload = squad();
    let top = top_scorers(Some(&payload), 2);
    assert_eq!(ids(&top), vec!["p1", "p3"]);
    assert!(top_scorers(None, 5).is_empty());
}

#[test]
fn score_outcomes() {
    assert_eq!(classify_score(2, 2), ScoreOutcome::Draw);
    assert_eq!(classify_score(3, 1), ScoreOutcome::HomeWin);
    assert_eq!(classify_score(0, 4), ScoreOutcome::AwayWin);

    let m = json!({"score": {"team1_score": 0, "team2_score": "4"}});
    assert_eq!(match_outcome(&m), Some(ScoreOutcome::AwayWin));
    assert_eq!(match_outcome(&json!({"score": null})), None);
}

#[test]
fn live_link_overrides_status() {
    let live = json!({"status": "upcoming", "live_link": "https://stream"});
    let upcoming = json!({"status": "upcoming", "live_link": ""});
    let played = json!({"status": "finished"});

    assert_eq!(match_status(&live), MatchStatus::Live);
    assert_eq!(match_status(&upcoming), MatchStatus::Upcoming);
    assert_eq!(match_status(&played), MatchStatus::Finished);
}

fn fixtures() -> (Value, Value) {
    let last = json!([
        {"uuid": "m1", "date": "2024-04-01", "time": "18:00:00", "league": {"name": "Superliga"},
         "team1": {"uuid": "t1", "name": "Navbahor"}, "team2": {"uuid": "t2", "name": "Paxtakor"},
         "score": {"team1_score": 2, "team2_score": 1}},
        {"uuid": "m2", "date": "2024-04-08", "time": "16:00:00", "league": {"name": "Pro liga"},
         "team1": {"uuid": "t3", "name": "Olympic"}, "team2": {"uuid": "t1", "name": "Navbahor"},
         "score": {"team1_score": 1, "team2_score": 1}, "live_link": "https://stream"},
        {"uuid": "m3", "date": "2024-04-15", "time": "19:30:00", "league": {"name": "Superliga"},
         "team1": {"uuid": "t2", "name": "Paxtakor"}, "team2": {"uuid": "t1", "name": "Navbahor"},
         "score": {"team1_score": 3, "team2_score": 0}}
    ]);
    let upcoming = json!({"data": [
        {"uuid": "m4", "date": "2024-04-22", "league": {"name": "Superliga"},
         "team1": {"uuid": "t1"}, "team2": {"uuid": "t3"}}
    ]});
    (last, upcoming)
}

#[test]
fn combined_schedule_tags_sources() {
    let (last, upcoming) = fixtures();
    let rows = combine_matches(Some(&last), Some(&upcoming));
    let statuses: Vec<MatchStatus> = rows.iter().map(|r| r.status).collect();
    assert_eq!(
        statuses,
        vec![
            MatchStatus::Finished,
            MatchStatus::Live,
            MatchStatus::Finished,
            MatchStatus::Upcoming
        ]
    );

    let filter = MatchFilter {
        league: "superLIGA".to_string(),
        status: Some(MatchStatus::Finished),
    };
    let shown = filter_matches(&rows, &filter, Locale::Uz);
    let shown_ids: Vec<String> = shown.iter().filter_map(|r| entity_id(r.source)).collect();
    assert_eq!(shown_ids, vec!["m1", "m3"]);

    assert_eq!(filter_matches(&rows, &MatchFilter::default(), Locale::Uz).len(), 4);
}

#[test]
fn form_uses_finished_matches_newest_first() {
    let (last, _) = fixtures();
    let form = team_form("t1", Some(&last), 5);
    assert_eq!(form, vec![FormResult::Loss, FormResult::Win]);
    assert_eq!(team_form("t1", Some(&last), 1), vec![FormResult::Loss]);
    assert!(team_form("t9", Some(&last), 5).is_empty());
}

#[test]
fn kickoff_label_formats_date_and_time() {
    let (last, upcoming) = fixtures();
    assert_eq!(kickoff_label(&items(Some(&last))[0]), "01.04.2024 18:00");
    assert_eq!(kickoff_label(&items(Some(&upcoming))[0]), "22.04.2024");
}

#[test]
fn standings_order_by_points() {
    let payload = json!([
        {"uuid": "2", "name": "Beta", "data": {"wins": 2, "draws": 1, "loses": 0, "points": 7}},
        {"uuid": "1", "name": "Alpha", "data": {"wins": 3, "draws": 1, "loses": 0, "points": 10}},
        {"uuid": "3", "name": "Gamma", "wins": 2, "draws": 1, "loses": 3}
    ]);
    let rows = standings(Some(&payload));
    let order: Vec<String> = rows.iter().filter_map(|r| entity_id(r.team)).collect();
    assert_eq!(order, vec!["1", "2", "3"]);
    assert_eq!(rows[0].rank, 1);
    assert_eq!(rows[2].record.points, 7);
    assert_eq!(rows[2].record.played, 6);
}

#[test]
fn team_record_reads_nested_stats() {
    let team = json!({"data": {"matches": 5, "wins": 3, "draws": 1, "loses": 1,
                               "goals_for": 9, "goals_against": 4, "points": null}});
    let record = team_record(&team);
    assert_eq!(record.played, 5);
    assert_eq!(record.points, 10);
    assert_eq!(record.goal_difference(), 5);
}

#[test]
fn league_helpers() {
    let leagues = json!({"results": [
        {"id": 4, "name": "Superliga", "tournament": {"uuid": "t-1"}},
        {"id": 5, "name": "Pro liga", "tournament": "t-2"}
    ]});
    assert_eq!(first_league_id(Some(&leagues)), Some("4".to_string()));
    let in_t1 = tournament_leagues(Some(&leagues), "t-1");
    assert_eq!(in_t1.len(), 1);
    assert_eq!(resolve_field(Some(in_t1[0]), "name", Locale::En), "Superliga");
    assert_eq!(first_league_id(Some(&Value::Null)), None);
}

#[test]
fn news_and_gallery_helpers() {
    let news = json!([
        {"uuid": "n1", "title": "One", "created_at": "2024-05-02T10:00:00Z"},
        {"uuid": "n2", "title": "Two"},
        {"uuid": "n3", "title": "Three"}
    ]);
    let others = other_news(Some(&news), Some("n2"), 5);
    let other_ids: Vec<String> = others.iter().filter_map(|v| entity_id(v)).collect();
    assert_eq!(other_ids, vec!["n1", "n3"]);
    assert_eq!(published_on(&items(Some(&news))[0]), "02.05.2024");

    let photos = json!([
        {"uuid": "g1", "description": "Final match", "description_ru": "Финал"},
        {"uuid": "g2", "description": "Training"}
    ]);
    assert_eq!(filter_gallery(Some(&photos), "финал", Locale::Ru).len(), 1);
    assert_eq!(filter_gallery(Some(&photos), "", Locale::Uz).len(), 2);
}

#[test]
fn load_more_caps_at_max() {
    assert_eq!(grow_size(90, 12, 96), 96);
    assert_eq!(grow_size(20, 10, 100), 30);
}

#[test]
fn lenient_counts_and_dates() {
    let entity = json!({"a": 3, "b": "5", "c": -2, "d": "x"});
    assert_eq!(count(Some(&entity), "a"), 3);
    assert_eq!(count(Some(&entity), "b"), 5);
    assert_eq!(count(Some(&entity), "c"), 0);
    assert_eq!(count(Some(&entity), "d"), 0);
    assert_eq!(count(None, "a"), 0);
    assert_eq!(format_date("2024-01-09"), "09.01.2024");
    assert_eq!(format_date("soon"), "soon");
}
