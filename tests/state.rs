use serde_json::json;

use uzllf_terminal::locale::{Locale, LocaleResolver};
use uzllf_terminal::matches::MatchStatus;
use uzllf_terminal::media::{GALLERY_SIZE_MAX, NEWS_SIZE_MAX};
use uzllf_terminal::players::{PlayerSort, Position};
use uzllf_terminal::state::{AppState, GalleryTab, Screen};

fn state() -> AppState {
    AppState::new(LocaleResolver::new(Locale::Uz))
}

#[test]
fn screens_cycle_both_ways() {
    let mut state = state();
    assert_eq!(state.screen, Screen::Home);
    state.prev_screen();
    assert_eq!(state.screen, Screen::Gallery);
    state.next_screen();
    state.next_screen();
    assert_eq!(state.screen, Screen::Tournaments);
    state.next_screen();
    assert_eq!(state.screen, Screen::Table);
    assert_eq!(Screen::ALL.len(), 8);
    assert_eq!(Screen::Players.title(Locale::Ru), "Игроки");
    assert_eq!(Screen::Teams.title(Locale::Uz), "Jamoalar");
}

#[test]
fn detail_opens_only_where_rows_have_one() {
    let mut state = state();
    assert!(!state.open(Some("7".to_string())));
    assert_eq!(state.opened_id(), None);

    state.set_screen(Screen::Matches);
    assert!(!state.open(None));
    assert!(state.open(Some("m1".to_string())));
    assert_eq!(state.opened_id(), Some("m1"));
    assert!(state.close());
    assert!(!state.close());

    state.open(Some("m2".to_string()));
    state.set_screen(Screen::News);
    assert_eq!(state.opened_id(), None);
    assert!(!Screen::Gallery.opens_detail());
    assert!(Screen::Players.opens_detail());
}

#[test]
fn switching_screens_resets_selection_and_search_mode() {
    let mut state = state();
    state.set_screen(Screen::Players);
    state.search_active = true;
    state.select_next(5);
    state.select_next(5);
    assert_eq!(state.selected, 2);

    state.set_screen(Screen::News);
    assert_eq!(state.selected, 0);
    assert!(!state.search_active);
}

#[test]
fn load_more_grows_to_cap() {
    let mut state = state();
    state.set_screen(Screen::News);
    for _ in 0..20 {
        state.load_more();
    }
    assert_eq!(state.news_size, NEWS_SIZE_MAX);

    state.set_screen(Screen::Gallery);
    state.toggle_gallery_tab();
    assert_eq!(state.gallery_tab, GalleryTab::Videos);
    state.load_more();
    assert_eq!(state.videos_size, 24);
    assert_eq!(state.photos_size, 24);
    for _ in 0..20 {
        state.load_more();
    }
    assert_eq!(state.videos_size, GALLERY_SIZE_MAX);
}

#[test]
fn search_text_goes_to_current_screen() {
    let mut state = state();
    state.set_screen(Screen::Players);
    for ch in "Ali".chars() {
        state.push_search_char(ch);
    }
    state.pop_search_char();
    assert_eq!(state.player_filter.search, "Al");

    state.set_screen(Screen::Matches);
    state.push_search_char('S');
    assert_eq!(state.match_filter.league, "S");
    assert_eq!(state.search_text(), "S");

    state.clear_search();
    assert_eq!(state.match_filter.league, "");
    assert_eq!(state.player_filter.search, "Al");

    state.set_screen(Screen::Home);
    state.push_search_char('x');
    assert_eq!(state.search_text(), "");
}

#[test]
fn filters_cycle_back_to_none() {
    let mut state = state();
    state.cycle_position();
    assert_eq!(state.player_filter.position, Some(Position::Goalkeeper));
    for _ in 0..4 {
        state.cycle_position();
    }
    assert_eq!(state.player_filter.position, None);

    state.cycle_status();
    assert_eq!(state.match_filter.status, Some(MatchStatus::Finished));

    state.cycle_sort();
    assert_eq!(state.player_sort, PlayerSort::Assists);
}

#[test]
fn selection_wraps_and_clamps() {
    let mut state = state();
    state.select_prev(3);
    assert_eq!(state.selected, 2);
    state.select_next(3);
    assert_eq!(state.selected, 0);

    state.selected = 9;
    state.clamp_selection(4);
    assert_eq!(state.selected, 3);
    state.clamp_selection(0);
    assert_eq!(state.selected, 0);
}

#[test]
fn league_selection_follows_index() {
    let mut state = state();
    let leagues = json!([{"uuid": "7"}, {"uuid": "9"}]);
    assert_eq!(state.selected_league_id(Some(&leagues)), Some("7".to_string()));
    state.next_league(2);
    assert_eq!(state.selected_league_id(Some(&leagues)), Some("9".to_string()));
    state.next_league(2);
    assert_eq!(state.selected_league_id(Some(&leagues)), Some("7".to_string()));
    assert_eq!(state.selected_league_id(None), None);
}

#[test]
fn locale_cycle_logs_choice() {
    let mut state = state();
    assert_eq!(state.cycle_locale(), Locale::Ru);
    assert_eq!(state.lang(), Locale::Ru);
    assert!(state.logs.back().is_some_and(|line| line.contains("ru")));

    for idx in 0..250 {
        state.push_log(format!("line {idx}"));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.back().map(String::as_str), Some("line 249"));
}
