use std::collections::VecDeque;

use serde_json::Value;

use crate::locale::{Locale, LocaleResolver};
use crate::matches::{MatchFilter, MatchStatus};
use crate::media::{GALLERY_SIZE_MAX, GALLERY_SIZE_STEP, NEWS_SIZE_MAX, NEWS_SIZE_STEP};
use crate::players::{PlayerFilter, PlayerSort, Position};
use crate::projection::grow_size;
use crate::teams::league_ids;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Home,
    Tournaments,
    Table,
    Teams,
    Players,
    Matches,
    News,
    Gallery,
}

impl Screen {
    pub const ALL: [Screen; 8] = [
        Screen::Home,
        Screen::Tournaments,
        Screen::Table,
        Screen::Teams,
        Screen::Players,
        Screen::Matches,
        Screen::News,
        Screen::Gallery,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn title(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Uz, Screen::Home) => "Bosh sahifa",
            (Locale::Uz, Screen::Tournaments) => "Turnirlar",
            (Locale::Uz, Screen::Table) => "Jadval",
            (Locale::Uz, Screen::Teams) => "Jamoalar",
            (Locale::Uz, Screen::Players) => "O'yinchilar",
            (Locale::Uz, Screen::Matches) => "O'yinlar",
            (Locale::Uz, Screen::News) => "Yangiliklar",
            (Locale::Uz, Screen::Gallery) => "Galereya",
            (Locale::Ru, Screen::Home) => "Главная",
            (Locale::Ru, Screen::Tournaments) => "Турниры",
            (Locale::Ru, Screen::Table) => "Таблица",
            (Locale::Ru, Screen::Teams) => "Команды",
            (Locale::Ru, Screen::Players) => "Игроки",
            (Locale::Ru, Screen::Matches) => "Матчи",
            (Locale::Ru, Screen::News) => "Новости",
            (Locale::Ru, Screen::Gallery) => "Галерея",
            (Locale::En, Screen::Home) => "Home",
            (Locale::En, Screen::Tournaments) => "Tournaments",
            (Locale::En, Screen::Table) => "Table",
            (Locale::En, Screen::Teams) => "Teams",
            (Locale::En, Screen::Players) => "Players",
            (Locale::En, Screen::Matches) => "Matches",
            (Locale::En, Screen::News) => "News",
            (Locale::En, Screen::Gallery) => "Gallery",
        }
    }

    /// Screens with a text filter the keyboard can type into.
    pub fn has_search(self) -> bool {
        matches!(self, Screen::Players | Screen::Matches | Screen::Gallery)
    }

    /// Screens where Enter on a row opens a detail view backed by its own query.
    pub fn opens_detail(self) -> bool {
        matches!(
            self,
            Screen::Teams | Screen::Players | Screen::Matches | Screen::News
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryTab {
    Photos,
    Videos,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub locale: LocaleResolver,
    pub league_index: usize,
    pub player_filter: PlayerFilter,
    pub player_sort: PlayerSort,
    pub match_filter: MatchFilter,
    pub gallery_tab: GalleryTab,
    pub gallery_search: String,
    pub photos_size: u32,
    pub videos_size: u32,
    pub news_size: u32,
    pub search_active: bool,
    pub selected: usize,
    pub opened: Option<String>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(LocaleResolver::default())
    }
}

impl AppState {
    pub fn new(locale: LocaleResolver) -> Self {
        Self {
            screen: Screen::Home,
            locale,
            league_index: 0,
            player_filter: PlayerFilter::default(),
            player_sort: PlayerSort::default(),
            match_filter: MatchFilter::default(),
            gallery_tab: GalleryTab::Photos,
            gallery_search: String::new(),
            photos_size: 24,
            videos_size: 12,
            news_size: 20,
            search_active: false,
            selected: 0,
            opened: None,
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
        }
    }

    pub fn lang(&self) -> Locale {
        self.locale.locale()
    }

    pub fn set_screen(&mut self, screen: Screen) {
        if self.screen == screen {
            return;
        }
        self.screen = screen;
        self.selected = 0;
        self.opened = None;
        self.search_active = false;
    }

    pub fn next_screen(&mut self) {
        self.set_screen(self.screen.next());
    }

    pub fn prev_screen(&mut self) {
        self.set_screen(self.screen.prev());
    }

    pub fn cycle_sort(&mut self) {
        self.player_sort = self.player_sort.next();
        self.selected = 0;
    }

    pub fn cycle_position(&mut self) {
        self.player_filter.position = match self.player_filter.position {
            None => Some(Position::Goalkeeper),
            Some(Position::Goalkeeper) => Some(Position::Defender),
            Some(Position::Defender) => Some(Position::Midfielder),
            Some(Position::Midfielder) => Some(Position::Forward),
            Some(Position::Forward) => None,
        };
        self.selected = 0;
    }

    pub fn cycle_status(&mut self) {
        self.match_filter.status = match self.match_filter.status {
            None => Some(MatchStatus::Finished),
            Some(MatchStatus::Finished) => Some(MatchStatus::Upcoming),
            Some(MatchStatus::Upcoming) => Some(MatchStatus::Live),
            Some(MatchStatus::Live) => None,
        };
        self.selected = 0;
    }

    pub fn toggle_gallery_tab(&mut self) {
        self.gallery_tab = match self.gallery_tab {
            GalleryTab::Photos => GalleryTab::Videos,
            GalleryTab::Videos => GalleryTab::Photos,
        };
        self.selected = 0;
    }

    /// Next language in the fixed rotation. Projections pick it up on the next
    /// render; no query is touched.
    pub fn cycle_locale(&mut self) -> Locale {
        let next = self.lang().next();
        self.locale.set_locale(next.code());
        self.push_log(format!("[INFO] Language: {}", next.code()));
        next
    }

    /// Larger page size for list screens that grow on demand.
    pub fn load_more(&mut self) {
        match self.screen {
            Screen::News => {
                self.news_size = grow_size(self.news_size, NEWS_SIZE_STEP, NEWS_SIZE_MAX);
            }
            Screen::Gallery => match self.gallery_tab {
                GalleryTab::Photos => {
                    self.photos_size =
                        grow_size(self.photos_size, GALLERY_SIZE_STEP, GALLERY_SIZE_MAX);
                }
                GalleryTab::Videos => {
                    self.videos_size =
                        grow_size(self.videos_size, GALLERY_SIZE_STEP, GALLERY_SIZE_MAX);
                }
            },
            _ => {}
        }
    }

    pub fn next_league(&mut self, league_count: usize) {
        if league_count == 0 {
            self.league_index = 0;
            return;
        }
        self.league_index = (self.league_index + 1) % league_count;
        self.selected = 0;
        self.opened = None;
    }

    /// Opens the detail view for the row `id` belongs to. Rows without an id and
    /// screens without a detail view leave the state untouched.
    pub fn open(&mut self, id: Option<String>) -> bool {
        if !self.screen.opens_detail() {
            return false;
        }
        let Some(id) = id.filter(|id| !id.trim().is_empty()) else {
            return false;
        };
        self.opened = Some(id);
        true
    }

    pub fn close(&mut self) -> bool {
        self.opened.take().is_some()
    }

    pub fn opened_id(&self) -> Option<&str> {
        self.opened.as_deref()
    }

    pub fn selected_league_id(&self, leagues: Option<&Value>) -> Option<String> {
        let ids = league_ids(leagues);
        if ids.is_empty() {
            return None;
        }
        ids.get(self.league_index.min(ids.len() - 1)).cloned()
    }

    fn search_buffer(&mut self) -> Option<&mut String> {
        match self.screen {
            Screen::Players => Some(&mut self.player_filter.search),
            Screen::Matches => Some(&mut self.match_filter.league),
            Screen::Gallery => Some(&mut self.gallery_search),
            _ => None,
        }
    }

    pub fn search_text(&self) -> &str {
        match self.screen {
            Screen::Players => &self.player_filter.search,
            Screen::Matches => &self.match_filter.league,
            Screen::Gallery => &self.gallery_search,
            _ => "",
        }
    }

    pub fn push_search_char(&mut self, ch: char) {
        if let Some(buf) = self.search_buffer() {
            buf.push(ch);
            self.selected = 0;
        }
    }

    pub fn pop_search_char(&mut self) {
        if let Some(buf) = self.search_buffer() {
            buf.pop();
            self.selected = 0;
        }
    }

    pub fn clear_search(&mut self) {
        if let Some(buf) = self.search_buffer() {
            buf.clear();
        }
        self.search_active = false;
        self.selected = 0;
    }

    pub fn select_next(&mut self, total: usize) {
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self, total: usize) {
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn clamp_selection(&mut self, total: usize) {
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}
