use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use uzllf_terminal::api::HttpLeagueApi;
use uzllf_terminal::config::Config;
use uzllf_terminal::locale::{Locale, LocaleResolver, resolve_field};
use uzllf_terminal::matches::{
    MatchStatus, combine_matches, filter_matches, kickoff_label, league_name, match_score,
    match_status, team_form, team_names,
};
use uzllf_terminal::media::{filter_gallery, headline, media_url, other_news, published_on};
use uzllf_terminal::pages::{Mounts, screen_queries};
use uzllf_terminal::persist::PrefsStore;
use uzllf_terminal::players::{
    player_age, player_events, player_team, position_label, project_players, top_scorers,
};
use uzllf_terminal::projection::{count, entity_id, format_date, items, str_field};
use uzllf_terminal::queries::LeagueQueries;
use uzllf_terminal::query::{QueryClient, QueryKey, QueryState};
use uzllf_terminal::state::{AppState, GalleryTab, Screen};
use uzllf_terminal::teams::{standings, tournament_leagues};

struct App {
    state: AppState,
    client: QueryClient,
    queries: LeagueQueries,
    mounts: Mounts,
    seen_commits: u64,
    reported_errors: HashMap<QueryKey, usize>,
    should_quit: bool,
}

impl App {
    fn new(config: &Config) -> Self {
        let locale = LocaleResolver::load(PrefsStore::resolve(config.prefs_file.clone()));
        let api = Arc::new(HttpLeagueApi::new(config.api_base.clone()));
        Self {
            state: AppState::new(locale),
            client: QueryClient::from_config(config),
            queries: LeagueQueries::new(api),
            mounts: Mounts::default(),
            seen_commits: 0,
            reported_errors: HashMap::new(),
            should_quit: false,
        }
    }

    fn sync_queries(&mut self) {
        let wanted = screen_queries(&self.state, &self.queries, &self.client);
        self.mounts.sync(&mut self.client, wanted);
    }

    fn tick(&mut self) {
        self.client.pump();
        self.sync_queries();
        self.report_errors();
        let total = self.row_ids().len();
        self.state.clamp_selection(total);
    }

    fn report_errors(&mut self) {
        let committed = self.client.stats().committed;
        if committed == self.seen_commits {
            return;
        }
        self.seen_commits = committed;
        for key in self.mounts.keys() {
            let Some(err) = self.client.state(key).and_then(|s| s.error.clone()) else {
                self.reported_errors.remove(key);
                continue;
            };
            let marker = Arc::as_ptr(&err) as usize;
            if self.reported_errors.get(key) == Some(&marker) {
                continue;
            }
            self.reported_errors.insert(key.clone(), marker);
            self.state.push_log(format!("[WARN] {key}: {err}"));
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.search_active {
            match key.code {
                KeyCode::Esc => self.state.clear_search(),
                KeyCode::Enter => self.state.search_active = false,
                KeyCode::Backspace => self.state.pop_search_char(),
                KeyCode::Char(ch) => self.state.push_search_char(ch),
                _ => {}
            }
            return;
        }

        let rows = self.row_ids();
        let total = rows.len();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right => self.state.next_screen(),
            KeyCode::BackTab | KeyCode::Left => self.state.prev_screen(),
            KeyCode::Char(ch @ '1'..='8') => {
                let idx = ch as usize - '1' as usize;
                self.state.set_screen(Screen::ALL[idx]);
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(total),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(total),
            KeyCode::Enter => {
                let id = rows.into_iter().nth(self.state.selected).flatten();
                if self.state.open(id) {
                    self.sync_queries();
                }
            }
            KeyCode::Esc => {
                self.state.close();
            }
            KeyCode::Char('s') => self.state.cycle_sort(),
            KeyCode::Char('p') => self.state.cycle_position(),
            KeyCode::Char('f') => self.state.cycle_status(),
            KeyCode::Char('t') => self.state.toggle_gallery_tab(),
            KeyCode::Char('m') => self.state.load_more(),
            KeyCode::Char('g') => {
                let count = items(self.client.data(&self.queries.leagues().key)).len();
                self.state.next_league(count);
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                self.state.cycle_locale();
            }
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('/') if self.state.screen.has_search() => {
                self.state.search_active = true;
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn refresh(&mut self) {
        let keys: Vec<QueryKey> = self.mounts.keys().to_vec();
        let mut sent = 0;
        for key in &keys {
            if self.client.refetch(key) {
                sent += 1;
            }
        }
        self.state.push_log(format!("[INFO] Refresh sent for {sent} queries"));
    }

    fn data(&self, key: &QueryKey) -> Option<&Value> {
        self.client.data(key)
    }

    fn selected_league(&self) -> Option<String> {
        let leagues = self.queries.leagues().key;
        self.state.selected_league_id(self.data(&leagues))
    }

    /// Id behind each row of the screen's main list, in display order.
    fn row_ids(&self) -> Vec<Option<String>> {
        let lang = self.state.lang();
        let league = self.selected_league().unwrap_or_default();
        match self.state.screen {
            Screen::Home => Vec::new(),
            Screen::Tournaments => items(self.data(&self.queries.tournaments().key))
                .iter()
                .map(entity_id)
                .collect(),
            Screen::Table | Screen::Teams => standings(self.data(&self.queries.teams(&league).key))
                .iter()
                .map(|row| entity_id(row.team))
                .collect(),
            Screen::Players => project_players(
                self.data(&self.queries.players(&league).key),
                &self.state.player_filter,
                self.state.player_sort,
                lang,
            )
            .into_iter()
            .map(entity_id)
            .collect(),
            Screen::Matches => {
                let rows = combine_matches(
                    self.data(&self.queries.last_matches().key),
                    self.data(&self.queries.upcoming_matches().key),
                );
                filter_matches(&rows, &self.state.match_filter, lang)
                    .iter()
                    .map(|row| entity_id(row.source))
                    .collect()
            }
            Screen::News => {
                let key = self.queries.all_news(self.state.news_size).key;
                items(self.data(&key)).iter().map(entity_id).collect()
            }
            Screen::Gallery => {
                let key = self.gallery_key();
                filter_gallery(self.data(&key), &self.state.gallery_search, lang)
                    .into_iter()
                    .map(entity_id)
                    .collect()
            }
        }
    }

    fn gallery_key(&self) -> QueryKey {
        match self.state.gallery_tab {
            GalleryTab::Photos => self.queries.photos(self.state.photos_size).key,
            GalleryTab::Videos => self.queries.videos(self.state.videos_size).key,
        }
    }
}

fn main() -> Result<()> {
    let config = Config::load();
    init_tracing(&config)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(&config);
    let res = run_app(&mut terminal, &mut app);
    app.mounts.release_all(&mut app.client);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

/// The terminal is busy drawing, so events only go to a file when one is set.
fn init_tracing(config: &Config) -> Result<()> {
    let Some(path) = config.log_file.as_ref() else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        app.tick();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Home => render_home(frame, chunks[1], app),
        Screen::Tournaments => render_tournaments(frame, chunks[1], app),
        Screen::Table => render_table(frame, chunks[1], app),
        Screen::Teams => render_teams(frame, chunks[1], app),
        Screen::Players => match app.state.opened_id() {
            Some(id) => render_player_detail(frame, chunks[1], app, id),
            None => render_players(frame, chunks[1], app),
        },
        Screen::Matches => match app.state.opened_id() {
            Some(id) => render_match_detail(frame, chunks[1], app, id),
            None => render_matches(frame, chunks[1], app),
        },
        Screen::News => render_news(frame, chunks[1], app),
        Screen::Gallery => render_gallery(frame, chunks[1], app),
    }

    let footer = Paragraph::new(footer_text(app)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(app: &App) -> String {
    let lang = app.state.lang();
    let tabs = Screen::ALL
        .iter()
        .enumerate()
        .map(|(idx, screen)| {
            let title = screen.title(lang);
            if *screen == app.state.screen {
                format!("[{} {}]", idx + 1, title)
            } else {
                format!(" {} {} ", idx + 1, title)
            }
        })
        .collect::<Vec<_>>()
        .join("");
    let league = league_label(app);
    format!("UZLLF {tabs} | {} | {league}", lang.code())
}

fn league_label(app: &App) -> String {
    let leagues = app.data(&app.queries.leagues().key);
    let lang = app.state.lang();
    let Some(id) = app.selected_league() else {
        return String::new();
    };
    items(leagues)
        .iter()
        .find(|league| entity_id(league).as_deref() == Some(id.as_str()))
        .map(|league| resolve_field(Some(league), "name", lang))
        .unwrap_or_default()
}

fn footer_text(app: &App) -> String {
    let last_log = app.state.logs.back().cloned().unwrap_or_default();
    if app.state.search_active {
        return format!("Search: {}_  (Enter done, Esc clear)\n{last_log}", app.state.search_text());
    }
    let hints = match (app.state.screen, app.state.opened.is_some()) {
        (Screen::Home, _) => "Tab Next | l Lang | r Refresh | ? Help | q Quit",
        (Screen::Tournaments, _) => "j/k Move | l Lang | r Refresh | ? Help | q Quit",
        (Screen::Table, _) => "j/k Move | g League | l Lang | r Refresh | ? Help | q Quit",
        (Screen::Players | Screen::Matches, true) => "Esc Back | l Lang | r Refresh | q Quit",
        (Screen::Teams, _) => "j/k Move | Enter Squad | Esc Close | g League | l Lang | q Quit",
        (Screen::Players, false) => {
            "j/k Move | Enter Open | / Search | p Position | s Sort | g League | q Quit"
        }
        (Screen::Matches, false) => "j/k Move | Enter Open | / League | f Status | l Lang | q Quit",
        (Screen::News, _) => "j/k Move | Enter Open | Esc Close | m More | l Lang | q Quit",
        (Screen::Gallery, _) => "j/k Move | / Search | t Photos/Videos | m More | l Lang | q Quit",
    };
    format!("{hints}\n{last_log}")
}

/// One-line notice for a query with nothing to show yet, or a stale-data warning.
fn query_notice(state: &QueryState) -> Option<String> {
    match (&state.error, state.data.is_some()) {
        (Some(err), false) => Some(format!("Failed to load: {err}. r retries, 1 goes Home.")),
        (Some(err), true) => Some(format!("Showing cached data ({err})")),
        (None, false) if state.is_loading() => Some("Loading...".to_string()),
        _ => None,
    }
}

fn render_rows(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    header: Option<&str>,
    rows: &[String],
    selected: Option<usize>,
    notice: Option<String>,
) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    if let Some(notice) = notice {
        lines.push(Line::styled(notice, Style::default().fg(Color::Yellow)));
    }
    if let Some(header) = header {
        lines.push(Line::styled(
            header.to_string(),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if rows.is_empty() {
        lines.push(Line::styled(
            "Nothing to show",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(lines), inner);
        return;
    }

    let visible = (inner.height as usize).saturating_sub(lines.len()).max(1);
    let (start, end) = visible_range(selected.unwrap_or(0), rows.len(), visible);
    for idx in start..end {
        let style = if selected == Some(idx) {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        lines.push(Line::styled(rows[idx].clone(), style));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_home(frame: &mut Frame, area: Rect, app: &App) {
    let lang = app.state.lang();
    let quads = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(quads[0]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(quads[1]);

    let leagues = app.data(&app.queries.leagues().key);
    let (teams_spec, _) = app.queries.teams_of_first_league(leagues);
    let teams_state = app.client.snapshot(&teams_spec.key);
    let table: Vec<String> = standings(teams_state.data())
        .iter()
        .take(15)
        .map(|row| {
            format!(
                "{:>2} {:<22} {:>3}",
                row.rank,
                truncate(&resolve_field(Some(row.team), "name", lang), 22),
                row.record.points
            )
        })
        .collect();
    render_rows(frame, top[0], "Table", None, &table, None, query_notice(&teams_state));

    let last_key = app.queries.last_matches().key;
    let last_state = app.client.snapshot(&last_key);
    let last: Vec<String> = items(last_state.data())
        .iter()
        .take(8)
        .map(|m| match_row(m, MatchStatus::Finished, lang))
        .collect();
    render_rows(frame, top[1], "Results", None, &last, None, query_notice(&last_state));

    let upcoming_state = app.client.snapshot(&app.queries.upcoming_matches().key);
    let upcoming: Vec<String> = items(upcoming_state.data())
        .iter()
        .map(|m| match_row(m, MatchStatus::Upcoming, lang))
        .collect();
    render_rows(
        frame,
        bottom[0],
        "Upcoming",
        None,
        &upcoming,
        None,
        query_notice(&upcoming_state),
    );

    let news_state = app.client.snapshot(&app.queries.last_news().key);
    let news: Vec<String> = items(news_state.data())
        .iter()
        .map(|n| format!("{} {}", published_on(n), headline(n, lang)))
        .collect();
    render_rows(frame, bottom[1], "News", None, &news, None, query_notice(&news_state));
}

fn render_table(frame: &mut Frame, area: Rect, app: &App) {
    let lang = app.state.lang();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let id = app.selected_league().unwrap_or_default();
    let league = app.data(&app.queries.league(&id).key);
    let title = match resolve_field(league, "name", lang) {
        name if name.is_empty() => "League table".to_string(),
        name => name,
    };
    let teams_state = app.client.snapshot(&app.queries.teams(&id).key);
    let recent = app.data(&app.queries.last_matches().key);
    let rows: Vec<String> = standings(teams_state.data())
        .iter()
        .map(|row| {
            let form: String = entity_id(row.team)
                .map(|team_id| team_form(&team_id, recent, 5).iter().map(|r| r.letter()).collect())
                .unwrap_or_default();
            let r = &row.record;
            format!(
                "{:>2} {:<22} {:>2} {:>2} {:>2} {:>2} {:>3}:{:<3} {:>+4} {:>3} {}",
                row.rank,
                truncate(&resolve_field(Some(row.team), "name", lang), 22),
                r.played,
                r.wins,
                r.draws,
                r.loses,
                r.goals_for,
                r.goals_against,
                r.goal_difference(),
                r.points,
                form
            )
        })
        .collect();
    render_rows(
        frame,
        cols[0],
        &title,
        Some(" # Team                    P  W  D  L   GF:GA    GD Pts Form"),
        &rows,
        Some(app.state.selected),
        query_notice(&teams_state),
    );

    let leaders = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(cols[1]);
    let scorers_state = app.client.snapshot(&app.queries.top_scorers(&id).key);
    let scorers: Vec<String> = top_scorers(scorers_state.data(), 5)
        .iter()
        .map(|p| {
            format!(
                "{:<22} {:>3}",
                truncate(&resolve_field(Some(*p), "name", lang), 22),
                player_events(p).goals
            )
        })
        .collect();
    render_rows(frame, leaders[0], "Top scorers", None, &scorers, None, query_notice(&scorers_state));

    let assists_state = app.client.snapshot(&app.queries.top_assists(&id).key);
    let assists: Vec<String> = items(assists_state.data())
        .iter()
        .take(5)
        .map(|p| {
            format!(
                "{:<22} {:>3}",
                truncate(&resolve_field(Some(p), "name", lang), 22),
                player_events(p).assists
            )
        })
        .collect();
    render_rows(frame, leaders[1], "Top assists", None, &assists, None, query_notice(&assists_state));
}

fn render_tournaments(frame: &mut Frame, area: Rect, app: &App) {
    let lang = app.state.lang();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let state = app.client.snapshot(&app.queries.tournaments().key);
    let tournaments = items(state.data());
    let rows: Vec<String> = tournaments
        .iter()
        .map(|t| resolve_field(Some(t), "name", lang))
        .collect();
    render_rows(
        frame,
        cols[0],
        "Tournaments",
        None,
        &rows,
        Some(app.state.selected),
        query_notice(&state),
    );

    let leagues_state = app.client.snapshot(&app.queries.leagues().key);
    let highlighted = tournaments
        .get(app.state.selected)
        .and_then(entity_id)
        .unwrap_or_default();
    let leagues: Vec<String> = tournament_leagues(leagues_state.data(), &highlighted)
        .iter()
        .map(|league| resolve_field(Some(*league), "name", lang))
        .collect();
    render_rows(frame, cols[1], "Leagues", None, &leagues, None, query_notice(&leagues_state));
}

fn render_teams(frame: &mut Frame, area: Rect, app: &App) {
    let lang = app.state.lang();
    let today = Local::now().date_naive();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let league = app.selected_league().unwrap_or_default();
    let teams_state = app.client.snapshot(&app.queries.teams(&league).key);
    let table = standings(teams_state.data());
    let rows: Vec<String> = table
        .iter()
        .map(|row| {
            format!(
                "{:<26} {:>3}",
                truncate(&resolve_field(Some(row.team), "name", lang), 26),
                row.record.points
            )
        })
        .collect();
    render_rows(
        frame,
        cols[0],
        &format!("Teams ({})", rows.len()),
        None,
        &rows,
        Some(app.state.selected),
        query_notice(&teams_state),
    );

    let Some(team_id) = app.state.opened_id() else {
        render_rows(
            frame,
            cols[1],
            "Squad",
            None,
            &[],
            None,
            Some("Enter opens the squad".to_string()),
        );
        return;
    };
    let team_name = table
        .iter()
        .find(|row| entity_id(row.team).as_deref() == Some(team_id))
        .map(|row| resolve_field(Some(row.team), "name", lang))
        .unwrap_or_default();
    let squad_state = app.client.snapshot(&app.queries.team_players(team_id).key);
    let squad: Vec<String> = items(squad_state.data())
        .iter()
        .map(|p| player_row(p, lang, today))
        .collect();
    render_rows(
        frame,
        cols[1],
        &format!("Squad: {team_name}"),
        Some("  # Name                     Position         Team                 Age  G  A"),
        &squad,
        None,
        query_notice(&squad_state),
    );
}

fn render_players(frame: &mut Frame, area: Rect, app: &App) {
    let lang = app.state.lang();
    let today = Local::now().date_naive();
    let id = app.selected_league().unwrap_or_default();
    let state = app.client.snapshot(&app.queries.players(&id).key);
    let players = project_players(
        state.data(),
        &app.state.player_filter,
        app.state.player_sort,
        lang,
    );
    let rows: Vec<String> = players
        .iter()
        .map(|p| player_row(p, lang, today))
        .collect();
    let position = app
        .state
        .player_filter
        .position
        .map(|pos| pos.label(lang))
        .unwrap_or("*");
    let title = format!(
        "Players ({}) | {} | {} | search: {}",
        rows.len(),
        position,
        app.state.player_sort.label(lang),
        app.state.player_filter.search
    );
    render_rows(
        frame,
        area,
        &title,
        Some("  # Name                     Position         Team                 Age  G  A"),
        &rows,
        Some(app.state.selected),
        query_notice(&state),
    );
}

fn shirt_number(p: &Value) -> String {
    p.get("number")
        .map(|n| match n {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .filter(|n| n != "null")
        .unwrap_or_default()
}

fn player_row(p: &Value, lang: Locale, today: NaiveDate) -> String {
    let events = player_events(p);
    let number = shirt_number(p);
    let age = player_age(p, today)
        .map(|a| a.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:>3} {:<24} {:<16} {:<20} {:>3} {:>2} {:>2}",
        number,
        truncate(&resolve_field(Some(p), "name", lang), 24),
        truncate(&position_label(p, lang), 16),
        truncate(&player_team(p, lang), 20),
        age,
        events.goals,
        events.assists
    )
}

fn render_player_detail(frame: &mut Frame, area: Rect, app: &App, id: &str) {
    let lang = app.state.lang();
    let today = Local::now().date_naive();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(3)])
        .split(area);

    let state = app.client.snapshot(&app.queries.player(id).key);
    let mut lines: Vec<Line> = Vec::new();
    if let Some(notice) = query_notice(&state) {
        lines.push(Line::styled(notice, Style::default().fg(Color::Yellow)));
    }
    if let Some(p) = state.data() {
        let events = player_events(p);
        let age = player_age(p, today)
            .map(|a| a.to_string())
            .unwrap_or_else(|| "-".to_string());
        let birthday = str_field(Some(p), "birthday")
            .map(format_date)
            .unwrap_or_default();
        lines.push(Line::styled(
            format!("#{} {}", shirt_number(p), resolve_field(Some(p), "name", lang)),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::from(format!("Position: {}", position_label(p, lang))));
        lines.push(Line::from(format!("Team: {}", player_team(p, lang))));
        lines.push(Line::from(format!("Born: {birthday}  Age: {age}")));
        lines.push(Line::from(format!(
            "Goals {}  Assists {}  Yellow {}  Red {}",
            events.goals, events.assists, events.yellows, events.reds
        )));
    }
    let profile =
        Paragraph::new(lines).block(Block::default().title("Player").borders(Borders::ALL));
    frame.render_widget(profile, rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    let seasons_state = app.client.snapshot(&app.queries.player_seasons(id).key);
    let seasons: Vec<String> = items(seasons_state.data())
        .iter()
        .map(|season| {
            let span = |key: &str| {
                str_field(Some(season), key)
                    .map(format_date)
                    .unwrap_or_default()
            };
            format!(
                "{:<14} {:<18} {} - {}",
                truncate(&resolve_field(Some(season), "name", lang), 14),
                truncate(&resolve_field(Some(season), "league_name", lang), 18),
                span("start_date"),
                span("end_date")
            )
        })
        .collect();
    render_rows(frame, cols[0], "Seasons", None, &seasons, None, query_notice(&seasons_state));

    let teams_state = app.client.snapshot(&app.queries.player_teams(id).key);
    let teams: Vec<String> = items(teams_state.data())
        .iter()
        .map(|spell| {
            format!(
                "{:<22} {:<14} #{:<3} {}",
                truncate(&player_team(spell, lang), 22),
                truncate(&position_label(spell, lang), 14),
                shirt_number(spell),
                str_field(Some(spell), "status").unwrap_or_default()
            )
        })
        .collect();
    render_rows(frame, cols[1], "Teams", None, &teams, None, query_notice(&teams_state));
}

fn render_matches(frame: &mut Frame, area: Rect, app: &App) {
    let lang = app.state.lang();
    let last_state = app.client.snapshot(&app.queries.last_matches().key);
    let upcoming_state = app.client.snapshot(&app.queries.upcoming_matches().key);
    let combined = combine_matches(last_state.data(), upcoming_state.data());
    let filtered = filter_matches(&combined, &app.state.match_filter, lang);
    let rows: Vec<String> = filtered
        .iter()
        .map(|row| {
            format!(
                "{:<10} {}  {}",
                row.status.label(lang),
                match_row(row.source, row.status, lang),
                league_name(row.source, lang)
            )
        })
        .collect();
    let status = app
        .state
        .match_filter
        .status
        .map(|s| s.label(lang))
        .unwrap_or("*");
    let title = format!(
        "Matches ({}) | status: {} | league: {}",
        rows.len(),
        status,
        app.state.match_filter.league
    );
    let notice = query_notice(&last_state).or_else(|| query_notice(&upcoming_state));
    render_rows(frame, area, &title, None, &rows, Some(app.state.selected), notice);
}

fn match_row(m: &Value, status: MatchStatus, lang: Locale) -> String {
    let (home, away) = team_names(m, lang);
    let score = match (status, match_score(m)) {
        (MatchStatus::Upcoming, _) | (_, None) => " vs ".to_string(),
        (_, Some((h, a))) => format!("{h:>2}-{a:<2}"),
    };
    let live = if status == MatchStatus::Live { " LIVE" } else { "" };
    format!(
        "{:<16} {:>18} {} {:<18}{}",
        kickoff_label(m),
        truncate(&home, 18),
        score,
        truncate(&away, 18),
        live
    )
}

fn render_match_detail(frame: &mut Frame, area: Rect, app: &App, id: &str) {
    let lang = app.state.lang();
    let state = app.client.snapshot(&app.queries.match_detail(id).key);
    let mut lines: Vec<Line> = Vec::new();
    if let Some(notice) = query_notice(&state) {
        lines.push(Line::styled(notice, Style::default().fg(Color::Yellow)));
    }
    if let Some(m) = state.data() {
        let status = match_status(m);
        let (home, away) = team_names(m, lang);
        let score = match (status, match_score(m)) {
            (MatchStatus::Upcoming, _) | (_, None) => "vs".to_string(),
            (_, Some((h, a))) => format!("{h} - {a}"),
        };
        lines.push(Line::styled(
            format!("{home}  {score}  {away}"),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        lines.push(Line::from(format!(
            "{} | {} | {}",
            league_name(m, lang),
            kickoff_label(m),
            status.label(lang)
        )));
        if let Some(link) = str_field(Some(m), "live_link") {
            lines.push(Line::from(format!("Stream: {link}")));
        }
        let h2h = m.get("matches");
        lines.push(Line::from(""));
        lines.push(Line::from(format!(
            "Head to head: {home} {}  draws {}  {away} {}",
            count(h2h, "team_1_wins"),
            count(h2h, "draws"),
            count(h2h, "team_2_wins")
        )));
        let goals = m.get("total_goals_in_season");
        lines.push(Line::from(format!(
            "Season goals: {home} {}  {away} {}",
            count(goals, "team1_goals"),
            count(goals, "team2_goals")
        )));
    }
    let detail = Paragraph::new(lines)
        .wrap(ratatui::widgets::Wrap { trim: true })
        .block(Block::default().title("Match").borders(Borders::ALL));
    frame.render_widget(detail, area);
}

fn render_news(frame: &mut Frame, area: Rect, app: &App) {
    let lang = app.state.lang();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let all_state = app.client.snapshot(&app.queries.all_news(app.state.news_size).key);
    let list = items(all_state.data());
    let rows: Vec<String> = list
        .iter()
        .map(|n| format!("{} {}", published_on(n), headline(n, lang)))
        .collect();
    let title = format!("News ({} of {})", rows.len(), app.state.news_size);
    render_rows(
        frame,
        cols[0],
        &title,
        None,
        &rows,
        Some(app.state.selected),
        query_notice(&all_state),
    );

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(cols[1]);
    let opened = app.state.opened_id();
    let body = match opened {
        Some(id) => {
            let article_state = app.client.snapshot(&app.queries.news(id).key);
            match (article_state.data(), query_notice(&article_state)) {
                (Some(n), _) => format!(
                    "{}\n{}\n\n{}",
                    headline(n, lang),
                    published_on(n),
                    resolve_field(Some(n), "description", lang)
                ),
                (None, notice) => notice.unwrap_or_default(),
            }
        }
        None => "Enter opens the selected article".to_string(),
    };
    let article = Paragraph::new(body)
        .wrap(ratatui::widgets::Wrap { trim: true })
        .block(Block::default().title("Article").borders(Borders::ALL));
    frame.render_widget(article, side[0]);

    let last_state = app.client.snapshot(&app.queries.last_news().key);
    let others: Vec<String> = other_news(last_state.data(), opened, 5)
        .iter()
        .map(|n| headline(n, lang))
        .collect();
    render_rows(frame, side[1], "Other news", None, &others, None, query_notice(&last_state));
}

fn render_gallery(frame: &mut Frame, area: Rect, app: &App) {
    let lang = app.state.lang();
    let key = app.gallery_key();
    let state = app.client.snapshot(&key);
    let shown = filter_gallery(state.data(), &app.state.gallery_search, lang);
    let rows: Vec<String> = shown
        .iter()
        .map(|item| {
            format!(
                "{:<10} {:<40} {}",
                published_on(item),
                truncate(&resolve_field(Some(*item), "description", lang), 40),
                media_url(item).unwrap_or_default()
            )
        })
        .collect();
    let (tab, size) = match app.state.gallery_tab {
        GalleryTab::Photos => ("Photos", app.state.photos_size),
        GalleryTab::Videos => ("Videos", app.state.videos_size),
    };
    let title = format!(
        "{tab} ({} of {size}) | search: {}",
        rows.len(),
        app.state.gallery_search
    );
    render_rows(frame, area, &title, None, &rows, Some(app.state.selected), query_notice(&state));
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "UZLLF Terminal - Help",
        "",
        "Global:",
        "  1-8 / Tab    Switch screen",
        "  l            Cycle language (uz/ru/en)",
        "  g            Next league",
        "  r            Refresh screen data",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Lists:",
        "  j/k or ↑/↓   Move",
        "  Enter        Open team, player, match or article",
        "  Esc          Close the opened detail",
        "  /            Search (players, matches, gallery)",
        "  s            Cycle player sort",
        "  p            Cycle position filter",
        "  f            Cycle match status filter",
        "  t            Photos / videos",
        "  m            Load more (news, gallery)",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
