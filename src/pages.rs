use crate::queries::{LeagueQueries, QuerySpec};
use crate::query::{QueryClient, QueryKey, QueryOptions};
use crate::state::{AppState, GalleryTab, Screen};

/// Queries the current screen needs, in declaration order. Dependent queries
/// read their upstream payload straight from `client`; detail queries wait for
/// `state.opened`.
pub fn screen_queries(
    state: &AppState,
    queries: &LeagueQueries,
    client: &QueryClient,
) -> Vec<(QuerySpec, QueryOptions)> {
    let enabled = QueryOptions::default;
    let leagues = queries.leagues();
    let selected_league = state.selected_league_id(client.data(&leagues.key));
    let league = selected_league.as_deref();
    let opened = state.opened_id();

    match state.screen {
        Screen::Home => {
            let home_teams = queries.teams_of_first_league(client.data(&leagues.key));
            vec![
                (leagues, enabled()),
                (queries.last_matches(), enabled()),
                (queries.upcoming_matches(), enabled()),
                (queries.last_news(), enabled()),
                home_teams,
            ]
        }
        Screen::Tournaments => vec![(queries.tournaments(), enabled()), (leagues, enabled())],
        Screen::Table => vec![
            (leagues, enabled()),
            (queries.last_matches(), enabled()),
            queries.for_selection(league, LeagueQueries::league),
            queries.for_selection(league, LeagueQueries::teams),
            queries.for_selection(league, LeagueQueries::top_scorers),
            queries.for_selection(league, LeagueQueries::top_assists),
        ],
        Screen::Teams => vec![
            (leagues, enabled()),
            queries.for_selection(league, LeagueQueries::teams),
            queries.for_selection(opened, LeagueQueries::team_players),
        ],
        Screen::Players => vec![
            (leagues, enabled()),
            queries.for_selection(league, LeagueQueries::players),
            queries.for_selection(opened, LeagueQueries::player),
            queries.for_selection(opened, LeagueQueries::player_seasons),
            queries.for_selection(opened, LeagueQueries::player_teams),
        ],
        Screen::Matches => vec![
            (leagues, enabled()),
            (queries.last_matches(), enabled()),
            (queries.upcoming_matches(), enabled()),
            queries.for_selection(opened, LeagueQueries::match_detail),
        ],
        Screen::News => vec![
            (queries.all_news(state.news_size), enabled()),
            (queries.last_news(), enabled()),
            queries.for_selection(opened, LeagueQueries::news),
        ],
        Screen::Gallery => {
            let spec = match state.gallery_tab {
                GalleryTab::Photos => queries.photos(state.photos_size),
                GalleryTab::Videos => queries.videos(state.videos_size),
            };
            vec![(spec, enabled())]
        }
    }
}

/// Keys the UI currently holds an observer on.
#[derive(Debug, Default)]
pub struct Mounts {
    keys: Vec<QueryKey>,
}

impl Mounts {
    pub fn keys(&self) -> &[QueryKey] {
        &self.keys
    }

    /// New keys get mounted, kept keys rebound, dropped keys released.
    pub fn sync(&mut self, client: &mut QueryClient, wanted: Vec<(QuerySpec, QueryOptions)>) {
        let mut next: Vec<QueryKey> = Vec::with_capacity(wanted.len());
        for (spec, options) in wanted {
            if next.contains(&spec.key) {
                continue;
            }
            if self.keys.contains(&spec.key) {
                client.rebind(&spec.key, spec.fetch, options);
            } else {
                client.query(spec.key.clone(), spec.fetch, options);
            }
            next.push(spec.key);
        }
        for key in self.keys.drain(..) {
            if !next.contains(&key) {
                client.release(&key);
            }
        }
        self.keys = next;
    }

    pub fn release_all(&mut self, client: &mut QueryClient) {
        for key in self.keys.drain(..) {
            client.release(&key);
        }
    }
}
