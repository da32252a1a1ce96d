use std::sync::Arc;

use serde_json::Value;

use crate::api::LeagueApi;
use crate::query::{FetchFn, QueryKey, QueryOptions, fetch_fn};
use crate::teams::first_league_id;

#[derive(Clone)]
pub struct QuerySpec {
    pub key: QueryKey,
    pub fetch: FetchFn,
}

#[derive(Clone)]
pub struct LeagueQueries {
    api: Arc<dyn LeagueApi>,
}

macro_rules! plain_query {
    ($name:ident, $key:literal, $call:ident) => {
        pub fn $name(&self) -> QuerySpec {
            let api = self.api.clone();
            QuerySpec {
                key: QueryKey::new($key),
                fetch: fetch_fn(move || api.$call()),
            }
        }
    };
}

macro_rules! id_query {
    ($name:ident, $key:literal, $call:ident) => {
        pub fn $name(&self, id: &str) -> QuerySpec {
            let api = self.api.clone();
            let owned = id.to_string();
            QuerySpec {
                key: QueryKey::new($key).with(id),
                fetch: fetch_fn(move || api.$call(&owned)),
            }
        }
    };
}

macro_rules! sized_query {
    ($name:ident, $key:literal, $call:ident) => {
        pub fn $name(&self, size: u32) -> QuerySpec {
            let api = self.api.clone();
            QuerySpec {
                key: QueryKey::new($key).with(size),
                fetch: fetch_fn(move || api.$call(size)),
            }
        }
    };
}

impl LeagueQueries {
    pub fn new(api: Arc<dyn LeagueApi>) -> Self {
        Self { api }
    }

    plain_query!(tournaments, "tournaments", tournaments);
    plain_query!(leagues, "leagues", leagues);
    plain_query!(last_matches, "lastMatches", last_matches);
    plain_query!(upcoming_matches, "upcomingMatches", upcoming_matches);
    plain_query!(last_news, "lastNews", last_news);

    id_query!(league, "league", league);
    id_query!(teams, "teams", teams_by_league);
    id_query!(match_detail, "matchDetails", match_detail);
    id_query!(players, "players", players_by_league);
    id_query!(top_scorers, "topScorers", players_by_league);
    id_query!(top_assists, "topAssists", assists_by_league);
    id_query!(player, "playerDetails", player);
    id_query!(player_seasons, "playerSeasons", player_seasons);
    id_query!(player_teams, "playerTeams", player_teams);
    id_query!(team_players, "teamPlayers", players_by_team);
    id_query!(news, "newsDetails", news);

    sized_query!(all_news, "allNews", all_news);
    sized_query!(photos, "galleryPhotos", photos);
    sized_query!(videos, "galleryVideos", videos);

    /// Teams of the first listed league. Inert until `leagues` has resolved to a
    /// non-empty list.
    pub fn teams_of_first_league(&self, leagues: Option<&Value>) -> (QuerySpec, QueryOptions) {
        match first_league_id(leagues) {
            Some(id) => (self.teams(&id), QueryOptions::default()),
            None => (self.teams(""), QueryOptions::disabled()),
        }
    }

    /// A query keyed by a picked id. Inert until something is picked.
    pub fn for_selection(
        &self,
        selected: Option<&str>,
        build: impl FnOnce(&Self, &str) -> QuerySpec,
    ) -> (QuerySpec, QueryOptions) {
        let id = selected.map(str::trim).unwrap_or_default();
        (build(self, id), QueryOptions::enabled_if(!id.is_empty()))
    }
}
