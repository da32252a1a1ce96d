use reqwest::StatusCode;
use serde_json::{Value, json};

use uzllf_terminal::api::{
    ApiError, COMMENT_PATH, CommentDraft, Endpoint, endpoint_url, parse_payload,
};
use uzllf_terminal::config::{Config, DEFAULT_API_BASE};
use uzllf_terminal::queries::LeagueQueries;
use uzllf_terminal::query::QueryKey;

#[test]
fn endpoint_paths_match_server_routes() {
    let base = "https://testapi.uzllf.uz/api/v1/";
    assert_eq!(
        endpoint_url(base, &Endpoint::TeamsByLeague("5".to_string())),
        "https://testapi.uzllf.uz/api/v1/home/teamsbyleague/5"
    );
    assert_eq!(Endpoint::Leagues.path(), "/home/leaguelist/");
    assert_eq!(Endpoint::AllNews(20).path(), "/news/allnews/?size=20");
    assert_eq!(Endpoint::Photos(24).path(), "/news/galery_photos/?size=24");
    assert_eq!(
        Endpoint::TopPlayers(2024).path(),
        "/home/top_players_by_year/?year=2024"
    );
    assert_eq!(Endpoint::UpcomingMatches.path(), "/home/expec4matches/");
}

#[test]
fn payload_parsing() {
    assert_eq!(parse_payload("").unwrap(), Value::Null);
    assert_eq!(parse_payload("  [1, 2] ").unwrap(), json!([1, 2]));
    assert!(matches!(parse_payload("<html>"), Err(ApiError::Decode(_))));
}

#[test]
fn error_accessors() {
    let err = ApiError::Status {
        status: StatusCode::NOT_FOUND,
        body: "missing".to_string(),
    };
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert!(!err.is_timeout());
    assert!(err.to_string().contains("404"));
    assert!(ApiError::Timeout.is_timeout());
    assert_eq!(ApiError::Timeout.status(), None);
}

#[test]
fn default_config() {
    let config = Config::default();
    assert_eq!(config.api_base, DEFAULT_API_BASE);
    assert!(config.stale_time.is_zero());
    assert_eq!(config.fetch_parallelism, 4);
}

#[test]
fn query_keys_carry_their_parameters() {
    let api = std::sync::Arc::new(uzllf_terminal::api::HttpLeagueApi::new(DEFAULT_API_BASE));
    let queries = LeagueQueries::new(api);

    assert_eq!(queries.leagues().key, QueryKey::new("leagues"));
    assert_eq!(queries.teams("7").key, QueryKey::new("teams").with("7"));
    assert_eq!(queries.all_news(30).key, QueryKey::new("allNews").with(30u32));
    assert_ne!(queries.top_scorers("7").key, queries.players("7").key);

    let (spec, options) = queries.for_selection(Some("  "), LeagueQueries::players);
    assert!(!options.enabled);
    assert_eq!(spec.key, QueryKey::new("players").with(""));

    let (spec, options) = queries.for_selection(None, LeagueQueries::team_players);
    assert!(!options.enabled);
    assert_eq!(spec.key, QueryKey::new("teamPlayers").with(""));

    let (spec, options) = queries.for_selection(Some("p4"), LeagueQueries::player_seasons);
    assert!(options.enabled);
    assert_eq!(spec.key, QueryKey::new("playerSeasons").with("p4"));
}

#[test]
fn comment_body_shape() {
    let draft = CommentDraft {
        news: "n1".to_string(),
        name: "Ali".to_string(),
        text: "Great match".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&draft).unwrap(),
        json!({"news": "n1", "name": "Ali", "text": "Great match"})
    );
    assert_eq!(COMMENT_PATH, "/news/comment/");
}
