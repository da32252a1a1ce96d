use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::http_client::http_client;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("http {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid json: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("http client unavailable: {0}")]
    Client(String),
}

impl ApiError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout)
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Transport(err)
        }
    }
}

pub type ApiResult = Result<Value, ApiError>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Tournaments,
    Leagues,
    League(String),
    TeamsByLeague(String),
    LastMatches,
    UpcomingMatches,
    Match(String),
    PlayersByLeague(String),
    AssistsByLeague(String),
    TopPlayers(u32),
    Player(String),
    PlayerSeasons(String),
    PlayerTeams(String),
    PlayersByTeam(String),
    Coaches,
    Referees,
    LastNews,
    AllNews(u32),
    News(String),
    Photos(u32),
    Videos(u32),
    LastMedia,
    Partners,
    Socials,
    AboutUs,
    Organizers,
}

impl Endpoint {
    /// Path (and query string) relative to the API base.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Tournaments => "/home/tournament_list/".to_string(),
            Endpoint::Leagues => "/home/leaguelist/".to_string(),
            Endpoint::League(id) => format!("/home/get_league/{id}"),
            Endpoint::TeamsByLeague(id) => format!("/home/teamsbyleague/{id}"),
            Endpoint::LastMatches => "/home/last10matches/".to_string(),
            Endpoint::UpcomingMatches => "/home/expec4matches/".to_string(),
            Endpoint::Match(id) => format!("/home/match/{id}"),
            Endpoint::PlayersByLeague(id) => format!("/home/playerbyleague/{id}"),
            Endpoint::AssistsByLeague(id) => format!("/home/assistsbyleague/{id}"),
            Endpoint::TopPlayers(year) => format!("/home/top_players_by_year/?year={year}"),
            Endpoint::Player(id) => format!("/home/player/{id}"),
            Endpoint::PlayerSeasons(id) => format!("/home/player_seasons/{id}"),
            Endpoint::PlayerTeams(id) => format!("/home/player_teams/{id}"),
            Endpoint::PlayersByTeam(id) => format!("/home/playerbyteam/{id}"),
            Endpoint::Coaches => "/home/coach_list/".to_string(),
            Endpoint::Referees => "/home/referee_list/".to_string(),
            Endpoint::LastNews => "/news/last4news/".to_string(),
            Endpoint::AllNews(size) => format!("/news/allnews/?size={size}"),
            Endpoint::News(id) => format!("/news/news/{id}"),
            Endpoint::Photos(size) => format!("/news/galery_photos/?size={size}"),
            Endpoint::Videos(size) => format!("/news/galery_videos/?size={size}"),
            Endpoint::LastMedia => "/news/last5media/".to_string(),
            Endpoint::Partners => "/news/partners/".to_string(),
            Endpoint::Socials => "/news/socials/".to_string(),
            Endpoint::AboutUs => "/news/aboutus/".to_string(),
            Endpoint::Organizers => "/news/organizator_list/".to_string(),
        }
    }
}

pub const COMMENT_PATH: &str = "/news/comment/";

pub fn endpoint_url(base: &str, endpoint: &Endpoint) -> String {
    join_url(base, &endpoint.path())
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentDraft {
    pub news: String,
    pub name: String,
    pub text: String,
}

/// The only way the rest of the crate talks to the network.
pub trait LeagueApi: Send + Sync {
    fn get(&self, endpoint: &Endpoint) -> ApiResult;

    fn post_comment(&self, draft: &CommentDraft) -> ApiResult;

    fn tournaments(&self) -> ApiResult {
        self.get(&Endpoint::Tournaments)
    }

    fn leagues(&self) -> ApiResult {
        self.get(&Endpoint::Leagues)
    }

    fn league(&self, league_id: &str) -> ApiResult {
        self.get(&Endpoint::League(league_id.to_string()))
    }

    fn teams_by_league(&self, league_id: &str) -> ApiResult {
        self.get(&Endpoint::TeamsByLeague(league_id.to_string()))
    }

    fn last_matches(&self) -> ApiResult {
        self.get(&Endpoint::LastMatches)
    }

    fn upcoming_matches(&self) -> ApiResult {
        self.get(&Endpoint::UpcomingMatches)
    }

    fn match_detail(&self, match_id: &str) -> ApiResult {
        self.get(&Endpoint::Match(match_id.to_string()))
    }

    fn players_by_league(&self, league_id: &str) -> ApiResult {
        self.get(&Endpoint::PlayersByLeague(league_id.to_string()))
    }

    fn assists_by_league(&self, league_id: &str) -> ApiResult {
        self.get(&Endpoint::AssistsByLeague(league_id.to_string()))
    }

    fn top_players(&self, year: u32) -> ApiResult {
        self.get(&Endpoint::TopPlayers(year))
    }

    fn player(&self, player_id: &str) -> ApiResult {
        self.get(&Endpoint::Player(player_id.to_string()))
    }

    fn player_seasons(&self, player_id: &str) -> ApiResult {
        self.get(&Endpoint::PlayerSeasons(player_id.to_string()))
    }

    fn player_teams(&self, player_id: &str) -> ApiResult {
        self.get(&Endpoint::PlayerTeams(player_id.to_string()))
    }

    fn players_by_team(&self, team_id: &str) -> ApiResult {
        self.get(&Endpoint::PlayersByTeam(team_id.to_string()))
    }

    fn coaches(&self) -> ApiResult {
        self.get(&Endpoint::Coaches)
    }

    fn referees(&self) -> ApiResult {
        self.get(&Endpoint::Referees)
    }

    fn last_news(&self) -> ApiResult {
        self.get(&Endpoint::LastNews)
    }

    fn all_news(&self, size: u32) -> ApiResult {
        self.get(&Endpoint::AllNews(size))
    }

    fn news(&self, news_id: &str) -> ApiResult {
        self.get(&Endpoint::News(news_id.to_string()))
    }

    fn photos(&self, size: u32) -> ApiResult {
        self.get(&Endpoint::Photos(size))
    }

    fn videos(&self, size: u32) -> ApiResult {
        self.get(&Endpoint::Videos(size))
    }

    fn last_media(&self) -> ApiResult {
        self.get(&Endpoint::LastMedia)
    }

    fn partners(&self) -> ApiResult {
        self.get(&Endpoint::Partners)
    }

    fn socials(&self) -> ApiResult {
        self.get(&Endpoint::Socials)
    }

    fn about_us(&self) -> ApiResult {
        self.get(&Endpoint::AboutUs)
    }

    fn organizers(&self) -> ApiResult {
        self.get(&Endpoint::Organizers)
    }
}

/// Blocking reqwest gateway. Calls run on fetch workers, never the UI thread.
#[derive(Debug, Clone)]
pub struct HttpLeagueApi {
    base: String,
}

impl HttpLeagueApi {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }
}

impl LeagueApi for HttpLeagueApi {
    fn get(&self, endpoint: &Endpoint) -> ApiResult {
        let client = http_client()?;
        let url = endpoint_url(&self.base, endpoint);
        tracing::debug!(url = %url, "GET");
        let resp = client
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .send()?;
        decode_response(resp)
    }

    fn post_comment(&self, draft: &CommentDraft) -> ApiResult {
        let client = http_client()?;
        let url = join_url(&self.base, COMMENT_PATH);
        tracing::debug!(url = %url, news = %draft.news, "POST comment");
        let resp = client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(draft)
            .send()?;
        decode_response(resp)
    }
}

fn decode_response(resp: reqwest::blocking::Response) -> ApiResult {
    let status = resp.status();
    let body = resp.text()?;
    if !status.is_success() {
        return Err(ApiError::Status { status, body });
    }
    parse_payload(&body)
}

/// Empty bodies decode to `null` so callers see "no data" rather than an error.
pub fn parse_payload(raw: &str) -> ApiResult {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(trimmed)?)
}
