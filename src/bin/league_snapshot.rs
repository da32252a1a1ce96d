use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Local;
use tracing_subscriber::EnvFilter;

use uzllf_terminal::api::HttpLeagueApi;
use uzllf_terminal::config::Config;
use uzllf_terminal::locale::{Locale, resolve_field};
use uzllf_terminal::players::{player_age, player_events, top_scorers};
use uzllf_terminal::queries::LeagueQueries;
use uzllf_terminal::query::{QueryClient, QueryOptions};
use uzllf_terminal::teams::{first_league_id, standings};

const WAIT: Duration = Duration::from_secs(15);

fn main() -> Result<()> {
    let config = Config::load();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let locale = parse_lang_arg().unwrap_or_default();
    let top_n = parse_top_arg().unwrap_or(10);

    let api = Arc::new(HttpLeagueApi::new(config.api_base.clone()));
    tracing::debug!(base = %api.base(), "fetching league snapshot");
    let queries = LeagueQueries::new(api);
    let mut client = QueryClient::from_config(&config);

    let leagues = queries.leagues();
    client.query(leagues.key.clone(), leagues.fetch, QueryOptions::default());
    if !client.wait_idle(WAIT) {
        bail!("timed out waiting for leagues");
    }
    let leagues_state = client.snapshot(&leagues.key);
    if let Some(err) = leagues_state.error.as_ref() {
        bail!("leagues request failed: {err}");
    }

    let league_id = parse_league_arg()
        .or_else(|| first_league_id(leagues_state.data()))
        .context("no league available")?;

    let teams = queries.teams(&league_id);
    let scorers = queries.top_scorers(&league_id);
    client.query(teams.key.clone(), teams.fetch, QueryOptions::default());
    client.query(scorers.key.clone(), scorers.fetch, QueryOptions::default());
    if !client.wait_idle(WAIT) {
        bail!("timed out waiting for league {league_id}");
    }

    let teams_state = client.snapshot(&teams.key);
    let scorers_state = client.snapshot(&scorers.key);

    println!("League {league_id} ({})", locale.code());
    match teams_state.error.as_ref() {
        Some(err) => println!("Standings unavailable: {err}"),
        None => {
            println!("{:>3} {:<28} {:>3} {:>3} {:>3} {:>3} {:>4}", "#", "Team", "P", "W", "D", "L", "Pts");
            for row in standings(teams_state.data()) {
                let r = &row.record;
                println!(
                    "{:>3} {:<28} {:>3} {:>3} {:>3} {:>3} {:>4}",
                    row.rank,
                    resolve_field(Some(row.team), "name", locale),
                    r.played,
                    r.wins,
                    r.draws,
                    r.loses,
                    r.points
                );
            }
        }
    }

    println!();
    match scorers_state.error.as_ref() {
        Some(err) => println!("Top scorers unavailable: {err}"),
        None => {
            let today = Local::now().date_naive();
            println!("Top scorers");
            for (idx, player) in top_scorers(scorers_state.data(), top_n).iter().enumerate() {
                let age = player_age(player, today)
                    .map(|a| a.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:>3}. {:<28} {:>3} goals  age {}",
                    idx + 1,
                    resolve_field(Some(*player), "name", locale),
                    player_events(player).goals,
                    age
                );
            }
        }
    }

    let stats = client.stats();
    tracing::debug!(
        dispatched = stats.dispatched,
        committed = stats.committed,
        discarded = stats.discarded,
        "snapshot done"
    );
    Ok(())
}

fn arg_value(name: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("--{name}=");
    let flag = format!("--{name}");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if *arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

fn parse_league_arg() -> Option<String> {
    arg_value("league")
}

fn parse_lang_arg() -> Option<Locale> {
    arg_value("lang").and_then(|code| Locale::parse(&code))
}

fn parse_top_arg() -> Option<usize> {
    arg_value("top").and_then(|n| n.parse().ok())
}
