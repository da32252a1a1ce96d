use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};
use std::hint::black_box;

use uzllf_terminal::locale::Locale;
use uzllf_terminal::matches::{MatchFilter, combine_matches, filter_matches, team_form};
use uzllf_terminal::players::{PlayerFilter, PlayerSort, project_players};
use uzllf_terminal::teams::standings;

fn sample_players(n: usize) -> Value {
    let positions = ["goalkeeper", "defender", "midfielder", "forward"];
    let list: Vec<Value> = (0..n)
        .map(|idx| {
            json!({
                "uuid": format!("p{idx}"),
                "name": format!("Player {idx}"),
                "name_ru": format!("Игрок {idx}"),
                "position": positions[idx % positions.len()],
                "goals_count": (idx * 7) % 23,
                "assists_count": (idx * 3) % 11,
                "birthday": format!("{}-{:02}-{:02}", 1990 + idx % 15, 1 + idx % 12, 1 + idx % 28),
            })
        })
        .collect();
    Value::Array(list)
}

fn sample_teams(n: usize) -> Value {
    let list: Vec<Value> = (0..n)
        .map(|idx| {
            json!({
                "uuid": format!("t{idx}"),
                "name": format!("Team {idx}"),
                "data": {"wins": idx % 9, "draws": idx % 4, "loses": idx % 6, "points": null},
            })
        })
        .collect();
    Value::Array(list)
}

fn sample_matches(n: usize) -> Value {
    let list: Vec<Value> = (0..n)
        .map(|idx| {
            let league = if idx % 2 == 0 { "Superliga" } else { "Pro liga" };
            json!({
                "uuid": format!("m{idx}"),
                "date": format!("2024-{:02}-{:02}", 1 + idx % 12, 1 + idx % 28),
                "time": "18:00:00",
                "league": {"name": league},
                "team1": {"uuid": format!("t{}", idx % 16)},
                "team2": {"uuid": format!("t{}", (idx + 5) % 16)},
                "score": {"team1_score": idx % 4, "team2_score": idx % 3},
            })
        })
        .collect();
    Value::Array(list)
}

fn bench_player_projection(c: &mut Criterion) {
    let payload = sample_players(500);
    let filter = PlayerFilter {
        search: "1".to_string(),
        position: None,
    };
    c.bench_function("project_players_500", |b| {
        b.iter(|| {
            let out = project_players(
                black_box(Some(&payload)),
                &filter,
                PlayerSort::Name,
                Locale::Ru,
            );
            black_box(out.len());
        })
    });
}

fn bench_standings(c: &mut Criterion) {
    let payload = sample_teams(32);
    c.bench_function("standings_32", |b| {
        b.iter(|| {
            let rows = standings(black_box(Some(&payload)));
            black_box(rows.len());
        })
    });
}

fn bench_schedule(c: &mut Criterion) {
    let last = sample_matches(200);
    let upcoming = sample_matches(40);
    let filter = MatchFilter {
        league: "super".to_string(),
        status: None,
    };
    c.bench_function("schedule_filter_240", |b| {
        b.iter(|| {
            let rows = combine_matches(black_box(Some(&last)), black_box(Some(&upcoming)));
            let shown = filter_matches(&rows, &filter, Locale::Uz);
            black_box(shown.len());
        })
    });
    c.bench_function("team_form_200", |b| {
        b.iter(|| black_box(team_form("t3", black_box(Some(&last)), 5)))
    });
}

criterion_group!(benches, bench_player_projection, bench_standings, bench_schedule);
criterion_main!(benches);
