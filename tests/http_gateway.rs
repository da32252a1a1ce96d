use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;
use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde_json::json;

use uzllf_terminal::api::{ApiError, HttpLeagueApi, LeagueApi};
use uzllf_terminal::http_client::REQUEST_TIMEOUT_SECS;

/// Answers a single request with a canned HTTP/1.1 response after `delay` and
/// returns the base URL to point the gateway at.
fn serve_once(status_line: &'static str, body: &'static str, delay: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        while reader.read_line(&mut line).is_ok_and(|n| n > 0) {
            if line == "\r\n" {
                break;
            }
            line.clear();
        }
        thread::sleep(delay);
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();
    });
    format!("http://{addr}")
}

#[test]
fn error_status_surfaces_with_body() {
    let api = HttpLeagueApi::new(serve_once("404 Not Found", "nope", Duration::ZERO));
    match api.leagues() {
        Err(ApiError::Status { status, body }) => {
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body, "nope");
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[test]
fn success_payload_is_returned_untouched() {
    let api = HttpLeagueApi::new(serve_once("200 OK", r#"[{"uuid":"x"}]"#, Duration::ZERO));
    let payload = api.match_detail("x").unwrap();
    assert_eq!(payload, json!([{"uuid": "x"}]));
}

#[test]
fn slow_server_hits_the_request_timeout() {
    let delay = Duration::from_secs(REQUEST_TIMEOUT_SECS + 2);
    let api = HttpLeagueApi::new(serve_once("200 OK", "[]", delay));

    let started = Instant::now();
    let err = api.leagues().unwrap_err();
    let elapsed = started.elapsed();

    assert!(err.is_timeout(), "expected a timeout, got {err:?}");
    assert!(matches!(err, ApiError::Timeout));
    assert!(elapsed < delay, "gave up after {elapsed:?}");
    assert!(elapsed >= Duration::from_secs(REQUEST_TIMEOUT_SECS - 1));
}
