use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::api::{ApiError, ApiResult};
use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyPart {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl From<&str> for KeyPart {
    fn from(value: &str) -> Self {
        KeyPart::Str(value.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(value: String) -> Self {
        KeyPart::Str(value)
    }
}

impl From<&String> for KeyPart {
    fn from(value: &String) -> Self {
        KeyPart::Str(value.clone())
    }
}

impl From<i64> for KeyPart {
    fn from(value: i64) -> Self {
        KeyPart::Int(value)
    }
}

impl From<i32> for KeyPart {
    fn from(value: i32) -> Self {
        KeyPart::Int(i64::from(value))
    }
}

impl From<u32> for KeyPart {
    fn from(value: u32) -> Self {
        KeyPart::Int(i64::from(value))
    }
}

impl From<bool> for KeyPart {
    fn from(value: bool) -> Self {
        KeyPart::Bool(value)
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Str(s) => f.write_str(s),
            KeyPart::Int(n) => write!(f, "{n}"),
            KeyPart::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Structural key: two keys are equal iff every part is equal, in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    parts: Vec<KeyPart>,
}

impl QueryKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            parts: vec![KeyPart::Str(name.into())],
        }
    }

    pub fn with(mut self, part: impl Into<KeyPart>) -> Self {
        self.parts.push(part.into());
        self
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.parts
    }

    pub fn name(&self) -> &str {
        match self.parts.first() {
            Some(KeyPart::Str(name)) => name,
            _ => "",
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, part) in self.parts.iter().enumerate() {
            if idx > 0 {
                f.write_str("/")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

pub type FetchFn = Arc<dyn Fn() -> ApiResult + Send + Sync>;

pub fn fetch_fn(f: impl Fn() -> ApiResult + Send + Sync + 'static) -> FetchFn {
    Arc::new(f)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub enabled: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl QueryOptions {
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// For dependent queries: pass the upstream readiness check.
    pub fn enabled_if(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct QueryState {
    pub status: QueryStatus,
    pub data: Option<Arc<Value>>,
    pub error: Option<Arc<ApiError>>,
    pub updated_at: Option<Instant>,
}

impl QueryState {
    pub fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            updated_at: None,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == QueryStatus::Error
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryStats {
    pub dispatched: u64,
    pub committed: u64,
    pub discarded: u64,
}

struct QueryEntry {
    fetch: FetchFn,
    state: QueryState,
    enabled: bool,
    observers: usize,
    latest_request: Option<u64>,
}

impl QueryEntry {
    fn new(fetch: FetchFn) -> Self {
        Self {
            fetch,
            state: QueryState::idle(),
            enabled: true,
            observers: 0,
            latest_request: None,
        }
    }

    fn in_flight(&self) -> bool {
        self.latest_request.is_some()
    }

    fn needs_fetch_on_mount(&self, stale_time: Duration) -> bool {
        if !self.enabled || self.in_flight() {
            return false;
        }
        match self.state.status {
            QueryStatus::Idle | QueryStatus::Error => true,
            QueryStatus::Loading => false,
            QueryStatus::Success => self
                .state
                .updated_at
                .map(|at| at.elapsed() >= stale_time)
                .unwrap_or(true),
        }
    }
}

struct Completion {
    key: QueryKey,
    request_id: u64,
    result: ApiResult,
}

/// Keyed cache owned by the UI thread. Workers only send completions; they are
/// committed by `pump` or the blocking waits.
pub struct QueryClient {
    entries: HashMap<QueryKey, QueryEntry>,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    pool: Option<rayon::ThreadPool>,
    stale_time: Duration,
    next_request: u64,
    stats: QueryStats,
}

impl QueryClient {
    pub fn new(stale_time: Duration, parallelism: usize) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            entries: HashMap::new(),
            tx,
            rx,
            pool: build_fetch_pool(parallelism),
            stale_time,
            next_request: 0,
            stats: QueryStats::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.stale_time, config.fetch_parallelism)
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    /// Mounts an observer on `key`.
    ///
    /// Returns the current snapshot right away; cached data is served even when a
    /// refresh is kicked off. A fetch is issued when the query is enabled, nothing
    /// is in flight for the key, and the entry is idle, errored, or older than the
    /// staleness window.
    ///
    /// The query stays enabled while any observer asked for it enabled; a
    /// disabled mount never switches off a key another observer is using.
    pub fn query(&mut self, key: QueryKey, fetch: FetchFn, options: QueryOptions) -> QueryState {
        let stale_time = self.stale_time;
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| QueryEntry::new(fetch.clone()));
        let first_observer = entry.observers == 0;
        entry.observers += 1;
        entry.fetch = fetch;
        entry.enabled = options.enabled || (!first_observer && entry.enabled);
        let should_fetch = entry.needs_fetch_on_mount(stale_time);

        if should_fetch {
            self.dispatch(&key);
        }
        self.snapshot(&key)
    }

    /// Updates the fetch binding and options of a mounted key without adding an
    /// observer. An idle entry that just became enabled issues its first fetch.
    pub fn rebind(
        &mut self,
        key: &QueryKey,
        fetch: FetchFn,
        options: QueryOptions,
    ) -> Option<QueryState> {
        let entry = self.entries.get_mut(key)?;
        entry.fetch = fetch;
        entry.enabled = options.enabled;
        let should_fetch =
            entry.enabled && !entry.in_flight() && entry.state.status == QueryStatus::Idle;

        if should_fetch {
            self.dispatch(key);
        }
        Some(self.snapshot(key))
    }

    /// Moves a screen's observer from `previous` to `key`. Same key: rebind only.
    pub fn remount(
        &mut self,
        previous: Option<&QueryKey>,
        key: QueryKey,
        fetch: FetchFn,
        options: QueryOptions,
    ) -> QueryState {
        if let Some(previous) = previous {
            if *previous == key && self.contains(&key) {
                return self
                    .rebind(&key, fetch, options)
                    .unwrap_or_else(QueryState::idle);
            }
            self.release(previous);
        }
        self.query(key, fetch, options)
    }

    /// Issues a fresh request, superseding any in flight for the key.
    pub fn refetch(&mut self, key: &QueryKey) -> bool {
        let Some(entry) = self.entries.get(key) else {
            return false;
        };
        if !entry.enabled {
            return false;
        }
        self.dispatch(key);
        true
    }

    /// Drops one observer; the entry goes away with the last one.
    pub fn release(&mut self, key: &QueryKey) {
        let Some(entry) = self.entries.get_mut(key) else {
            return;
        };
        entry.observers = entry.observers.saturating_sub(1);
        if entry.observers == 0 {
            self.entries.remove(key);
            tracing::debug!(key = %key, "query released");
        }
    }

    pub fn state(&self, key: &QueryKey) -> Option<&QueryState> {
        self.entries.get(key).map(|entry| &entry.state)
    }

    pub fn data(&self, key: &QueryKey) -> Option<&Value> {
        self.state(key).and_then(|state| state.data())
    }

    pub fn snapshot(&self, key: &QueryKey) -> QueryState {
        self.state(key).cloned().unwrap_or_else(QueryState::idle)
    }

    pub fn observers(&self, key: &QueryKey) -> usize {
        self.entries.get(key).map(|entry| entry.observers).unwrap_or(0)
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn in_flight(&self) -> usize {
        self.entries.values().filter(|entry| entry.in_flight()).count()
    }

    pub fn stats(&self) -> QueryStats {
        self.stats
    }

    /// Commits every completion that has already arrived. Never blocks.
    pub fn pump(&mut self) -> usize {
        let mut committed = 0;
        while let Ok(completion) = self.rx.try_recv() {
            if self.apply(completion) {
                committed += 1;
            }
        }
        committed
    }

    /// Waits for the next completion. `Some(true)` when it committed,
    /// `Some(false)` when it was discarded, `None` on timeout.
    pub fn wait_next(&mut self, timeout: Duration) -> Option<bool> {
        match self.rx.recv_timeout(timeout) {
            Ok(completion) => Some(self.apply(completion)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Blocks until no mounted key has a request in flight.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            self.pump();
            if self.in_flight() == 0 {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            if self.wait_next(remaining).is_none() {
                return self.in_flight() == 0;
            }
        }
    }

    fn dispatch(&mut self, key: &QueryKey) {
        let Some(entry) = self.entries.get_mut(key) else {
            return;
        };
        self.next_request += 1;
        let request_id = self.next_request;
        entry.latest_request = Some(request_id);
        entry.state.status = QueryStatus::Loading;
        self.stats.dispatched += 1;
        tracing::debug!(key = %key, request_id, "query dispatched");

        let fetch = entry.fetch.clone();
        let tx = self.tx.clone();
        let key = key.clone();
        let job = move || {
            let result = fetch();
            let _ = tx.send(Completion {
                key,
                request_id,
                result,
            });
        };

        if let Some(pool) = self.pool.as_ref() {
            pool.spawn(job);
        } else {
            std::thread::spawn(job);
        }
    }

    fn apply(&mut self, completion: Completion) -> bool {
        let Completion {
            key,
            request_id,
            result,
        } = completion;
        let Some(entry) = self.entries.get_mut(&key) else {
            self.stats.discarded += 1;
            tracing::debug!(key = %key, request_id, "discarding result for released query");
            return false;
        };
        if entry.latest_request != Some(request_id) {
            self.stats.discarded += 1;
            tracing::debug!(key = %key, request_id, "discarding superseded result");
            return false;
        }

        let now = Instant::now();
        entry.latest_request = None;
        match result {
            Ok(payload) => {
                entry.state.status = QueryStatus::Success;
                entry.state.data = Some(Arc::new(payload));
                entry.state.error = None;
                entry.state.updated_at = Some(now);
            }
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "query failed");
                entry.state.status = QueryStatus::Error;
                entry.state.error = Some(Arc::new(err));
            }
        }
        self.stats.committed += 1;
        true
    }
}

fn build_fetch_pool(threads: usize) -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.clamp(1, 32))
        .thread_name(|idx| format!("uzllf-fetch-{idx}"))
        .build()
        .ok()
}
