//! Scripted in-memory `Orm` for unit tests.
//!
//! Statements executed inside a transaction are staged and only become
//! visible in `executed()` on commit. Failures and catalog rows are scripted
//! by SQL substring.

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::traits::{Orm, Query, Row, Transaction};

#[derive(Default)]
struct State {
    executed: Vec<String>,
    events: Vec<String>,
    exec_failures: Vec<(String, String)>,
    raw_failure: Option<String>,
    responses: Vec<(String, Vec<Row>)>,
    queries: Vec<String>,
}

pub struct FakeOrm {
    name: String,
    state: Arc<Mutex<State>>,
    in_transaction: bool,
}

impl FakeOrm {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            state: Arc::new(Mutex::new(State::default())),
            in_transaction: false,
        })
    }

    /// An engine whose query handle reports an open caller-managed transaction.
    pub fn in_transaction(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            state: Arc::new(Mutex::new(State::default())),
            in_transaction: true,
        })
    }

    fn state(&self) -> MutexGuard<'_, State> {
        lock(&self.state)
    }

    /// Fail any `exec` whose SQL contains `needle`.
    pub fn fail_when(&self, needle: &str, message: &str) {
        self.state()
            .exec_failures
            .push((needle.to_string(), message.to_string()));
    }

    /// Fail every `raw` query.
    pub fn fail_raw(&self, message: &str) {
        self.state().raw_failure = Some(message.to_string());
    }

    /// Answer `raw` queries containing `needle` with `rows`.
    pub fn respond(&self, needle: &str, rows: Vec<Row>) {
        self.state().responses.push((needle.to_string(), rows));
    }

    /// Statements that took effect, in order.
    pub fn executed(&self) -> Vec<String> {
        self.state().executed.clone()
    }

    /// Transaction events (`begin`, `commit`, `rollback`), in order.
    pub fn events(&self) -> Vec<String> {
        self.state().events.clone()
    }

    /// SQL of every `raw` query, in order.
    pub fn queries(&self) -> Vec<String> {
        self.state().queries.clone()
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn run_raw(state: &Mutex<State>, sql: &str) -> Result<Vec<Row>> {
    let mut state = lock(state);
    state.queries.push(sql.to_string());
    if let Some(message) = &state.raw_failure {
        bail!("{}", message);
    }
    Ok(state
        .responses
        .iter()
        .find(|(needle, _)| sql.contains(needle.as_str()))
        .map(|(_, rows)| rows.clone())
        .unwrap_or_default())
}

fn check_exec(state: &Mutex<State>, sql: &str) -> Result<()> {
    let state = lock(state);
    match state
        .exec_failures
        .iter()
        .find(|(needle, _)| sql.contains(needle.as_str()))
    {
        Some((_, message)) => Err(anyhow!("{}", message)),
        None => Ok(()),
    }
}

struct FakeQuery {
    state: Arc<Mutex<State>>,
    in_transaction: bool,
}

#[async_trait]
impl Query for FakeQuery {
    async fn raw(&self, sql: &str) -> Result<Vec<Row>> {
        run_raw(&self.state, sql)
    }

    async fn exec(&self, sql: &str) -> Result<u64> {
        check_exec(&self.state, sql)?;
        lock(&self.state).executed.push(sql.to_string());
        Ok(0)
    }

    fn in_transaction(&self) -> bool {
        self.in_transaction
    }
}

struct FakeTransaction {
    state: Arc<Mutex<State>>,
    staged: Mutex<Vec<String>>,
    finished: AtomicBool,
}

impl FakeTransaction {
    fn ensure_open(&self) -> Result<()> {
        if self.finished.load(Ordering::SeqCst) {
            bail!("transaction already finished");
        }
        Ok(())
    }
}

#[async_trait]
impl Query for FakeTransaction {
    async fn raw(&self, sql: &str) -> Result<Vec<Row>> {
        self.ensure_open()?;
        run_raw(&self.state, sql)
    }

    async fn exec(&self, sql: &str) -> Result<u64> {
        self.ensure_open()?;
        check_exec(&self.state, sql)?;
        self.staged
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(sql.to_string());
        Ok(0)
    }

    fn in_transaction(&self) -> bool {
        true
    }
}

#[async_trait]
impl Transaction for FakeTransaction {
    async fn commit(&self) -> Result<()> {
        self.ensure_open()?;
        self.finished.store(true, Ordering::SeqCst);
        let staged = std::mem::take(
            &mut *self
                .staged
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );
        let mut state = lock(&self.state);
        state.executed.extend(staged);
        state.events.push("commit".to_string());
        Ok(())
    }

    async fn rollback(&self) -> Result<()> {
        self.ensure_open()?;
        self.finished.store(true, Ordering::SeqCst);
        lock(&self.state).events.push("rollback".to_string());
        Ok(())
    }

    fn as_query(&self) -> &dyn Query {
        self
    }
}

#[async_trait]
impl Orm for FakeOrm {
    fn name(&self) -> &str {
        &self.name
    }

    fn query(&self) -> Arc<dyn Query> {
        Arc::new(FakeQuery {
            state: self.state.clone(),
            in_transaction: self.in_transaction,
        })
    }

    async fn begin(&self) -> Result<Arc<dyn Transaction>> {
        self.state().events.push("begin".to_string());
        Ok(Arc::new(FakeTransaction {
            state: self.state.clone(),
            staged: Mutex::new(Vec::new()),
            finished: AtomicBool::new(false),
        }))
    }

    fn connection(&self, name: &str) -> Result<Arc<dyn Orm>> {
        Ok(Arc::new(FakeOrm {
            name: name.to_string(),
            state: self.state.clone(),
            in_transaction: self.in_transaction,
        }))
    }
}

/// Collects formatted `tracing` output emitted while `run` executes.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with a subscriber writing into this capture.
    pub fn run<T>(&self, f: impl FnOnce() -> T) -> T {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("schemata=debug"))
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn contents(&self) -> String {
        let buffer = self
            .buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
