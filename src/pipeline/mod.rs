//! # Pipeline Module
//!
//! Runs snapshot, query and report once per configured browser, strictly in
//! sequence. Failures inside one browser pass are reported to the sink and
//! the next browser is still attempted; only a missing profile directory or
//! a broken output stream ends the run.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{BrowserConfig, Config};
use crate::environment::{EnvError, Environment};
use crate::parsers::browser::TimeWindow;
use crate::parsers::sqlite_db::{HistoryDb, HistoryError};
use crate::report::ReportSink;
use crate::snapshot::{Snapshot, SnapshotError};

pub const PROFILE_FAILURE_MESSAGE: &str = "Failed to get user profile path.";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Env(#[from] EnvError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Why a single browser pass stopped early.
#[derive(Debug, Error)]
enum PassError {
    #[error("no history path configured for os {0}")]
    NoPath(String),
    #[error("{source}")]
    Snapshot {
        from: PathBuf,
        #[source]
        source: SnapshotError,
    },
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Output(#[from] io::Error),
}

/// Counters logged at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub browsers_attempted: u64,
    pub browsers_failed: u64,
    pub records_reported: u64,
}

pub fn run(
    cfg: &Config,
    env: &dyn Environment,
    window: TimeWindow,
    sink: &mut dyn ReportSink,
) -> Result<RunSummary, PipelineError> {
    let profile = match env.profile_dir() {
        Ok(p) => p,
        Err(err) => {
            sink.failure(PROFILE_FAILURE_MESSAGE)?;
            sink.flush()?;
            return Err(err.into());
        }
    };
    debug!(
        "profile={} os={} reference_time={} window_secs={}",
        profile.display(),
        env.os(),
        window.reference_time,
        window.window_secs
    );

    let mut summary = RunSummary::default();
    for browser in &cfg.browsers {
        summary.browsers_attempted += 1;
        sink.begin_browser(&browser.name)?;

        match run_browser(cfg, env, &profile, browser, window, sink) {
            Ok(count) => {
                info!("{}: {} recent visits", browser.name, count);
                summary.records_reported += count;
            }
            Err(PassError::Output(err)) => return Err(err.into()),
            Err(err) => {
                summary.browsers_failed += 1;
                warn!("{}: {}", browser.name, err);
                report_failure(sink, &err)?;
            }
        }
    }
    sink.flush()?;

    info!(
        "run finished browsers={} failed={} records={}",
        summary.browsers_attempted, summary.browsers_failed, summary.records_reported
    );
    Ok(summary)
}

/// Process exit status for a finished run: 0 on completion, 1 when the
/// profile directory could not be resolved. Output errors are passed on.
pub fn exit_status(result: Result<RunSummary, PipelineError>) -> Result<u8, PipelineError> {
    match result {
        Ok(_) => Ok(0),
        Err(PipelineError::Env(err)) => {
            warn!("{err}");
            Ok(1)
        }
        Err(err) => Err(err),
    }
}

fn run_browser(
    cfg: &Config,
    env: &dyn Environment,
    profile: &Path,
    browser: &BrowserConfig,
    window: TimeWindow,
    sink: &mut dyn ReportSink,
) -> Result<u64, PassError> {
    let source = browser
        .history_path(profile, env.os())
        .ok_or_else(|| PassError::NoPath(env.os().to_string()))?;

    let snapshot = Snapshot::create(env, &source, &cfg.temp_prefix).map_err(|err| {
        PassError::Snapshot {
            from: source.clone(),
            source: err,
        }
    })?;
    debug!(
        "{}: snapshot {} -> {} ({} bytes)",
        browser.name,
        source.display(),
        snapshot.path().display(),
        snapshot.bytes_copied()
    );
    let count = report_snapshot(snapshot.path(), &browser.name, window, sink)?;
    if let Err(err) = snapshot.close() {
        warn!("failed to remove snapshot of {}: {err}", source.display());
    }
    Ok(count)
}

/// Stream the recent visits of one snapshot into `sink`. The connection and
/// statement are dropped before this returns.
fn report_snapshot(
    path: &Path,
    browser: &str,
    window: TimeWindow,
    sink: &mut dyn ReportSink,
) -> Result<u64, PassError> {
    let db = HistoryDb::open(path)?;
    let mut query = db.visit_query()?;
    let mut count = 0u64;
    for visit in query.recent(window)? {
        sink.record(browser, &visit?)?;
        count += 1;
    }
    Ok(count)
}

fn report_failure(sink: &mut dyn ReportSink, err: &PassError) -> io::Result<()> {
    match err {
        PassError::NoPath(os) => sink.failure(&format!("No history path configured for {os}")),
        PassError::Snapshot { from, source } => {
            sink.failure(&format!("Failed to copy database: {source}"))?;
            sink.failure(&format!(
                "Failed to copy database to temporary file: {}",
                from.display()
            ))
        }
        PassError::History(HistoryError::Open { path, .. }) => {
            sink.failure(&format!("Failed to open database: {}", path.display()))
        }
        PassError::History(HistoryError::Prepare(source)) => {
            sink.failure(&format!("Failed to prepare statement: {source}"))
        }
        PassError::History(HistoryError::Step(source)) => {
            sink.failure(&format!("Failed to read history row: {source}"))
        }
        PassError::Output(_) => Ok(()),
    }
}
