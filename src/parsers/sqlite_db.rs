use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, Row, Rows, Statement};
use thiserror::Error;

use crate::parsers::browser::{HistoryRecord, TimeWindow, decode_url};

const RECENT_VISITS_SQL: &str = "SELECT u.url, v.visit_time FROM urls u JOIN visits v ON u.id = v.url ORDER BY v.visit_time DESC";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error("{0}")]
    Prepare(#[source] rusqlite::Error),
    #[error("{0}")]
    Step(#[source] rusqlite::Error),
}

/// Read-only handle on a Chromium-style `History` database.
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    pub fn open(path: &Path) -> Result<Self, HistoryError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| HistoryError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { conn })
    }

    /// Prepare the visits/urls join, newest visit first.
    pub fn visit_query(&self) -> Result<VisitQuery<'_>, HistoryError> {
        let stmt = self
            .conn
            .prepare(RECENT_VISITS_SQL)
            .map_err(HistoryError::Prepare)?;
        Ok(VisitQuery { stmt })
    }
}

pub struct VisitQuery<'conn> {
    stmt: Statement<'conn>,
}

impl VisitQuery<'_> {
    /// Start stepping the statement. The join returns every visit; rows
    /// outside `window` are skipped while iterating.
    pub fn recent(&mut self, window: TimeWindow) -> Result<RecentVisits<'_>, HistoryError> {
        let rows = self.stmt.query([]).map_err(HistoryError::Prepare)?;
        Ok(RecentVisits {
            rows,
            window,
            done: false,
        })
    }
}

/// Single pass over the query result. A step error is yielded once and ends
/// the sequence.
pub struct RecentVisits<'stmt> {
    rows: Rows<'stmt>,
    window: TimeWindow,
    done: bool,
}

impl Iterator for RecentVisits<'_> {
    type Item = Result<HistoryRecord, HistoryError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            match self.rows.next().map(|row| row.map(read_row)) {
                Ok(Some(record)) => {
                    if self.window.contains(record.visit_time_unix()) {
                        return Some(Ok(record));
                    }
                }
                Ok(None) => self.done = true,
                Err(err) => {
                    self.done = true;
                    return Some(Err(HistoryError::Step(err)));
                }
            }
        }
        None
    }
}

fn read_row(row: &Row<'_>) -> HistoryRecord {
    let url = match row.get_ref(0) {
        Ok(ValueRef::Text(bytes)) | Ok(ValueRef::Blob(bytes)) => decode_url(Some(bytes)),
        Ok(ValueRef::Integer(i)) => i.to_string(),
        Ok(ValueRef::Real(f)) => f.to_string(),
        Ok(ValueRef::Null) | Err(_) => String::new(),
    };
    // Same coercion sqlite3_column_int64 applies.
    let visit_time_raw = match row.get_ref(1) {
        Ok(ValueRef::Integer(i)) => i,
        Ok(ValueRef::Real(f)) => f as i64,
        Ok(ValueRef::Text(bytes)) => leading_int(bytes),
        _ => 0,
    };
    HistoryRecord {
        url,
        visit_time_raw,
    }
}

/// Integer prefix of `text` after leading whitespace, saturating on
/// overflow. No digits gives 0.
fn leading_int(text: &[u8]) -> i64 {
    let text = text.trim_ascii_start();
    let (negative, digits) = match text.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, text),
    };
    digits
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .fold(0i64, |acc, b| {
            let d = i64::from(b - b'0');
            if negative {
                acc.saturating_mul(10).saturating_sub(d)
            } else {
                acc.saturating_mul(10).saturating_add(d)
            }
        })
}

/// Collect every recent visit from the database at `path`. Connection and
/// statement are closed before returning.
pub fn read_recent_history(
    path: &Path,
    window: TimeWindow,
) -> Result<Vec<HistoryRecord>, HistoryError> {
    let db = HistoryDb::open(path)?;
    let mut query = db.visit_query()?;
    let visits = query.recent(window)?;
    visits.collect()
}
