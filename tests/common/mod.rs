//! Shared fixtures: Chromium-style `History` databases and profile trees.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use recent_history::config::{BrowserConfig, Config, HistoryPathConfig};
use recent_history::parsers::browser::WEBKIT_EPOCH_OFFSET_SECS;

pub const NOW: i64 = 1_700_000_000;

/// Unix seconds to a `visits.visit_time` value.
pub fn webkit(unix_secs: i64) -> i64 {
    (unix_secs + WEBKIT_EPOCH_OFFSET_SECS) * 1_000_000
}

/// Create a `History` database at `path` with the given `(url, unix visit
/// time)` pairs. Repeated URLs share one `urls` row.
pub fn write_history(path: &Path, visits: &[(&str, i64)]) {
    let conn = create_history(path);
    for (url, at) in visits {
        conn.execute(
            "INSERT INTO urls (url) SELECT ?1 WHERE NOT EXISTS (SELECT 1 FROM urls WHERE url = ?1)",
            [url],
        )
        .expect("url");
        conn.execute(
            "INSERT INTO visits (url, visit_time) SELECT id, ?2 FROM urls WHERE url = ?1",
            (url, webkit(*at)),
        )
        .expect("visit");
    }
}

/// Empty `History` schema; callers insert rows themselves.
pub fn create_history(path: &Path) -> Connection {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("history dir");
    }
    let conn = Connection::open(path).expect("conn");
    conn.execute_batch(
        "CREATE TABLE urls (id INTEGER PRIMARY KEY AUTOINCREMENT, url LONGVARCHAR, title LONGVARCHAR, visit_count INTEGER DEFAULT 0 NOT NULL);
         CREATE TABLE visits (id INTEGER PRIMARY KEY, url INTEGER NOT NULL, visit_time INTEGER NOT NULL, from_visit INTEGER, transition INTEGER DEFAULT 0 NOT NULL);",
    )
    .expect("schema");
    conn
}

/// Two browsers whose history lives at `<profile>/<name>/History` on every OS.
pub fn two_browser_config() -> Config {
    Config {
        window_secs: 600,
        temp_prefix: "dbcopy".to_string(),
        browsers: vec![browser("Chrome"), browser("Edge")],
    }
}

pub fn browser(name: &str) -> BrowserConfig {
    let relative = format!("{name}/History");
    BrowserConfig {
        name: name.to_string(),
        history_path: HistoryPathConfig {
            windows: Some(relative.clone()),
            macos: Some(relative.clone()),
            linux: Some(relative),
        },
    }
}

pub fn history_file(profile: &Path, browser: &str) -> PathBuf {
    profile.join(browser).join("History")
}

pub fn dir_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).expect("read_dir").count()
}
