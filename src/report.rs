//! Output sinks for the per-browser report.

use std::io::{self, Write};

use serde::Serialize;
use tracing::warn;

use crate::cli::OutputFormat;
use crate::parsers::browser::{HistoryRecord, format_utc};

pub trait ReportSink {
    fn begin_browser(&mut self, browser: &str) -> io::Result<()>;
    fn record(&mut self, browser: &str, record: &HistoryRecord) -> io::Result<()>;
    /// Human-readable failure line.
    fn failure(&mut self, message: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

/// `Checking <browser> browsing history:` headers followed by
/// `URL: ..., Visit Time (UTC): ...` lines.
pub struct TextReport<W: Write> {
    out: W,
    sections: usize,
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W) -> Self {
        Self { out, sections: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextReport<W> {
    fn begin_browser(&mut self, browser: &str) -> io::Result<()> {
        if self.sections > 0 {
            writeln!(self.out)?;
        }
        self.sections += 1;
        writeln!(self.out, "Checking {browser} browsing history:")
    }

    fn record(&mut self, _browser: &str, record: &HistoryRecord) -> io::Result<()> {
        writeln!(
            self.out,
            "URL: {}, Visit Time (UTC): {}",
            record.url,
            format_utc(record.visit_time_unix())
        )
    }

    fn failure(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{message}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// One JSON object per visit. Headers and failures go to the log only.
pub struct JsonlReport<W: Write> {
    out: W,
}

#[derive(Serialize)]
struct VisitLine<'a> {
    browser: &'a str,
    #[serde(flatten)]
    record: &'a HistoryRecord,
    visit_time_unix: i64,
    visit_time_utc: String,
}

impl<W: Write> JsonlReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonlReport<W> {
    fn begin_browser(&mut self, _browser: &str) -> io::Result<()> {
        Ok(())
    }

    fn record(&mut self, browser: &str, record: &HistoryRecord) -> io::Result<()> {
        let visit_time_unix = record.visit_time_unix();
        let line = VisitLine {
            browser,
            record,
            visit_time_unix,
            visit_time_utc: format_utc(visit_time_unix),
        };
        serde_json::to_writer(&mut self.out, &line)?;
        self.out.write_all(b"\n")
    }

    fn failure(&mut self, message: &str) -> io::Result<()> {
        warn!("{message}");
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

pub fn build_sink<'a, W: Write + 'a>(format: OutputFormat, out: W) -> Box<dyn ReportSink + 'a> {
    match format {
        OutputFormat::Text => Box::new(TextReport::new(out)),
        OutputFormat::Jsonl => Box::new(JsonlReport::new(out)),
    }
}
