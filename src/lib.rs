//! Print the URLs a user visited recently in Chromium-family browsers.
//!
//! Each browser's `History` database is copied to a temporary snapshot,
//! queried read-only and deleted again, so the live file held open by the
//! browser is never locked or modified.

pub mod cli;
pub mod config;
pub mod environment;
pub mod logging;
pub mod parsers;
pub mod pipeline;
pub mod report;
pub mod snapshot;
