use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Jsonl,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliOptions {
    /// Optional path to config file (YAML)
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// Recency window, in seconds (overrides config when set)
    #[arg(long)]
    pub window_secs: Option<i64>,

    /// Use this directory as the user profile instead of looking it up
    #[arg(long)]
    pub profile_dir: Option<PathBuf>,

    /// Limit the run to these browsers (comma-separated list)
    #[arg(long, value_delimiter = ',')]
    pub browsers: Option<Vec<String>>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn parse() -> CliOptions {
    CliOptions::parse()
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, OutputFormat};
    use clap::Parser;

    #[test]
    fn no_arguments_keeps_defaults() {
        let opts = CliOptions::try_parse_from(["recent-history"]).expect("parse");
        assert!(opts.config_path.is_none());
        assert!(opts.window_secs.is_none());
        assert!(opts.profile_dir.is_none());
        assert_eq!(opts.format, OutputFormat::Text);
    }

    #[test]
    fn parses_window_and_format() {
        let opts = CliOptions::try_parse_from([
            "recent-history",
            "--window-secs",
            "3600",
            "--format",
            "jsonl",
        ])
        .expect("parse");
        assert_eq!(opts.window_secs, Some(3600));
        assert_eq!(opts.format, OutputFormat::Jsonl);
    }

    #[test]
    fn parses_browser_list() {
        let opts = CliOptions::try_parse_from(["recent-history", "--browsers", "chrome,edge"])
            .expect("parse");
        assert_eq!(opts.browsers.expect("browsers"), vec!["chrome", "edge"]);
    }
}
