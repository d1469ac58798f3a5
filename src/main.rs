use std::process::ExitCode;

use anyhow::Result;
use tracing::{info, warn};

use recent_history::{
    cli,
    config,
    environment::{Environment, FixedEnvironment, SystemEnvironment},
    logging,
    parsers::browser::TimeWindow,
    pipeline,
    report,
};

fn main() -> Result<ExitCode> {
    logging::init_logging();

    let cli_opts = cli::parse();
    let mut cfg = config::load_config(cli_opts.config_path.as_deref())?;
    if let Some(window_secs) = cli_opts.window_secs {
        cfg.window_secs = window_secs;
    }
    config::validate(&cfg)?;
    let unknown = config::filter_browsers(&mut cfg, cli_opts.browsers.as_deref());
    for name in unknown {
        warn!("unknown browser in --browsers: {name}");
    }

    let window = TimeWindow::ending_now(cfg.window_secs);
    let env: Box<dyn Environment> = match cli_opts.profile_dir {
        Some(dir) => Box::new(FixedEnvironment::new(Some(dir), Some(std::env::temp_dir()))),
        None => Box::new(SystemEnvironment),
    };
    info!(
        "starting reference_time={} window_secs={} browsers={}",
        window.reference_time,
        window.window_secs,
        cfg.browsers.len()
    );

    let stdout = std::io::stdout();
    let mut sink = report::build_sink(cli_opts.format, stdout.lock());
    let result = pipeline::run(&cfg, env.as_ref(), window, sink.as_mut());
    Ok(ExitCode::from(pipeline::exit_status(result)?))
}
