use anyhow::Context;
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{filter, fmt, Layer, Registry};

/// Level for this crate's events: `-q` keeps errors only, each `-v` goes
/// one step past the default of warnings.
pub fn level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the stderr subscriber. Events from other crates stay at `WARN`.
pub fn start(verbose: u8, quiet: bool) -> anyhow::Result<()> {
    let fmt_filter = filter::Targets::new()
        .with_target("member_spacing", level(verbose, quiet))
        .with_default(LevelFilter::WARN);
    let fmt = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(verbose > 1)
        .without_time()
        .with_filter(fmt_filter);

    let subscriber = Registry::default().with(fmt);
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install log subscriber")
}
