//! Stderr logging through `env_logger`.
//!
//! `--quiet` keeps warnings and errors, `-v` adds debug output. Records from
//! dependencies (reqwest, hyper, ...) are dropped below `warn`. `BENCHCAT_LOG`
//! takes env_logger directives and overrides both.

use std::io::Write;

use log::{Level, LevelFilter};

pub const LOG_ENV: &str = "BENCHCAT_LOG";

/// Level for the `-q` / `-v` flag combination.
pub fn level_for(quiet: bool, verbose: u8) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Warn,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// Builder with flag-derived filters. `benchcat` also matches the
/// `benchcat_recon` and `benchcat_io` targets.
pub fn builder(level: LevelFilter) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(LevelFilter::Warn)
        .filter_module("benchcat", level)
        .target(env_logger::Target::Stderr)
        .format(|buf, record| match record.level() {
            Level::Error => writeln!(buf, "error: {}", record.args()),
            Level::Warn => writeln!(buf, "warning: {}", record.args()),
            Level::Info => writeln!(buf, "{}", record.args()),
            Level::Debug | Level::Trace => {
                writeln!(buf, "[{}] {}", record.target(), record.args())
            }
        });
    builder
}

/// Install the logger. A second call is a no-op.
pub fn init(level: LevelFilter) {
    let _ = builder(level)
        .parse_env(env_logger::Env::new().filter(LOG_ENV))
        .try_init();
}
