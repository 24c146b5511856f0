//! Diagnostic logging on stderr.
//!
//! User-facing output goes through [`crate::ui`]; log lines are for
//! `--verbose` runs and `RUST_LOG` debugging.

use std::io::Write;

use chrono::Local;
use env_logger::{Builder, Env};
use log::{Level, LevelFilter, Record};
use yansi::Paint;

const CRATE_TARGET: &str = "hayagriva_llm";

/// Dependencies whose debug output drowns out the generator's own
const QUIET_MODULES: &[&str] = &["hyper", "reqwest", "mio", "want"];

/// Installs the stderr logger.
///
/// `level` applies to this crate; HTTP internals stay at `warn` unless
/// `RUST_LOG` says otherwise. Calling it twice keeps the first logger.
pub fn init(level: &str) {
    let mut builder = Builder::new();
    builder.filter_level(LevelFilter::Warn);
    builder.filter_module(CRATE_TARGET, parse_log_level(level));
    for module in QUIET_MODULES {
        builder.filter_module(module, LevelFilter::Warn);
    }
    builder.parse_env(Env::default().write_style_or("RUST_LOG_STYLE", "auto"));
    builder.format(|buf, record| writeln!(buf, "{}", format_log(record)));

    let _ = builder.try_init();
}

/// Level used for the `--verbose` flag
pub fn level_for(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

fn level_badge(level: Level) -> Paint<&'static str> {
    match level {
        Level::Error => Paint::red("error").bold(),
        Level::Warn => Paint::yellow(" warn").bold(),
        Level::Info => Paint::green(" info"),
        Level::Debug => Paint::blue("debug"),
        Level::Trace => Paint::new("trace").dimmed(),
    }
}

/// `HH:MM:SS.mmm level module: message`, with the crate prefix dropped from the module
pub fn format_log(record: &Record) -> String {
    let target = record.target();
    let module = target
        .strip_prefix(CRATE_TARGET)
        .map(|rest| rest.trim_start_matches("::"))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(target);

    format!(
        "{} {} {}: {}",
        Paint::new(Local::now().format("%H:%M:%S%.3f")).dimmed(),
        level_badge(record.level()),
        module,
        record.args()
    )
}

/// Parses a level name, falling back to `warn`
pub fn parse_log_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Warn)
}
