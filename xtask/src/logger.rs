//! Stderr logger for the `log` facade.
//!
//! Messages that already carry a bracketed tag (`[step] ...`) are printed as
//! is; everything else gets the level as its tag.

use log::{LevelFilter, Metadata, Record};

static LOGGER: StderrLogger = StderrLogger;

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = record.args().to_string();
        if msg.starts_with('[') {
            eprintln!("{msg}");
        } else {
            eprintln!("[{}] {msg}", record.level().as_str().to_ascii_lowercase());
        }
    }

    fn flush(&self) {}
}

/// Map `-v`/`-q` counts to a level. Default is `Info`.
pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Warn;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install the logger. A second call only updates the level.
pub fn init(max_level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(max_level);
}
