//! Shared infrastructure for the wisp interpreter workspace.
//!
//! Every other crate in this workspace depends on `wisp-util` for exactly
//! one thing: the error taxonomy that every fallible operation returns.
//! There is no symbol interner, span tracker, or diagnostic builder here —
//! the spec this interpreter implements explicitly excludes source-location
//! tracking in errors, so none of that machinery earns its keep.

pub mod error;
pub mod lineedit;

pub use error::{WispError, WispResult};

/// Initializes the `log` facade with verbosity driven by a repeated `-v`
/// flag. Called exactly once, from `wisp-repl`'s `main`; library crates
/// only ever call `log::trace!`/`log::debug!` and never configure a
/// logger themselves.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger_shim(level);
}

#[cfg(not(test))]
fn env_logger_shim(level: log::LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .try_init();
}

#[cfg(test)]
fn env_logger_shim(_level: log::LevelFilter) {}
