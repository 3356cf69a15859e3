//! Leveled logging to stderr for the acol crates.
mod config;


pub use config::*;

#[macro_export]
macro_rules! acol_log {
  ($level:expr, $($arg:tt)*) => {{
    let level: $crate::Level = $level;
    if $crate::enabled(level) {
      $crate::Logger::__log(level, &format!($($arg)*));
    }
  }};
}

#[macro_export]
macro_rules! acol_error {
  ($($arg:tt)*) => { $crate::acol_log!($crate::Level::Error, $($arg)*) };
}

#[macro_export]
macro_rules! acol_warn {
  ($($arg:tt)*) => { $crate::acol_log!($crate::Level::Warn, $($arg)*) };
}

#[macro_export]
macro_rules! acol_info {
  ($($arg:tt)*) => { $crate::acol_log!($crate::Level::Info, $($arg)*) };
}

#[macro_export]
macro_rules! acol_debug {
  ($($arg:tt)*) => { $crate::acol_log!($crate::Level::Debug, $($arg)*) };
}

#[macro_export]
macro_rules! acol_trace {
  ($($arg:tt)*) => { $crate::acol_log!($crate::Level::Trace, $($arg)*) };
}

/// Like `debug_assert!`, except completely compiled out in release
/// builds
#[macro_export]
macro_rules! acol_debug_assert {
  ($expr:expr, $($arg:tt)*) => {
    #[cfg(debug_assertions)]
    assert!($expr, $($arg)*)
  };
}

pub struct Logger {}

impl Logger {
  pub fn format(level: Level, log: &str) -> String {
    format!("[{level}] {log}")
  }

  pub fn __log(level: Level, log: &str) {
    eprintln!("{}", Self::format(level, log))
  }
}
