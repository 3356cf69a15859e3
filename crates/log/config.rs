use once_cell::sync::Lazy;
use std::{
  fmt::{Debug, Display},
  str::FromStr,
  sync::atomic::{AtomicU8, Ordering},
};

/// Name of the environment variable consulted for the initial log level.
pub const LOG_ENV_VAR: &str = "ACOL_LOG";

/// Level used when `ACOL_LOG` is unset or cannot be parsed.
pub const DEFAULT_LEVEL: Level = Level::Warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
  Off   = 0,
  Error = 1,
  Warn  = 2,
  Info  = 3,
  Debug = 4,
  Trace = 5,
}

impl Level {
  pub fn as_str(&self) -> &'static str {
    match self {
      Level::Off => "off",
      Level::Error => "error",
      Level::Warn => "warn",
      Level::Info => "info",
      Level::Debug => "debug",
      Level::Trace => "trace",
    }
  }

  fn from_u8(value: u8) -> Self {
    match value {
      0 => Level::Off,
      1 => Level::Error,
      2 => Level::Warn,
      3 => Level::Info,
      4 => Level::Debug,
      _ => Level::Trace,
    }
  }
}

impl Display for Level {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl Debug for ParseLevelError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_fmt(format_args!("unknown log level `{}`", self.0))
  }
}

impl Display for ParseLevelError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    Debug::fmt(self, f)
  }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
  type Err = ParseLevelError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "off" | "none" => Ok(Level::Off),
      "error" => Ok(Level::Error),
      "warn" | "warning" => Ok(Level::Warn),
      "info" => Ok(Level::Info),
      "debug" => Ok(Level::Debug),
      "trace" => Ok(Level::Trace),
      _ => Err(ParseLevelError(s.to_string())),
    }
  }
}

/// Parses the value of `ACOL_LOG`, falling back to [DEFAULT_LEVEL].
pub fn level_from_env_value(value: Option<&str>) -> Level {
  value.and_then(|v| v.parse().ok()).unwrap_or(DEFAULT_LEVEL)
}

static MAX_LEVEL: Lazy<AtomicU8> =
  Lazy::new(|| AtomicU8::new(level_from_env_value(std::env::var(LOG_ENV_VAR).ok().as_deref()) as u8));

/// The most verbose level that is currently written out.
#[inline(always)]
pub fn max_level() -> Level {
  Level::from_u8(MAX_LEVEL.load(Ordering::Relaxed))
}

/// Overrides the level read from the environment for the whole process.
pub fn set_max_level(level: Level) {
  MAX_LEVEL.store(level as u8, Ordering::Relaxed);
}

#[inline(always)]
pub fn enabled(level: Level) -> bool {
  level != Level::Off && level <= max_level()
}
