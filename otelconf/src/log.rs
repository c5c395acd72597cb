// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::{
    fmt::{self, Display},
    mem,
    str::FromStr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Once,
    },
};

/// Environment variable read once to seed the max level
pub const LOG_LEVEL_ENV: &str = "OTEL_LOG_LEVEL";

static MAX_LOG_LEVEL: AtomicUsize = AtomicUsize::new(LevelFilter::Error as usize);
static INIT_FROM_ENV: Once = Once::new();

pub fn set_max_level(lvl: LevelFilter) {
    // An explicit level always wins over the environment
    INIT_FROM_ENV.call_once(|| {});
    MAX_LOG_LEVEL.store(lvl as usize, Ordering::Relaxed)
}

pub fn max_level() -> LevelFilter {
    INIT_FROM_ENV.call_once(|| {
        if let Some(lvl) = std::env::var(LOG_LEVEL_ENV)
            .ok()
            .and_then(|v| v.parse::<LevelFilter>().ok())
        {
            MAX_LOG_LEVEL.store(lvl as usize, Ordering::Relaxed);
        }
    });
    // SAFETY: only values of LevelFilter are ever stored
    unsafe { mem::transmute(MAX_LOG_LEVEL.load(Ordering::Relaxed)) }
}

#[repr(usize)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd)]
#[non_exhaustive]
/// The level at which the library will log
pub enum LevelFilter {
    Off,
    #[default]
    Error,
    Warn,
    Info,
    Debug,
}

impl FromStr for LevelFilter {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("debug") || s.eq_ignore_ascii_case("trace") {
            Ok(LevelFilter::Debug)
        } else if s.eq_ignore_ascii_case("info") {
            Ok(LevelFilter::Info)
        } else if s.eq_ignore_ascii_case("warn") {
            Ok(LevelFilter::Warn)
        } else if s.eq_ignore_ascii_case("error") {
            Ok(LevelFilter::Error)
        } else if s.eq_ignore_ascii_case("off") {
            Ok(LevelFilter::Off)
        } else {
            Err("log level filter should be one of DEBUG, INFO, WARN, ERROR, OFF")
        }
    }
}

impl Display for LevelFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filter = match self {
            LevelFilter::Debug => "DEBUG",
            LevelFilter::Info => "INFO",
            LevelFilter::Warn => "WARN",
            LevelFilter::Error => "ERROR",
            LevelFilter::Off => "OFF",
        };

        write!(f, "{filter}")
    }
}

#[repr(usize)]
#[derive(Clone, Copy, Debug, Hash)]
pub enum Level {
    Error = 1, // must match LevelFilter::Error
    Warn,
    Info,
    Debug,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        };

        write!(f, "{level}")
    }
}

impl PartialEq<LevelFilter> for Level {
    #[inline]
    fn eq(&self, other: &LevelFilter) -> bool {
        (*self as usize) == (*other as usize)
    }
}

impl PartialOrd<LevelFilter> for Level {
    #[inline]
    fn partial_cmp(&self, other: &LevelFilter) -> Option<std::cmp::Ordering> {
        Some((*self as usize).cmp(&(*other as usize)))
    }
}

pub fn print_log(lvl: Level, log: fmt::Arguments, file: &str, line: u32) {
    if lvl == LevelFilter::Error {
        eprintln!("\x1b[91m{lvl}\x1b[0m {file}:{line} - {log}");
    } else {
        println!("\x1b[93m{lvl}\x1b[0m {file}:{line} - {log}");
    }
}

#[macro_export]
#[doc(hidden)]
macro_rules! conf_debug {
    // conf_debug!("a {} event", "log")
    ($($arg:tt)+) => {
      $crate::conf_log!($crate::log::Level::Debug, $($arg)*)
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! conf_info {
  ($($arg:tt)+) => {
    $crate::conf_log!($crate::log::Level::Info, $($arg)*)
  };
}

#[macro_export]
#[doc(hidden)]
macro_rules! conf_warn {
  ($($arg:tt)+) => {
    $crate::conf_log!($crate::log::Level::Warn, $($arg)*)
  };
}

#[macro_export]
#[doc(hidden)]
macro_rules! conf_error {
  ($($arg:tt)+) => {
    $crate::conf_log!($crate::log::Level::Error, $($arg)*)
  };
}

#[macro_export]
#[doc(hidden)]
macro_rules! conf_log {
    ($lvl:expr, $($arg:tt)+) => {{
      let lvl = $lvl;
      if lvl <= $crate::log::max_level() {
        $crate::log::print_log(lvl, format_args!($($arg)+), file!(), line!());
      }
    }};
}
