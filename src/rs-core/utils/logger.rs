use std::sync::atomic::{AtomicU8, Ordering};

use crate::bindings::LogLevel;

static MAX_LOG_LEVEL: AtomicU8 = AtomicU8::new(LoggerLevel::Debug as u8);

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub enum LoggerLevel {
    None = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl From<u8> for LoggerLevel {
    fn from(val: u8) -> Self {
        match val {
            0 => LoggerLevel::None,
            1 => LoggerLevel::Error,
            2 => LoggerLevel::Warn,
            3 => LoggerLevel::Info,
            _ => LoggerLevel::Debug,
        }
    }
}

pub struct Logger {}

impl Logger {
    pub fn set_logger_level(new_level: LoggerLevel) {
        MAX_LOG_LEVEL.store(new_level as u8, Ordering::Relaxed);
    }

    pub fn info(text: &str) {
        if Self::is_enabled(LoggerLevel::Info) {
            emit(LogLevel::Info, text);
        }
    }

    pub fn error(text: &str) {
        if Self::is_enabled(LoggerLevel::Error) {
            emit(LogLevel::Error, text);
        }
    }

    pub fn warn(text: &str) {
        if Self::is_enabled(LoggerLevel::Warn) {
            emit(LogLevel::Warn, text);
        }
    }

    pub fn debug(text: &str) {
        if Self::is_enabled(LoggerLevel::Debug) {
            emit(LogLevel::Debug, text);
        }
    }

    pub fn lazy_info(func: &dyn Fn() -> String) {
        if Self::is_enabled(LoggerLevel::Info) {
            emit(LogLevel::Info, &func());
        }
    }

    pub fn lazy_warn(func: &dyn Fn() -> String) {
        if Self::is_enabled(LoggerLevel::Warn) {
            emit(LogLevel::Warn, &func());
        }
    }

    pub fn lazy_debug(func: &dyn Fn() -> String) {
        if Self::is_enabled(LoggerLevel::Debug) {
            emit(LogLevel::Debug, &func());
        }
    }

    fn is_enabled(level: LoggerLevel) -> bool {
        MAX_LOG_LEVEL.load(Ordering::Relaxed) >= level as u8
    }
}

/// Logs go through the JavaScript console when running in the browser.
#[cfg(target_arch = "wasm32")]
fn emit(level: LogLevel, text: &str) {
    crate::bindings::jsLog(level, text);
}

/// Imported JavaScript functions cannot be called outside of WebAssembly, so native builds
/// (including tests) forward logs to the `log` facade instead.
#[cfg(not(target_arch = "wasm32"))]
fn emit(level: LogLevel, text: &str) {
    match level {
        LogLevel::Error => log::error!("{}", text),
        LogLevel::Warn => log::warn!("{}", text),
        LogLevel::Info => log::info!("{}", text),
        LogLevel::Debug => log::debug!("{}", text),
    }
}
