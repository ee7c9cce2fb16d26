//! Session logger: every launch writes to one log file in the OS data directory.
//!
//! The file is **truncated at startup**, so it only ever holds the most recent
//! session and never grows without bound.
//!
//! Log location:
//!   Windows:  `%APPDATA%\MaskFE\maskfe.log`
//!   Linux:    `~/.local/share/MaskFE/maskfe.log`
//!   macOS:    `~/Library/Application Support/MaskFE/maskfe.log`
//!
//! Use the `log_info!` / `log_warn!` / `log_err!` macros anywhere in the crate.
//! Until [`init`] has run (unit tests, headless library use) they write nothing.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use chrono::{DateTime, Local};

struct SessionLog {
    path: PathBuf,
    file: Mutex<File>,
}

static SESSION: OnceLock<SessionLog> = OnceLock::new();

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
    Panic,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Panic => "PANIC",
        })
    }
}

/// `[HH:MM:SS] [LEVEL] message`
pub fn format_line(at: DateTime<Local>, level: Level, msg: &str) -> String {
    format!("[{}] [{level}] {msg}", at.format("%H:%M:%S"))
}

/// Path of the current session log, if the logger was initialised.
pub fn log_path() -> Option<&'static Path> {
    SESSION.get().map(|s| s.path.as_path())
}

fn append(line: &str) {
    if let Some(session) = SESSION.get()
        && let Ok(mut file) = session.file.lock()
    {
        let _ = writeln!(file, "{line}");
    }
}

pub fn write(level: Level, msg: &str) {
    append(&format_line(Local::now(), level, msg));
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Info, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Warn, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_err {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Error, &format!($($arg)*))
    };
}

/// Open the session log at the default location. See [`init_at`].
pub fn init() {
    init_at(default_log_path());
}

/// Truncate `path`, write the session header and mirror panics into the log.
/// A second call, or a file that cannot be opened, leaves logging as it was.
pub fn init_at(path: PathBuf) {
    if SESSION.get().is_some() {
        return;
    }
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new().create(true).write(true).truncate(true).open(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("[logger] could not open {}: {e}", path.display());
            return;
        }
    };
    let header = format!(
        "=== MaskFE {} session started {} ===\nLog file: {}\n",
        env!("CARGO_PKG_VERSION"),
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        path.display()
    );
    if SESSION.set(SessionLog { path, file: Mutex::new(file) }).is_err() {
        return;
    }
    append(&header);

    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        write(Level::Panic, &info.to_string());
        prev(info);
    }));
}

fn default_log_path() -> PathBuf {
    data_dir().join("MaskFE").join("maskfe.log")
}

/// Platform data directory, without the app sub-folder.
fn data_dir() -> PathBuf {
    let env_dir = |key: &str| std::env::var_os(key).map(PathBuf::from);
    if cfg!(target_os = "windows") {
        if let Some(dir) = env_dir("APPDATA") {
            return dir;
        }
    }
    if cfg!(target_os = "macos") {
        if let Some(home) = env_dir("HOME") {
            return home.join("Library/Application Support");
        }
    }
    env_dir("XDG_DATA_HOME")
        .or_else(|| env_dir("HOME").map(|h| h.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
#[path = "logger_test.rs"]
mod logger_test;
