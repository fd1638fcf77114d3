//! Category/level logging shared by the library crates.
//!
//! - **LogConfig**: process-wide configuration held in atomics
//! - **LogLevel**: Off < Error < Warn < Info < Debug < Trace
//! - **LogCategory**: which part of the pipeline emitted the message
//! - **log()**: lazily formats and writes a message if it is enabled
//!
//! Messages go to stderr, or to a file through a background writer thread
//! once [`LogConfig::set_log_file`] has been called. Call
//! [`LogConfig::shutdown`] before exiting so queued lines reach the file.
//! Each category is rate limited so a per-scanline message cannot flood the
//! output.
//!
//! ```rust
//! use bbg_core::logging::{log, LogCategory, LogLevel};
//!
//! log(LogCategory::Codec, LogLevel::Debug, || {
//!     format!("decompressing block at {:#X}", 0xD7A1)
//! });
//! ```

use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::mpsc::{channel, Sender};
use std::sync::{Mutex, MutexGuard, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const CATEGORY_COUNT: usize = 5;

/// Log level for controlling verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    /// Parse log level from string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "0" => Some(LogLevel::Off),
            "error" | "err" | "1" => Some(LogLevel::Error),
            "warn" | "warning" | "2" => Some(LogLevel::Warn),
            "info" | "3" => Some(LogLevel::Info),
            "debug" | "4" => Some(LogLevel::Debug),
            "trace" | "5" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    fn from_u8(val: u8) -> Self {
        match val {
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            5 => LogLevel::Trace,
            _ => LogLevel::Off,
        }
    }
}

/// Which stage of the asset pipeline a message comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    /// Pointer tables, address translation, catalog loading
    Rom,
    /// Block compression and decompression
    Codec,
    /// Tile, arrangement and palette decoding
    Graphics,
    /// Distortion effects and compositing
    Distortion,
    /// Layer and scene orchestration
    Scene,
}

impl LogCategory {
    pub const ALL: [LogCategory; CATEGORY_COUNT] = [
        LogCategory::Rom,
        LogCategory::Codec,
        LogCategory::Graphics,
        LogCategory::Distortion,
        LogCategory::Scene,
    ];

    fn index(self) -> usize {
        match self {
            LogCategory::Rom => 0,
            LogCategory::Codec => 1,
            LogCategory::Graphics => 2,
            LogCategory::Distortion => 3,
            LogCategory::Scene => 4,
        }
    }
}

#[derive(Default)]
struct Window {
    stamps: VecDeque<Instant>,
    dropped: usize,
    last_report: Option<Instant>,
}

/// Sliding one-second window per category.
struct RateLimiter {
    max_per_second: AtomicUsize,
    windows: Mutex<[Window; CATEGORY_COUNT]>,
}

impl RateLimiter {
    fn new(max_per_second: usize) -> Self {
        Self {
            max_per_second: AtomicUsize::new(max_per_second),
            windows: Mutex::new(Default::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, [Window; CATEGORY_COUNT]> {
        // A panic while holding the lock leaves the counters usable.
        self.windows.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns whether the message may be written, plus a count of dropped
    /// messages to report if one is due.
    fn should_allow(&self, category: LogCategory) -> (bool, Option<usize>) {
        let now = Instant::now();
        let max = self.max_per_second.load(Ordering::Relaxed);
        let mut windows = self.lock();
        let w = &mut windows[category.index()];

        while let Some(&front) = w.stamps.front() {
            if now.duration_since(front) > Duration::from_secs(1) {
                w.stamps.pop_front();
            } else {
                break;
            }
        }

        if w.stamps.len() < max {
            w.stamps.push_back(now);
            if w.dropped > 0 {
                let dropped = std::mem::take(&mut w.dropped);
                w.last_report = Some(now);
                return (true, Some(dropped));
            }
            return (true, None);
        }

        w.dropped += 1;
        let due = w
            .last_report
            .map_or(true, |last| now.duration_since(last) >= Duration::from_secs(1));
        if due {
            w.last_report = Some(now);
            (false, Some(std::mem::take(&mut w.dropped)))
        } else {
            (false, None)
        }
    }
}

/// Global logging configuration
pub struct LogConfig {
    global_level: AtomicU8,
    levels: [AtomicU8; CATEGORY_COUNT],
    log_sender: Mutex<Option<Sender<String>>>,
    writer: Mutex<Option<JoinHandle<()>>>,
    file_logging_enabled: AtomicBool,
    rate_limiter: RateLimiter,
}

impl LogConfig {
    fn new() -> Self {
        Self {
            global_level: AtomicU8::new(LogLevel::Off as u8),
            levels: Default::default(),
            log_sender: Mutex::new(None),
            writer: Mutex::new(None),
            file_logging_enabled: AtomicBool::new(false),
            rate_limiter: RateLimiter::new(60),
        }
    }

    /// Get the global singleton instance
    pub fn global() -> &'static Self {
        static INSTANCE: OnceLock<LogConfig> = OnceLock::new();
        INSTANCE.get_or_init(LogConfig::new)
    }

    pub fn set_global_level(&self, level: LogLevel) {
        self.global_level.store(level as u8, Ordering::Relaxed);
    }

    pub fn get_global_level(&self) -> LogLevel {
        LogLevel::from_u8(self.global_level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, category: LogCategory, level: LogLevel) {
        self.levels[category.index()].store(level as u8, Ordering::Relaxed);
    }

    pub fn get_level(&self, category: LogCategory) -> LogLevel {
        LogLevel::from_u8(self.levels[category.index()].load(Ordering::Relaxed))
    }

    /// A category with its own level uses it; otherwise the global level applies.
    pub fn should_log(&self, category: LogCategory, level: LogLevel) -> bool {
        if level == LogLevel::Off {
            return false;
        }
        match self.get_level(category) {
            LogLevel::Off => level <= self.get_global_level(),
            own => level <= own,
        }
    }

    /// Reset all logging to Off
    pub fn reset(&self) {
        self.set_global_level(LogLevel::Off);
        for category in LogCategory::ALL {
            self.set_level(category, LogLevel::Off);
        }
    }

    /// Set the maximum messages per second per category
    pub fn set_rate_limit(&self, max_logs_per_second: usize) {
        self.rate_limiter
            .max_per_second
            .store(max_logs_per_second, Ordering::Relaxed);
    }

    /// Append messages to `path` from a background writer thread.
    ///
    /// A previously configured file is drained and closed first.
    pub fn set_log_file(&self, path: PathBuf) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        self.shutdown();
        let (sender, receiver) = channel::<String>();

        let handle = thread::Builder::new()
            .name("log-writer".to_string())
            .spawn(move || {
                while let Ok(message) = receiver.recv() {
                    let _ = writeln!(file, "{}", message);
                }
                let _ = file.flush();
            })?;

        *self.sender() = Some(sender);
        *self.writer() = Some(handle);
        self.file_logging_enabled.store(true, Ordering::Relaxed);
        Ok(())
    }

    /// Close the log file and wait until every queued message is written.
    /// Later messages go to stderr.
    pub fn shutdown(&self) {
        self.file_logging_enabled.store(false, Ordering::Relaxed);
        // Dropping the sender ends the writer's receive loop
        drop(self.sender().take());
        if let Some(handle) = self.writer().take() {
            let _ = handle.join();
        }
    }

    fn sender(&self) -> MutexGuard<'_, Option<Sender<String>>> {
        self.log_sender.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn writer(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.writer.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn write_message(&self, message: String) {
        if self.file_logging_enabled.load(Ordering::Relaxed) {
            if let Some(sender) = self.sender().as_ref() {
                if let Err(unsent) = sender.send(message) {
                    eprintln!("{}", unsent.0);
                }
                return;
            }
        }
        eprintln!("{}", message);
    }
}

/// Log a message with the specified category and level.
///
/// `message_fn` only runs when the message is enabled and within the
/// category's rate limit.
pub fn log<F>(category: LogCategory, level: LogLevel, message_fn: F)
where
    F: FnOnce() -> String,
{
    let config = LogConfig::global();
    if !config.should_log(category, level) {
        return;
    }

    let (allowed, dropped) = config.rate_limiter.should_allow(category);
    if let Some(count) = dropped.filter(|&n| n > 0) {
        config.write_message(format!(
            "[{:?}] WARNING: Rate limit exceeded, {} log message(s) dropped in the last second",
            category, count
        ));
    }
    if allowed {
        config.write_message(format!("[{:?}] {}", category, message_fn()));
    }
}
