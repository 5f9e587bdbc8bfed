use console::style;

/// Logging threshold; Debug includes everything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
}

const PREFIX: &str = "[release-assistant]";

/// User-facing logger, constructed once at process start and passed by
/// value to the orchestrator and its collaborators.
///
/// Info and debug messages go to stdout, warnings and errors to stderr.
#[derive(Debug, Clone, Copy)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    pub fn new(debug: bool) -> Self {
        Logger {
            level: if debug { LogLevel::Debug } else { LogLevel::Info },
        }
    }

    pub fn debug_enabled(&self) -> bool {
        self.level == LogLevel::Debug
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        if self.debug_enabled() {
            println!("{} {}", PREFIX, style(message.as_ref()).dim());
        }
    }

    pub fn info(&self, message: impl AsRef<str>) {
        println!("{} {}", PREFIX, message.as_ref());
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        eprintln!("{} {}", PREFIX, style(message.as_ref()).yellow());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        eprintln!("{} {}", PREFIX, style(message.as_ref()).red());
    }
}
