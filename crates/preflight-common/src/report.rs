//! Streaming diagnostic output.
//!
//! Checks emit one line at a time through a [`Reporter`] as soon as a
//! finding is known. The CLI prints them to stdout; tests record them.

/// Severity and layout of a diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Section heading, preceded by a blank line.
    Heading,
    /// Neutral detail line.
    Info,
    /// A check that passed.
    Pass,
    /// A soft finding that never changes the outcome.
    Warn,
    /// A hard finding.
    Fail,
}

impl Level {
    /// Prefix printed in front of messages of this level.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Heading | Self::Info => "",
            Self::Pass => "\u{2705} ",
            Self::Warn => "\u{26a0}\u{fe0f}  ",
            Self::Fail => "\u{274c} ",
        }
    }
}

/// Sink for diagnostic lines.
pub trait Reporter {
    /// Emits a single diagnostic line.
    fn emit(&mut self, level: Level, message: &str);

    /// Emits a section heading.
    fn heading(&mut self, message: &str) {
        self.emit(Level::Heading, message);
    }

    /// Emits a neutral detail line.
    fn info(&mut self, message: &str) {
        self.emit(Level::Info, message);
    }

    /// Emits a passed check.
    fn pass(&mut self, message: &str) {
        self.emit(Level::Pass, message);
    }

    /// Emits a soft warning.
    fn warn(&mut self, message: &str) {
        self.emit(Level::Warn, message);
    }

    /// Emits a hard failure.
    fn fail(&mut self, message: &str) {
        self.emit(Level::Fail, message);
    }
}

/// Formats a diagnostic line the way it appears on the console.
#[must_use]
pub fn render(level: Level, message: &str) -> String {
    match level {
        Level::Heading => format!("\n{message}"),
        _ => format!("{}{message}", level.marker()),
    }
}

/// Prints every line to stdout immediately.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn emit(&mut self, level: Level, message: &str) {
        println!("{}", render(level, message));
    }
}

/// Keeps every line in memory.
#[derive(Debug, Default)]
pub struct Recorder {
    lines: Vec<(Level, String)>,
}

impl Recorder {
    /// Creates an empty recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// All recorded lines in emission order.
    #[must_use]
    pub fn lines(&self) -> &[(Level, String)] {
        &self.lines
    }

    /// Number of lines recorded at `level`.
    #[must_use]
    pub fn count(&self, level: Level) -> usize {
        self.lines.iter().filter(|(l, _)| *l == level).count()
    }

    /// Whether any line at `level` contains `needle`.
    #[must_use]
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.lines
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }
}

impl Reporter for Recorder {
    fn emit(&mut self, level: Level, message: &str) {
        self.lines.push((level, message.to_string()));
    }
}
