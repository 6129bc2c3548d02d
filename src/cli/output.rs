//! Colored terminal output for user-facing progress.
//!
//! Write failures on the terminal are decorative: callers may ignore the
//! returned `io::Result` with `let _ =` when stdout is closed or redirected
//! to a broken pipe.

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use std::io::{self, Write};

/// Manages verbosity and colors for console output.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
    color_choice: ColorChoice,
}

impl OutputManager {
    /// Creates an output manager.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            color_choice: ColorChoice::Auto,
        }
    }

    /// Output manager that prints nothing, for library use and tests.
    pub fn silent() -> Self {
        Self::new(false, true)
    }

    fn write_colored(&self, color: Option<Color>, bold: bool, message: &str) -> io::Result<()> {
        let mut stdout = StandardStream::stdout(self.color_choice);
        stdout.set_color(ColorSpec::new().set_fg(color).set_bold(bold))?;
        write!(stdout, "{}", message)?;
        stdout.reset()?;
        writeln!(stdout)
    }

    fn write_stderr(&self, color: Color, prefix: &str, message: &str) -> io::Result<()> {
        let mut stderr = StandardStream::stderr(self.color_choice);
        stderr.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(stderr, "{}", prefix)?;
        stderr.reset()?;
        writeln!(stderr, " {}", message)
    }

    /// Plain line, suppressed in quiet mode.
    pub fn println(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_colored(None, false, message)
    }

    /// Detail line, only in verbose mode.
    pub fn verbose(&self, message: &str) -> io::Result<()> {
        if !self.verbose || self.quiet {
            return Ok(());
        }
        self.write_colored(Some(Color::Cyan), false, message)
    }

    /// Step header such as `[2/5] Bundling dependencies...`.
    pub fn progress(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_colored(Some(Color::Blue), true, message)
    }

    /// Success line with a check mark.
    pub fn success(&self, message: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.write_colored(Some(Color::Green), false, &format!("✓ {}", message))
    }

    /// Warning on stderr. Shown even in quiet mode.
    pub fn warn(&self, message: &str) -> io::Result<()> {
        self.write_stderr(Color::Yellow, "⚠ warning:", message)
    }

    /// Error on stderr. Always shown.
    pub fn error(&self, message: &str) -> io::Result<()> {
        self.write_stderr(Color::Red, "✗ error:", message)
    }

    /// Banner between rules.
    pub fn section(&self, title: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let rule = "=".repeat(40);
        self.write_colored(Some(Color::Magenta), true, &rule)?;
        self.write_colored(Some(Color::Magenta), true, &format!("   {}", title))?;
        self.write_colored(Some(Color::Magenta), true, &rule)
    }

    /// Indented line.
    pub fn indent(&self, message: &str) -> io::Result<()> {
        self.println(&format!("   {}", message))
    }
}
