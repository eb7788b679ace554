//! Colored terminal output for release operations.
//!
//! Routine steps print in yellow, milestones in green, the mailing-list
//! announcement in cyan, and errors in red on stderr.

use std::io::Write;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Output manager for consistent colored terminal output
#[derive(Debug)]
pub struct OutputManager {
    bufwtr: BufferWriter,
    quiet: bool,
}

impl Clone for OutputManager {
    fn clone(&self) -> Self {
        Self::new(self.quiet)
    }
}

impl OutputManager {
    /// Create a new output manager; `quiet` suppresses everything but errors
    pub fn new(quiet: bool) -> Self {
        Self {
            bufwtr: BufferWriter::stdout(ColorChoice::Auto),
            quiet,
        }
    }

    fn colored(&self, color: Color, bold: bool, prefix: &str, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        buffer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(bold))?;
        write!(&mut buffer, "{prefix}{message}")?;
        buffer.reset()?;
        writeln!(&mut buffer)?;
        self.bufwtr.print(&buffer)
    }

    /// Print a routine workflow step
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.colored(Color::Yellow, false, "", message)
    }

    /// Print a milestone
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.colored(Color::Green, true, "", message)
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) -> std::io::Result<()> {
        self.colored(Color::Yellow, true, "⚠ ", message)
    }

    /// Print a line of the release announcement
    pub fn notice(&self, message: &str) -> std::io::Result<()> {
        self.colored(Color::Cyan, false, "", message)
    }

    /// Print an error message (always shown)
    pub fn error(&self, message: &str) {
        let bufwtr = BufferWriter::stderr(ColorChoice::Auto);
        let mut buffer = bufwtr.buffer();

        if buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true)).is_err()
            || write!(&mut buffer, "✗ {}", message).is_err()
            || buffer.reset().is_err()
            || writeln!(&mut buffer).is_err()
            || bufwtr.print(&buffer).is_err()
        {
            // stderr is gone; stdout is the last resort
            println!("✗ {}", message);
        }
    }

    /// Print indented text (for sub-items)
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        writeln!(&mut buffer, "    {}", message)?;
        self.bufwtr.print(&buffer)
    }

    /// Print a plain message (respects quiet mode)
    pub fn println(&self, message: &str) -> std::io::Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut buffer = self.bufwtr.buffer();
        writeln!(&mut buffer, "{}", message)?;
        self.bufwtr.print(&buffer)
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}
