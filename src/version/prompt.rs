//! Human confirmation of the next version number.

use super::validate_version;
use crate::error::Result;
use std::io::{BufRead, Write};

/// Decides the version a release will carry, given the suggested bump
pub trait VersionPrompt {
    /// Return the version to apply. `suggested` is the default.
    fn confirm_version(&self, current: &str, suggested: &str) -> Result<String>;
}

/// Asks on the terminal; an empty answer accepts the suggestion
#[derive(Debug, Default, Clone, Copy)]
pub struct InteractivePrompt;

impl VersionPrompt for InteractivePrompt {
    fn confirm_version(&self, current: &str, suggested: &str) -> Result<String> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        ask(&mut stdin.lock(), &mut stdout, current, suggested)
    }
}

fn ask(
    input: &mut impl BufRead,
    output: &mut impl Write,
    current: &str,
    suggested: &str,
) -> Result<String> {
    write!(
        output,
        "Current version is {current}. Specify new version number: [{suggested}] "
    )?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();
    let chosen = if answer.is_empty() { suggested } else { answer };
    validate_version(chosen)?;
    Ok(chosen.to_string())
}

/// Takes the suggested bump without asking
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptSuggested;

impl VersionPrompt for AcceptSuggested {
    fn confirm_version(&self, _current: &str, suggested: &str) -> Result<String> {
        Ok(suggested.to_string())
    }
}

/// Uses a version chosen up front, e.g. on the command line
#[derive(Debug, Clone)]
pub struct FixedVersion(pub String);

impl VersionPrompt for FixedVersion {
    fn confirm_version(&self, _current: &str, _suggested: &str) -> Result<String> {
        validate_version(&self.0)?;
        Ok(self.0.clone())
    }
}
