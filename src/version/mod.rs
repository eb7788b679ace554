//! Version management for the distribution addon.
//!
//! This module reads and writes the version declared in `addon.xml`, computes
//! the suggested next version, and asks a human to confirm it.

mod descriptor;
mod prompt;

pub use descriptor::{AddonDescriptor, DESCRIPTOR_FILE, get_id, get_version, set_version};
pub use prompt::{AcceptSuggested, FixedVersion, InteractivePrompt, VersionPrompt};

use crate::error::{Result, VersionError};

/// Increments the final dot-separated component of `version`.
///
/// Only the last component changes and there is no carry: `2.9` becomes `2.10`.
/// Pre-release suffixes are not understood.
pub fn bump_minor(version: &str) -> Result<String> {
    let invalid = |reason: &str| VersionError::InvalidVersion {
        version: version.to_string(),
        reason: reason.to_string(),
    };

    let (left, right) = version
        .rsplit_once('.')
        .ok_or_else(|| invalid("expected at least two dot-separated components"))?;
    let last: u64 = right
        .parse()
        .map_err(|_| invalid("final component is not a number"))?;
    let next = last
        .checked_add(1)
        .ok_or_else(|| invalid("final component overflows"))?;

    Ok(format!("{left}.{next}"))
}

/// Checks that a human-supplied version can be used as a tag name.
pub fn validate_version(version: &str) -> Result<()> {
    if version.is_empty() {
        return Err(VersionError::InvalidVersion {
            version: version.to_string(),
            reason: "version must not be empty".to_string(),
        }
        .into());
    }
    if version.chars().any(char::is_whitespace) {
        return Err(VersionError::InvalidVersion {
            version: version.to_string(),
            reason: "version must not contain whitespace".to_string(),
        }
        .into());
    }
    Ok(())
}
