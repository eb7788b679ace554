//! XBMC release targets and the distribution branch each one lives on.

use crate::error::{CliError, ReleaseError};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Integration branch of the distribution repository.
///
/// It already exists after a clone, so checking it out never creates a tracking branch.
pub const DEFAULT_BRANCH: &str = "master";

/// XBMC version a distribution release is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// XBMC 10
    Dharma,
    /// XBMC 11
    Eden,
    /// XBMC 12
    Frodo,
    /// Development line, tracked on the default branch
    Leia,
}

impl Target {
    /// Every target, in release order
    pub const ALL: [Target; 4] = [Target::Dharma, Target::Eden, Target::Frodo, Target::Leia];

    /// Lowercase name, as typed on the command line
    pub fn name(self) -> &'static str {
        match self {
            Target::Dharma => "dharma",
            Target::Eden => "eden",
            Target::Frodo => "frodo",
            Target::Leia => "leia",
        }
    }

    /// Uppercase label used in tag messages
    pub fn label(self) -> String {
        self.name().to_uppercase()
    }

    /// Distribution branch for this target
    pub fn branch(self) -> &'static str {
        match self {
            Target::Dharma => "dharma",
            Target::Eden => "eden",
            Target::Frodo => "frodo",
            Target::Leia => DEFAULT_BRANCH,
        }
    }

    /// Whether the branch is the default integration branch
    pub fn uses_default_branch(self) -> bool {
        self.branch() == DEFAULT_BRANCH
    }

    fn expected_names() -> String {
        Self::ALL
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .ok_or_else(|| {
                CliError::InvalidTarget {
                    given: s.to_string(),
                    expected: Self::expected_names(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_mapping() {
        assert_eq!(Target::Dharma.branch(), "dharma");
        assert_eq!(Target::Eden.branch(), "eden");
        assert_eq!(Target::Frodo.branch(), "frodo");
        assert_eq!(Target::Leia.branch(), "master");
    }

    #[test]
    fn test_only_leia_uses_default_branch() {
        let defaults: Vec<_> = Target::ALL
            .into_iter()
            .filter(|t| t.uses_default_branch())
            .collect();
        assert_eq!(defaults, vec![Target::Leia]);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("DHARMA".parse::<Target>().ok(), Some(Target::Dharma));
        assert_eq!("Eden".parse::<Target>().ok(), Some(Target::Eden));
        assert_eq!("leia".parse::<Target>().ok(), Some(Target::Leia));
    }

    #[test]
    fn test_parse_rejects_unknown_target() {
        let err = "gotham".parse::<Target>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("gotham"));
        assert!(message.contains("dharma, eden, frodo, leia"));
    }

    #[test]
    fn test_label_is_uppercase() {
        assert_eq!(Target::Frodo.label(), "FRODO");
    }
}
