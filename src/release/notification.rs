//! Mailing-list announcement for a published release.

use crate::release::ReleaseOutcome;

/// Plain-text announcement ready to paste into the mailing list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    lines: Vec<String>,
}

impl Notification {
    /// Build the announcement for `outcome`
    pub fn for_release(outcome: &ReleaseOutcome) -> Self {
        let addon_id = &outcome.addon_id;
        let lines = vec![
            "Mailing List Email".to_string(),
            "------------------".to_string(),
            String::new(),
            format!("Subject: [git pull] {addon_id}"),
            format!("*addon - {addon_id}"),
            format!("*version - {}", outcome.version),
            format!("*url - {}", outcome.public_url),
            format!("*tag - {}", outcome.tag),
            format!("*xbmc version - {}", outcome.target.name()),
            String::new(),
            String::new(),
        ];
        Self { lines }
    }

    /// Lines of the announcement
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::Target;

    #[test]
    fn test_announcement_lines() {
        let outcome = ReleaseOutcome {
            addon_id: "script.module.xbmcswift2".to_string(),
            version: "1.4".to_string(),
            tag: "1.4".to_string(),
            source_tag: "xbmc-1.4".to_string(),
            target: Target::Dharma,
            branch: "dharma".to_string(),
            public_url: "git://github.com/predakanga/xbmcswift2-xbmc-dist.git".to_string(),
            source_revision: "abc".to_string(),
        };

        let notification = Notification::for_release(&outcome);
        let lines = notification.lines();
        assert_eq!(lines[0], "Mailing List Email");
        assert_eq!(lines[3], "Subject: [git pull] script.module.xbmcswift2");
        assert!(lines.contains(&"*version - 1.4".to_string()));
        assert!(lines.contains(&"*tag - 1.4".to_string()));
        assert!(lines.contains(&"*xbmc version - dharma".to_string()));
        assert_eq!(lines.len(), 11);
    }
}
