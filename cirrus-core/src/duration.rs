//! Duration - Whole-second time spans for template properties
//!
//! CloudFormation expresses pause times as ISO 8601 durations
//! (e.g. `PT5M`) and cooldowns as integer seconds. This type holds the
//! seconds and renders both forms.

use std::fmt;

/// A whole-second duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration {
    secs: u64,
}

impl Duration {
    pub const fn seconds(secs: u64) -> Self {
        Self { secs }
    }

    pub const fn minutes(minutes: u64) -> Self {
        Self::seconds(minutes * 60)
    }

    pub const fn hours(hours: u64) -> Self {
        Self::minutes(hours * 60)
    }

    pub const fn days(days: u64) -> Self {
        Self::hours(days * 24)
    }

    pub const fn as_secs(&self) -> u64 {
        self.secs
    }

    /// Render as an ISO 8601 duration (e.g. `PT5M`, `PT1H30M`, `PT0S`)
    pub fn to_iso8601(&self) -> String {
        if self.secs == 0 {
            return "PT0S".to_string();
        }

        let hours = self.secs / 3600;
        let minutes = (self.secs % 3600) / 60;
        let seconds = self.secs % 60;

        let mut out = String::from("PT");
        if hours > 0 {
            out.push_str(&format!("{}H", hours));
        }
        if minutes > 0 {
            out.push_str(&format!("{}M", minutes));
        }
        if seconds > 0 {
            out.push_str(&format!("{}S", seconds));
        }
        out
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_agree_on_seconds() {
        assert_eq!(Duration::minutes(5).as_secs(), 300);
        assert_eq!(Duration::hours(2).as_secs(), 7200);
        assert_eq!(Duration::days(1).as_secs(), 86400);
    }

    #[test]
    fn iso8601_zero() {
        assert_eq!(Duration::seconds(0).to_iso8601(), "PT0S");
    }

    #[test]
    fn iso8601_minutes_only() {
        assert_eq!(Duration::minutes(5).to_iso8601(), "PT5M");
    }

    #[test]
    fn iso8601_mixed_units() {
        assert_eq!(Duration::seconds(5415).to_iso8601(), "PT1H30M15S");
    }

    #[test]
    fn iso8601_omits_empty_units() {
        assert_eq!(Duration::hours(1).to_iso8601(), "PT1H");
        assert_eq!(Duration::seconds(3605).to_iso8601(), "PT1H5S");
    }

    #[test]
    fn display_shows_seconds() {
        assert_eq!(Duration::minutes(1).to_string(), "60s");
    }
}
