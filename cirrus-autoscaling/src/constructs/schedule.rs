//! Schedule - Recurrence expressions for scheduled scaling

use std::fmt;

/// When a scheduled action runs
///
/// Wraps the five-field cron expression the Auto Scaling API accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Schedule {
    expression: String,
}

impl Schedule {
    /// Pass a cron expression through verbatim
    pub fn expression(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }

    /// Build a cron expression from named fields; unset fields wildcard
    pub fn cron(options: CronOptions) -> Self {
        let field = |part: Option<String>| part.unwrap_or_else(|| "*".to_string());
        Self {
            expression: format!(
                "{} {} {} {} {}",
                field(options.minute),
                field(options.hour),
                field(options.day),
                field(options.month),
                field(options.week_day),
            ),
        }
    }

    pub fn expression_string(&self) -> &str {
        &self.expression
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

/// Named cron fields; any field left `None` becomes `*`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CronOptions {
    pub minute: Option<String>,
    pub hour: Option<String>,
    pub day: Option<String>,
    pub month: Option<String>,
    pub week_day: Option<String>,
}

impl CronOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn minute(mut self, minute: impl Into<String>) -> Self {
        self.minute = Some(minute.into());
        self
    }

    pub fn hour(mut self, hour: impl Into<String>) -> Self {
        self.hour = Some(hour.into());
        self
    }

    pub fn day(mut self, day: impl Into<String>) -> Self {
        self.day = Some(day.into());
        self
    }

    pub fn month(mut self, month: impl Into<String>) -> Self {
        self.month = Some(month.into());
        self
    }

    pub fn week_day(mut self, week_day: impl Into<String>) -> Self {
        self.week_day = Some(week_day.into());
        self
    }
}
