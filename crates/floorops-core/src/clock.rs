use crate::error::ClockError;
use chrono::{DateTime, Local, TimeZone};
use std::fmt::{Display, Write};

pub const CLOCK_FORMAT: &str = "%a, %d %b • %I:%M %p";
/// Shown until the first successful tick.
pub const CLOCK_PLACEHOLDER: &str = "Connecting...";

#[derive(Clone, Debug)]
pub struct ClockTicker {
    format: String,
}

impl Default for ClockTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockTicker {
    pub fn new() -> Self {
        Self::with_format(CLOCK_FORMAT)
    }

    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    pub fn tick(&self) -> Result<String, ClockError> {
        self.format_at(&Local::now())
    }

    pub fn format_at<Tz>(&self, at: &DateTime<Tz>) -> Result<String, ClockError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut out = String::new();
        write!(out, "{}", at.format(&self.format)).map_err(|_| ClockError::Format {
            format: self.format.clone(),
        })?;
        Ok(out)
    }
}
