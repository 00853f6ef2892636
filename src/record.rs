// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Log records, levels and the per-call arguments they are built from.

use std::fmt;
use std::str::FromStr;

use jiff::Zoned;
use serde::Deserialize;

use crate::Error;

/// An enum representing the available severity levels, from least to most severe.
///
/// The numeric values are part of the public contract and are what handler thresholds are
/// compared against.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(try_from = "LevelRepr")]
#[repr(u8)]
pub enum Level {
    /// Detailed debug information.
    #[default]
    Debug = 0,
    /// Interesting events.
    Info = 1,
    /// Normal but significant events.
    Notice = 2,
    /// Exceptional occurrences that are not errors.
    Warning = 3,
    /// Runtime errors that do not require immediate action.
    Error = 4,
    /// Critical conditions.
    Critical = 5,
    /// Action must be taken immediately.
    Alert = 6,
    /// The system is unusable.
    Emergency = 7,
}

impl Level {
    /// All levels, from least to most severe.
    pub const ALL: [Level; 8] = [
        Level::Debug,
        Level::Info,
        Level::Notice,
        Level::Warning,
        Level::Error,
        Level::Critical,
        Level::Alert,
        Level::Emergency,
    ];

    /// Return the string representation of the `Level`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Notice => "NOTICE",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
            Level::Alert => "ALERT",
            Level::Emergency => "EMERGENCY",
        }
    }

    /// Return the numeric value of the `Level`.
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl TryFrom<i64> for Level {
    type Error = Error;

    fn try_from(value: i64) -> Result<Level, Error> {
        usize::try_from(value)
            .ok()
            .and_then(|n| Level::ALL.get(n).copied())
            .ok_or_else(|| Error::config(format!("malformed level: {value}")))
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Level, Self::Err> {
        for level in Level::ALL {
            if s.eq_ignore_ascii_case(level.as_str()) {
                return Ok(level);
            }
        }

        Err(Error::config(format!("malformed level: {s:?}")))
    }
}

// config files may spell a level either as its number or as its name
#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Number(i64),
    Name(String),
}

impl TryFrom<LevelRepr> for Level {
    type Error = Error;

    fn try_from(value: LevelRepr) -> Result<Level, Error> {
        match value {
            LevelRepr::Number(n) => Level::try_from(n),
            LevelRepr::Name(s) => Level::from_str(&s),
        }
    }
}

/// The arguments of one log call, handed to every handler to build its own record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Args {
    message: String,
    title: Option<String>,
    heading: Option<String>,
    body: Option<String>,
}

impl Args {
    /// Create arguments carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Args {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Set the title, used as the mail subject and page title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the heading of a mail record.
    pub fn heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    /// Set the body of a mail record.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// The message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The title, if any.
    pub fn get_title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// The heading, if any.
    pub fn get_heading(&self) -> Option<&str> {
        self.heading.as_deref()
    }

    /// The body, if any.
    pub fn get_body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

impl From<&str> for Args {
    fn from(message: &str) -> Self {
        Args::new(message)
    }
}

impl From<String> for Args {
    fn from(message: String) -> Self {
        Args::new(message)
    }
}

/// One logged event, in the shape its handler needs.
#[derive(Clone, Debug)]
pub enum Record {
    /// A line-oriented error log entry.
    Error(ErrorRecord),
    /// A mail message.
    Mail(MailRecord),
}

impl Record {
    /// The severity level.
    pub fn level(&self) -> Level {
        match self {
            Record::Error(r) => r.level,
            Record::Mail(r) => r.level,
        }
    }

    /// The observed time.
    pub fn time(&self) -> &Zoned {
        match self {
            Record::Error(r) => &r.time,
            Record::Mail(r) => &r.time,
        }
    }

    /// Override the observed time.
    pub fn with_time(self, time: Zoned) -> Self {
        match self {
            Record::Error(r) => Record::Error(r.with_time(time)),
            Record::Mail(r) => Record::Mail(r.with_time(time)),
        }
    }

    /// The variant name, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Record::Error(_) => "ErrorRecord",
            Record::Mail(_) => "MailRecord",
        }
    }
}

impl From<ErrorRecord> for Record {
    fn from(record: ErrorRecord) -> Self {
        Record::Error(record)
    }
}

impl From<MailRecord> for Record {
    fn from(record: MailRecord) -> Self {
        Record::Mail(record)
    }
}

/// The payload of an error log line.
#[derive(Clone, Debug)]
pub struct ErrorRecord {
    time: Zoned,
    level: Level,
    client: String,
    text: String,
}

impl ErrorRecord {
    /// Create a record observed now, with the client identifier `-`.
    pub fn new(level: Level, text: impl Into<String>) -> Self {
        ErrorRecord {
            time: Zoned::now(),
            level,
            client: "-".to_string(),
            text: text.into(),
        }
    }

    /// Override the observed time.
    pub fn with_time(mut self, time: Zoned) -> Self {
        self.time = time;
        self
    }

    /// Set the client identifier.
    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = client.into();
        self
    }

    /// The observed time.
    pub fn time(&self) -> &Zoned {
        &self.time
    }

    /// The severity level.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The client identifier, `-` unless set.
    pub fn client(&self) -> &str {
        &self.client
    }

    /// The message text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The payload of a log mail.
#[derive(Clone, Debug)]
pub struct MailRecord {
    time: Zoned,
    level: Level,
    title: String,
    heading: String,
    body: String,
}

impl MailRecord {
    /// Create a record observed now, with an empty title, heading and body.
    pub fn new(level: Level) -> Self {
        MailRecord {
            time: Zoned::now(),
            level,
            title: String::new(),
            heading: String::new(),
            body: String::new(),
        }
    }

    /// Build a record from call arguments.
    ///
    /// The body falls back to the message when no explicit body is given.
    pub fn from_args(level: Level, args: &Args) -> Self {
        let body = args.get_body().unwrap_or(args.message());
        MailRecord::new(level)
            .with_title(args.get_title().unwrap_or_default())
            .with_heading(args.get_heading().unwrap_or_default())
            .with_body(body)
    }

    /// Override the observed time.
    pub fn with_time(mut self, time: Zoned) -> Self {
        self.time = time;
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the heading.
    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = heading.into();
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// The observed time.
    pub fn time(&self) -> &Zoned {
        &self.time
    }

    /// The severity level.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The heading.
    pub fn heading(&self) -> &str {
        &self.heading
    }

    /// The body.
    pub fn body(&self) -> &str {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_order_and_values() {
        for (i, level) in Level::ALL.iter().enumerate() {
            assert_eq!(level.as_u8() as usize, i);
            assert_eq!(Level::try_from(i as i64).unwrap(), *level);
        }
        assert!(Level::Debug < Level::Info);
        assert!(Level::Alert < Level::Emergency);
        assert!(Level::try_from(8).is_err());
        assert!(Level::try_from(-1).is_err());
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("warning".parse::<Level>().unwrap(), Level::Warning);
        assert_eq!("EMERGENCY".parse::<Level>().unwrap(), Level::Emergency);
        assert!("warn".parse::<Level>().is_err());
    }

    #[test]
    fn test_level_display_pads() {
        assert_eq!(format!("{:>7}", Level::Info), "   INFO");
    }

    #[test]
    fn test_mail_record_from_args() {
        let args = Args::new("disk full").title("Alert").heading("db-1");
        let record = MailRecord::from_args(Level::Alert, &args);
        assert_eq!(record.title(), "Alert");
        assert_eq!(record.heading(), "db-1");
        assert_eq!(record.body(), "disk full");

        let args = Args::new("ignored").body("explicit body");
        let record = MailRecord::from_args(Level::Alert, &args);
        assert_eq!(record.title(), "");
        assert_eq!(record.body(), "explicit body");
    }

    #[test]
    fn test_error_record_defaults() {
        let record = ErrorRecord::new(Level::Error, "boom");
        assert_eq!(record.client(), "-");
        assert_eq!(record.text(), "boom");
        let record = record.with_client("10.0.0.1");
        assert_eq!(record.client(), "10.0.0.1");
    }

    #[test]
    fn test_record_time_override() {
        let time: Zoned = "2014-10-01T23:14:55[UTC]".parse().unwrap();
        let record = Record::from(ErrorRecord::new(Level::Debug, "x")).with_time(time.clone());
        assert_eq!(record.time(), &time);
        assert_eq!(record.kind_name(), "ErrorRecord");
    }
}
