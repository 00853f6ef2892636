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

use jiff::fmt::strtime;
use jiff::tz::TimeZone;

use crate::Error;
use crate::ErrorKind;
use crate::formatter::Formatter;
use crate::formatter::mismatch;
use crate::record::Record;

/// A formatter that renders error records as Apache error-log-like lines.
///
/// Output format:
///
/// ```text
/// [Wed Oct 01 23:14:55 UTC] [ERROR] [-] This is the error message
/// [Wed Oct 01 9:02:11 UTC] [DEBUG] [-] Cache warmed
/// ```
///
/// The timestamp is rendered in the record's own time zone unless one is set with
/// [`timezone`](ErrorLogFormatter::timezone).
///
/// # Examples
///
/// ```
/// use rawlog::formatter::ErrorLogFormatter;
///
/// let formatter = ErrorLogFormatter::default();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ErrorLogFormatter {
    timezone: Option<TimeZone>,
}

const DATE_FORMAT: &str = "%a %b %d %-H:%M:%S %Z";

impl ErrorLogFormatter {
    /// Render timestamps in the given time zone.
    ///
    /// # Examples
    ///
    /// ```
    /// use jiff::tz::TimeZone;
    /// use rawlog::formatter::ErrorLogFormatter;
    ///
    /// let formatter = ErrorLogFormatter::default().timezone(TimeZone::UTC);
    /// ```
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.timezone = Some(tz);
        self
    }
}

impl Formatter for ErrorLogFormatter {
    fn format(&self, record: &Record) -> Result<String, Error> {
        let Record::Error(record) = record else {
            return Err(mismatch("ErrorLogFormatter", "ErrorRecord", record));
        };

        let date = match &self.timezone {
            Some(tz) => strtime::format(DATE_FORMAT, &record.time().with_time_zone(tz.clone())),
            None => strtime::format(DATE_FORMAT, record.time()),
        }
        .map_err(|err| {
            Error::new(ErrorKind::Unexpected, "failed to format record date").with_source(err)
        })?;

        let level = record.level();
        let client = record.client();
        let text = record.text();
        Ok(format!("[{date}] [{level}] [{client}] {text}\n"))
    }
}
