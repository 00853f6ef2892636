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

//! Formatters that turn a [`Record`] into the text a handler emits.

use std::fmt;

use crate::Error;
use crate::ErrorKind;
use crate::record::Record;

mod error_log;
mod mail_log;

pub use self::error_log::ErrorLogFormatter;
pub use self::mail_log::MailLogFormatter;

/// A formatter renders one record variant into a string.
pub trait Formatter: fmt::Debug + Send + Sync + 'static {
    /// Formats a log record.
    ///
    /// # Errors
    ///
    /// Return a [`ErrorKind::FormatMismatch`] error if the record is not the variant this
    /// formatter renders.
    fn format(&self, record: &Record) -> Result<String, Error>;
}

impl<T: Formatter> From<T> for Box<dyn Formatter> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

fn mismatch(formatter: &'static str, expected: &'static str, record: &Record) -> Error {
    Error::new(
        ErrorKind::FormatMismatch,
        format!("record must be an instance of {expected}"),
    )
    .with_context("formatter", formatter)
    .with_context("record", record.kind_name())
}
