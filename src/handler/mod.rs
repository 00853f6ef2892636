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

//! Handlers that conditionally format and emit log records.

use std::fmt;

use crate::Error;
use crate::record::Args;
use crate::record::Level;
use crate::record::Record;

mod clock;
mod file;
mod mail;
mod rotating;

pub use self::file::FileHandler;
pub use self::file::FileHandlerBuilder;
pub use self::mail::MailHandler;
pub use self::mail::MailHandlerBuilder;
pub use self::rotating::RotatingFileHandler;
pub use self::rotating::RotatingFileHandlerBuilder;

/// A sink that emits records at or above its threshold level.
pub trait Handler: fmt::Debug + Send + Sync + 'static {
    /// The threshold: records below this level are dropped.
    fn level(&self) -> Level;

    /// Build the record variant this handler emits from the arguments of a log call.
    fn create_record(&self, level: Level, args: &Args) -> Record;

    /// Emit the record if its level is at or above the threshold.
    ///
    /// A record below the threshold is not an error; it is silently dropped.
    fn handle(&self, record: &Record) -> Result<(), Error>;

    /// Flush any buffered records.
    ///
    /// Default to a no-op.
    fn flush(&self) -> Result<(), Error> {
        Ok(())
    }
}

impl<T: Handler> From<T> for Box<dyn Handler> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}
