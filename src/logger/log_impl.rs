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

use crate::Error;
use crate::config::LogConfig;
use crate::config::Registry;
use crate::handler::Handler;
use crate::record::Args;
use crate::record::Level;

/// A log dispatcher that fans each call out to its handlers.
///
/// Handlers run synchronously, in insertion order. The first handler error aborts the dispatch
/// and is returned to the caller; the remaining handlers do not see that call.
///
/// # Examples
///
/// ```no_run
/// use rawlog::Log;
/// use rawlog::handler::FileHandler;
/// use rawlog::record::Level;
///
/// let mut log = Log::default();
/// log.add_handler(FileHandler::builder("app.log").level(Level::Info).build()?);
///
/// log.info("service started")?;
/// log.debug("dropped: below the handler threshold")?;
/// # Ok::<(), rawlog::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct Log {
    handlers: Vec<Box<dyn Handler>>,
}

impl Log {
    pub(super) fn new(handlers: Vec<Box<dyn Handler>>) -> Self {
        Self { handlers }
    }

    /// Build a log from a configuration, resolving type tags through `registry`.
    ///
    /// # Errors
    ///
    /// Return a [`Config`](crate::ErrorKind::Config) error if any handler configuration is
    /// invalid.
    pub fn from_config(config: &LogConfig, registry: &Registry) -> Result<Log, Error> {
        registry.build_log(config)
    }

    /// Append a handler.
    pub fn add_handler(&mut self, handler: impl Into<Box<dyn Handler>>) {
        self.handlers.push(handler.into());
    }

    /// The registered handlers, in dispatch order.
    pub fn handlers(&self) -> &[Box<dyn Handler>] {
        &self.handlers
    }

    /// Log a message at [`Level::Debug`].
    pub fn debug(&self, message: impl Into<String>) -> Result<(), Error> {
        self.log(Level::Debug, message)
    }

    /// Log a message at [`Level::Info`].
    pub fn info(&self, message: impl Into<String>) -> Result<(), Error> {
        self.log(Level::Info, message)
    }

    /// Log a message at [`Level::Notice`].
    pub fn notice(&self, message: impl Into<String>) -> Result<(), Error> {
        self.log(Level::Notice, message)
    }

    /// Log a message at [`Level::Warning`].
    pub fn warning(&self, message: impl Into<String>) -> Result<(), Error> {
        self.log(Level::Warning, message)
    }

    /// Log a message at [`Level::Error`].
    pub fn error(&self, message: impl Into<String>) -> Result<(), Error> {
        self.log(Level::Error, message)
    }

    /// Log a message at [`Level::Critical`].
    pub fn critical(&self, message: impl Into<String>) -> Result<(), Error> {
        self.log(Level::Critical, message)
    }

    /// Log a message at [`Level::Alert`].
    pub fn alert(&self, message: impl Into<String>) -> Result<(), Error> {
        self.log(Level::Alert, message)
    }

    /// Log a message at [`Level::Emergency`].
    pub fn emergency(&self, message: impl Into<String>) -> Result<(), Error> {
        self.log(Level::Emergency, message)
    }

    /// Log a message at the given level.
    pub fn log(&self, level: Level, message: impl Into<String>) -> Result<(), Error> {
        self.log_args(level, &Args::new(message))
    }

    /// Log with full arguments, so that mail handlers receive a title, heading and body.
    ///
    /// # Examples
    ///
    /// ```
    /// use rawlog::Log;
    /// use rawlog::record::Args;
    /// use rawlog::record::Level;
    ///
    /// let log = Log::default();
    /// let args = Args::new("replica lag is 30s").title("Replica lag").heading("db-2");
    /// log.log_args(Level::Alert, &args).unwrap();
    /// ```
    pub fn log_args(&self, level: Level, args: &Args) -> Result<(), Error> {
        for handler in &self.handlers {
            let record = handler.create_record(level, args);
            handler.handle(&record)?;
        }
        Ok(())
    }

    /// Flush every handler.
    pub fn flush(&self) -> Result<(), Error> {
        for handler in &self.handlers {
            handler.flush()?;
        }
        Ok(())
    }

    /// Return the name of a numeric level, or an empty string if `level` is not a known level.
    ///
    /// # Examples
    ///
    /// ```
    /// use rawlog::Log;
    ///
    /// assert_eq!(Log::level_string(4), "ERROR");
    /// assert_eq!(Log::level_string(42), "");
    /// ```
    pub fn level_string(level: i64) -> &'static str {
        Level::try_from(level).map_or("", |level| level.as_str())
    }
}
