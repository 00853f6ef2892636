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

//! Building handlers and logs from configuration.
//!
//! # Examples
//!
//! ```
//! use rawlog::Log;
//! use rawlog::config::LogConfig;
//! use rawlog::config::Registry;
//!
//! let config: LogConfig = serde_json::from_str(
//!     r#"{
//!         "handlers": [
//!             { "class": "file", "file": "app.log", "formatter": "error_log" },
//!             { "class": "rotating_file", "file": "logs/app.log", "level": "notice", "max_files": 7 }
//!         ]
//!     }"#,
//! )
//! .unwrap();
//!
//! let log = Log::from_config(&config, &Registry::default()).unwrap();
//! assert_eq!(log.handlers().len(), 2);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use serde::Deserialize;

use crate::Error;
use crate::Log;
use crate::formatter::ErrorLogFormatter;
use crate::formatter::Formatter;
use crate::formatter::MailLogFormatter;
use crate::handler::FileHandler;
use crate::handler::Handler;
use crate::handler::MailHandler;
use crate::handler::RotatingFileHandler;
use crate::mailer::SharedMailer;
use crate::record::Level;

/// The configuration of a [`Log`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// Handler configurations, in dispatch order.
    #[serde(default)]
    pub handlers: Vec<HandlerConfig>,
}

/// The configuration of one handler.
///
/// Keys a handler type does not use are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct HandlerConfig {
    /// The handler type tag, resolved through the [`Registry`].
    #[serde(alias = "type")]
    pub class: String,
    /// The threshold, as a number (`0`-`7`) or a level name.
    #[serde(default)]
    pub level: Level,
    /// The target file, or the base file name for rotation.
    pub file: Option<PathBuf>,
    /// The number of dated files a rotating handler keeps. `0` keeps everything.
    pub max_files: Option<usize>,
    /// The formatter tag, resolved through the [`Registry`].
    pub formatter: Option<String>,
    /// The name of a mailer registered with the [`Registry`].
    pub mailer: Option<String>,
    /// The mail recipient.
    pub recipient: Option<String>,
    /// The mail subject used for records without a title.
    pub subject: Option<String>,
}

impl HandlerConfig {
    /// Create a configuration with the given type tag and defaults for everything else.
    pub fn new(class: impl Into<String>) -> Self {
        HandlerConfig {
            class: class.into(),
            level: Level::Debug,
            file: None,
            max_files: None,
            formatter: None,
            mailer: None,
            recipient: None,
            subject: None,
        }
    }

    fn required_file(&self) -> Result<PathBuf, Error> {
        self.file
            .clone()
            .ok_or_else(|| Error::config("missing required field `file`"))
    }
}

/// Construct a handler from its configuration.
pub type HandlerFactory = fn(&HandlerConfig, &Registry) -> Result<Box<dyn Handler>, Error>;

/// Construct a formatter.
pub type FormatterFactory = fn() -> Box<dyn Formatter>;

/// Maps type tags to handler and formatter constructors, and names to mailers.
///
/// The default registry knows the handlers `file`, `rotating_file` and `mail`, and the
/// formatters `error_log`, `mail_log` and `mail_log_unescaped`. Mailers must be registered
/// explicitly.
pub struct Registry {
    handlers: BTreeMap<String, HandlerFactory>,
    formatters: BTreeMap<String, FormatterFactory>,
    mailers: BTreeMap<String, SharedMailer>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .field("formatters", &self.formatters.keys().collect::<Vec<_>>())
            .field("mailers", &self.mailers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Registry::empty();
        registry
            .register_handler("file", build_file_handler)
            .register_handler("rotating_file", build_rotating_file_handler)
            .register_handler("mail", build_mail_handler)
            .register_formatter("error_log", || Box::new(ErrorLogFormatter::default()))
            .register_formatter("mail_log", || Box::new(MailLogFormatter::default()))
            .register_formatter("mail_log_unescaped", || {
                Box::new(MailLogFormatter::unescaped())
            });
        registry
    }
}

impl Registry {
    /// Create a registry that knows no tags.
    pub fn empty() -> Self {
        Registry {
            handlers: BTreeMap::new(),
            formatters: BTreeMap::new(),
            mailers: BTreeMap::new(),
        }
    }

    /// Register a handler factory, replacing any factory with the same tag.
    pub fn register_handler(
        &mut self,
        tag: impl Into<String>,
        factory: HandlerFactory,
    ) -> &mut Self {
        self.handlers.insert(tag.into(), factory);
        self
    }

    /// Register a formatter factory, replacing any factory with the same tag.
    pub fn register_formatter(
        &mut self,
        tag: impl Into<String>,
        factory: FormatterFactory,
    ) -> &mut Self {
        self.formatters.insert(tag.into(), factory);
        self
    }

    /// Register a mailer under a name that handler configurations refer to.
    pub fn register_mailer(&mut self, name: impl Into<String>, mailer: SharedMailer) -> &mut Self {
        self.mailers.insert(name.into(), mailer);
        self
    }

    /// Construct the formatter registered under `tag`.
    pub fn formatter(&self, tag: &str) -> Result<Box<dyn Formatter>, Error> {
        match self.formatters.get(tag) {
            Some(factory) => Ok(factory()),
            None => Err(Error::config("unknown formatter").with_context("formatter", tag)),
        }
    }

    /// Return the mailer registered under `name`.
    pub fn mailer(&self, name: &str) -> Result<SharedMailer, Error> {
        match self.mailers.get(name) {
            Some(mailer) => Ok(mailer.clone()),
            None => Err(Error::config("unknown mailer").with_context("mailer", name)),
        }
    }

    /// Construct a handler from its configuration.
    ///
    /// # Errors
    ///
    /// Return a [`Config`](crate::ErrorKind::Config) error if the type tag is unknown or the
    /// handler rejects its configuration.
    pub fn build_handler(&self, config: &HandlerConfig) -> Result<Box<dyn Handler>, Error> {
        let factory = self.handlers.get(&config.class).ok_or_else(|| {
            Error::config("unknown handler class").with_context("class", &config.class)
        })?;
        factory(config, self)
    }

    /// Construct a [`Log`] with one handler per configuration entry, in order.
    pub fn build_log(&self, config: &LogConfig) -> Result<Log, Error> {
        let mut builder = crate::builder();
        for (i, handler) in config.handlers.iter().enumerate() {
            let handler = self
                .build_handler(handler)
                .map_err(|err| err.with_context("handler", i))?;
            builder = builder.handler(handler);
        }
        Ok(builder.build())
    }
}

fn build_file_handler(
    config: &HandlerConfig,
    registry: &Registry,
) -> Result<Box<dyn Handler>, Error> {
    let mut builder = FileHandler::builder(config.required_file()?).level(config.level);
    if let Some(tag) = &config.formatter {
        builder = builder.formatter(registry.formatter(tag)?);
    }
    Ok(Box::new(builder.build()?))
}

fn build_rotating_file_handler(
    config: &HandlerConfig,
    registry: &Registry,
) -> Result<Box<dyn Handler>, Error> {
    let mut builder = RotatingFileHandler::builder(config.required_file()?).level(config.level);
    if let Some(tag) = &config.formatter {
        builder = builder.formatter(registry.formatter(tag)?);
    }
    if let Some(n) = config.max_files.and_then(NonZeroUsize::new) {
        builder = builder.max_log_files(n);
    }
    Ok(Box::new(builder.build()?))
}

fn build_mail_handler(
    config: &HandlerConfig,
    registry: &Registry,
) -> Result<Box<dyn Handler>, Error> {
    let name = config
        .mailer
        .as_deref()
        .ok_or_else(|| Error::config("missing required field `mailer`"))?;

    let mut builder = MailHandler::builder(registry.mailer(name)?).level(config.level);
    if let Some(tag) = &config.formatter {
        builder = builder.formatter(registry.formatter(tag)?);
    }
    if let Some(recipient) = &config.recipient {
        builder = builder.recipient(recipient);
    }
    if let Some(subject) = &config.subject {
        builder = builder.subject(subject);
    }
    Ok(Box::new(builder.build()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::record::Args;
    use crate::record::ErrorRecord;
    use crate::record::Record;

    #[derive(Debug)]
    struct Null;

    impl Handler for Null {
        fn level(&self) -> Level {
            Level::Emergency
        }

        fn create_record(&self, level: Level, args: &Args) -> Record {
            Record::Error(ErrorRecord::new(level, args.message()))
        }

        fn handle(&self, _: &Record) -> Result<(), Error> {
            Ok(())
        }
    }

    fn build_null(_: &HandlerConfig, _: &Registry) -> Result<Box<dyn Handler>, Error> {
        Ok(Box::new(Null))
    }

    #[test]
    fn test_custom_handler_factory() {
        let mut registry = Registry::default();
        registry.register_handler("null", build_null);

        let handler = registry.build_handler(&HandlerConfig::new("null")).unwrap();
        assert_eq!(handler.level(), Level::Emergency);
    }

    #[test]
    fn test_unknown_tags() {
        let registry = Registry::default();

        let err = registry.build_handler(&HandlerConfig::new("syslog")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(err.to_string().contains("class: syslog"));

        let err = registry.formatter("json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = registry.mailer("smtp").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_empty_registry_knows_nothing() {
        let registry = Registry::empty();
        let mut config = HandlerConfig::new("file");
        config.file = Some(PathBuf::from("log.txt"));
        assert!(registry.build_handler(&config).is_err());
        assert_eq!(
            format!("{:?}", Registry::empty()),
            "Registry { handlers: [], formatters: [], mailers: [] }"
        );
    }
}
