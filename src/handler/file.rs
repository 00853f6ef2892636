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

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Error;
use crate::formatter::ErrorLogFormatter;
use crate::formatter::Formatter;
use crate::handler::Handler;
use crate::hook::Hook;
use crate::hook::Hooks;
use crate::record::Args;
use crate::record::ErrorRecord;
use crate::record::Level;
use crate::record::Record;

/// A builder to configure and create a [`FileHandler`].
#[derive(Debug)]
pub struct FileHandlerBuilder {
    path: PathBuf,
    level: Level,
    formatter: Box<dyn Formatter>,
    hooks: Hooks,
}

impl FileHandlerBuilder {
    /// Create a new file handler builder writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            level: Level::Debug,
            formatter: Box::new(ErrorLogFormatter::default()),
            hooks: Hooks::default(),
        }
    }

    /// Set the threshold level.
    ///
    /// Default to [`Level::Debug`].
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the formatter.
    ///
    /// Default to [`ErrorLogFormatter`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rawlog::formatter::ErrorLogFormatter;
    /// use rawlog::handler::FileHandlerBuilder;
    ///
    /// let builder = FileHandlerBuilder::new("app.log").formatter(ErrorLogFormatter::default());
    /// ```
    pub fn formatter(mut self, formatter: impl Into<Box<dyn Formatter>>) -> Self {
        self.formatter = formatter.into();
        self
    }

    /// Add a hook.
    pub fn hook(mut self, hook: impl Into<Box<dyn Hook>>) -> Self {
        self.hooks.push(hook.into());
        self
    }

    /// Build the [`FileHandler`].
    ///
    /// The file itself is created lazily, on the first record at or above the threshold.
    ///
    /// # Errors
    ///
    /// Return a [`Config`](crate::ErrorKind::Config) error if the configured path is empty.
    pub fn build(self) -> Result<FileHandler, Error> {
        let FileHandlerBuilder {
            path,
            level,
            formatter,
            hooks,
        } = self;

        if path.as_os_str().is_empty() {
            return Err(Error::config("file handler requires a file path"));
        }

        Ok(FileHandler {
            level,
            path: Mutex::new(path),
            formatter,
            hooks,
        })
    }
}

/// A handler that appends formatted records to a file.
///
/// # Examples
///
/// ```no_run
/// use rawlog::handler::FileHandler;
/// use rawlog::record::Level;
///
/// let handler = FileHandler::builder("logs/app.log")
///     .level(Level::Info)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct FileHandler {
    level: Level,
    path: Mutex<PathBuf>,
    formatter: Box<dyn Formatter>,
    hooks: Hooks,
}

impl FileHandler {
    /// Create a new [`FileHandlerBuilder`].
    pub fn builder(path: impl Into<PathBuf>) -> FileHandlerBuilder {
        FileHandlerBuilder::new(path)
    }

    /// The path records are currently appended to.
    pub fn path(&self) -> PathBuf {
        self.path_guard().clone()
    }

    pub(crate) fn path_guard(&self) -> MutexGuard<'_, PathBuf> {
        self.path.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Handler for FileHandler {
    fn level(&self) -> Level {
        self.level
    }

    fn create_record(&self, level: Level, args: &Args) -> Record {
        let mut record = Record::Error(ErrorRecord::new(level, args.message()));
        self.hooks.on_create_record(&mut record);
        record
    }

    fn handle(&self, record: &Record) -> Result<(), Error> {
        self.hooks.before_handle(record)?;

        let handled = record.level() >= self.level;
        if handled {
            let mut text = self.formatter.format(record)?;
            self.hooks.on_format(record, &mut text);
            let path = self.path_guard();
            append(&path, text.as_bytes())?;
        }

        self.hooks.after_handle(record, handled)
    }
}

fn append(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| Error::from_io_error(err).with_context("path", path.display()))?;

    file.write_all(bytes)
        .map_err(|err| Error::from_io_error(err).with_context("path", path.display()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::ErrorKind;
    use crate::formatter::MailLogFormatter;

    #[test]
    fn test_write_at_or_above_threshold_only() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.txt");

        let handler = FileHandler::builder(&path)
            .level(Level::Warning)
            .build()
            .unwrap();

        for level in Level::ALL {
            let record = handler.create_record(level, &Args::new(format!("at {level}")));
            handler.handle(&record).unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        let lines = content.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("[WARNING] [-] at WARNING"));
        assert!(lines[4].contains("[EMERGENCY] [-] at EMERGENCY"));
    }

    #[test]
    fn test_every_level_against_every_threshold() {
        let temp_dir = TempDir::new().unwrap();

        for threshold in Level::ALL {
            let path = temp_dir.path().join(format!("{threshold}.txt"));
            let handler = FileHandler::builder(&path).level(threshold).build().unwrap();

            for level in Level::ALL {
                let record = handler.create_record(level, &Args::new(level.as_str()));
                handler.handle(&record).unwrap();
            }

            let content = fs::read_to_string(&path).unwrap_or_default();
            for level in Level::ALL {
                let written = content.contains(&format!("[{level}] [-] {level}\n"));
                assert_eq!(written, level >= threshold, "{level} at threshold {threshold}");
            }
        }
    }

    #[test]
    fn test_below_threshold_creates_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.txt");

        let handler = FileHandler::builder(&path)
            .level(Level::Error)
            .build()
            .unwrap();
        let record = handler.create_record(Level::Info, &Args::new("quiet"));
        handler.handle(&record).unwrap();

        assert!(!path.exists());
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("log.txt");

        let handler = FileHandler::builder(&path).build().unwrap();
        let record = handler.create_record(Level::Debug, &Args::new("lost"));
        let err = handler.handle(&record).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_wrong_formatter_is_format_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.txt");

        let handler = FileHandler::builder(&path)
            .formatter(MailLogFormatter::default())
            .build()
            .unwrap();
        let record = handler.create_record(Level::Debug, &Args::new("nope"));
        let err = handler.handle(&record).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FormatMismatch);
        assert!(!path.exists());
    }

    #[test]
    fn test_empty_path_is_config_error() {
        let err = FileHandler::builder("").build().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
