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

use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::path::PathBuf;

use jiff::civil::Date;

use crate::Error;
use crate::ErrorKind;
use crate::formatter::Formatter;
use crate::handler::FileHandler;
use crate::handler::FileHandlerBuilder;
use crate::handler::Handler;
use crate::handler::clock::Clock;
use crate::hook::Hook;
use crate::record::Args;
use crate::record::Level;
use crate::record::Record;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

const DATE_FORMAT: &str = "%d-%m-%Y";

/// A builder to configure and create a [`RotatingFileHandler`].
#[derive(Debug)]
pub struct RotatingFileHandlerBuilder {
    file: FileHandlerBuilder,
    max_files: Option<NonZeroUsize>,
    clock: Clock,
    trap: Box<dyn Trap>,
}

impl RotatingFileHandlerBuilder {
    /// Create a new rotating file handler builder with the base file name `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: FileHandlerBuilder::new(path),
            max_files: None,
            clock: Clock::DefaultClock,
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Set the threshold level.
    ///
    /// Default to [`Level::Debug`].
    pub fn level(mut self, level: Level) -> Self {
        self.file = self.file.level(level);
        self
    }

    /// Set the formatter.
    ///
    /// Default to [`ErrorLogFormatter`](crate::formatter::ErrorLogFormatter).
    pub fn formatter(mut self, formatter: impl Into<Box<dyn Formatter>>) -> Self {
        self.file = self.file.formatter(formatter);
        self
    }

    /// Add a hook.
    pub fn hook(mut self, hook: impl Into<Box<dyn Hook>>) -> Self {
        self.file = self.file.hook(hook);
        self
    }

    /// Set the maximum number of dated log files to keep.
    ///
    /// When a new day starts, the oldest dated files are deleted. Default to keep everything.
    pub fn max_log_files(mut self, n: NonZeroUsize) -> Self {
        self.max_files = Some(n);
        self
    }

    /// Set the trap for errors while deleting old log files.
    ///
    /// Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    #[cfg(test)]
    fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Build the [`RotatingFileHandler`].
    ///
    /// # Errors
    ///
    /// Return a [`ErrorKind::Config`] error if the base path is empty or has no file name.
    pub fn build(self) -> Result<RotatingFileHandler, Error> {
        let RotatingFileHandlerBuilder {
            file,
            max_files,
            clock,
            trap,
        } = self;

        let file = file.build()?;
        let base = file.path();
        let stem = match base.file_stem() {
            Some(stem) => stem.to_string_lossy().into_owned(),
            None => {
                return Err(Error::config("rotating file handler requires a file name")
                    .with_context("path", base.display()));
            }
        };
        let extension = base
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned());

        Ok(RotatingFileHandler {
            file,
            base,
            stem,
            extension,
            max_files,
            clock,
            trap,
        })
    }
}

/// A handler that appends records to a file whose name carries the current date.
///
/// A base name `logs/app.log` is written as `logs/app-16-10-2026.log`. The name is recomputed
/// lazily: the first record handled on a new day switches to that day's file.
///
/// # Examples
///
/// ```no_run
/// use std::num::NonZeroUsize;
///
/// use rawlog::handler::RotatingFileHandler;
/// use rawlog::record::Level;
///
/// let handler = RotatingFileHandler::builder("logs/app.log")
///     .level(Level::Notice)
///     .max_log_files(NonZeroUsize::new(7).unwrap())
///     .build()
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct RotatingFileHandler {
    file: FileHandler,
    base: PathBuf,
    stem: String,
    extension: Option<String>,
    max_files: Option<NonZeroUsize>,
    clock: Clock,
    trap: Box<dyn Trap>,
}

#[derive(Debug)]
struct LogFile {
    filepath: PathBuf,
    date: Date,
}

impl RotatingFileHandler {
    /// Create a new [`RotatingFileHandlerBuilder`].
    pub fn builder(path: impl Into<PathBuf>) -> RotatingFileHandlerBuilder {
        RotatingFileHandlerBuilder::new(path)
    }

    /// The configured base file name.
    pub fn base_path(&self) -> &Path {
        &self.base
    }

    /// The path records are currently appended to.
    ///
    /// Equal to the base path until the first record is handled.
    pub fn path(&self) -> PathBuf {
        self.file.path()
    }

    fn dated_filename(&self, date: &str) -> String {
        let stem = &self.stem;
        match &self.extension {
            Some(ext) => format!("{stem}-{date}.{ext}"),
            None => format!("{stem}-{date}"),
        }
    }

    fn log_dir(&self) -> &Path {
        match self.base.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    fn refresh_path(&self) {
        let now = self.clock.now();
        let today = now.strftime(DATE_FORMAT).to_string();

        let mut path = self.file.path_guard();
        if path.to_string_lossy().contains(&today) {
            return;
        }
        *path = self.base.with_file_name(self.dated_filename(&today));
        drop(path);

        if let Some(max_files) = self.max_files {
            if let Err(err) = self.delete_oldest_logs(now.date(), max_files.get()) {
                let err =
                    Error::new(ErrorKind::Io, "failed to delete oldest logs").with_source(err);
                self.trap.trap(&err);
            }
        }
    }

    fn list_logfiles(&self) -> Result<Vec<LogFile>, Error> {
        let log_dir = self.log_dir();
        let read_dir = fs::read_dir(log_dir).map_err(|err| {
            Error::new(ErrorKind::Io, "failed to read log dir")
                .with_context("dir", log_dir.display())
                .with_source(err)
        })?;

        let prefix = format!("{}-", self.stem);
        let suffix = self.extension.as_ref().map(|ext| format!(".{ext}"));

        let files = read_dir
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let metadata = entry.metadata().ok()?;
                // the handler only creates files, not directories or symlinks
                if !metadata.is_file() {
                    return None;
                }

                let filename = entry.file_name();
                // if the filename is not a UTF-8 string, skip it.
                let filename = filename.to_str()?;
                let mut date = filename.strip_prefix(&prefix)?;
                if let Some(suffix) = &suffix {
                    date = date.strip_suffix(suffix.as_str())?;
                }

                let date = Date::strptime(DATE_FORMAT, date).ok()?;
                Some(LogFile {
                    filepath: entry.path(),
                    date,
                })
            })
            .collect::<Vec<_>>();

        Ok(files)
    }

    fn delete_oldest_logs(&self, today: Date, max_files: usize) -> Result<(), Error> {
        let mut files = self.list_logfiles()?;
        files.retain(|file| file.date != today);
        if files.len() < max_files {
            return Ok(());
        }

        // delete files, so that (n-1) files remain, because today's file is the n-th one
        files.sort_by_key(|file| file.date);
        for file in files.iter().take(files.len() - (max_files - 1)) {
            let filepath = &file.filepath;
            fs::remove_file(filepath).map_err(|err| {
                Error::new(ErrorKind::Io, "failed to remove old log")
                    .with_context("path", filepath.display())
                    .with_source(err)
            })?;
        }

        Ok(())
    }
}

impl Handler for RotatingFileHandler {
    fn level(&self) -> Level {
        self.file.level()
    }

    fn create_record(&self, level: Level, args: &Args) -> Record {
        self.file.create_record(level, args)
    }

    fn handle(&self, record: &Record) -> Result<(), Error> {
        self.refresh_path();
        self.file.handle(record)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use jiff::Zoned;
    use tempfile::TempDir;

    use super::*;
    use crate::handler::clock::ManualClock;

    fn at(time: &str) -> Zoned {
        time.parse().unwrap()
    }

    fn handler(base: PathBuf, now: &str) -> RotatingFileHandlerBuilder {
        RotatingFileHandler::builder(base).clock(Clock::ManualClock(ManualClock::new(at(now))))
    }

    fn log(handler: &RotatingFileHandler, level: Level, message: &str) {
        let record = handler.create_record(level, &Args::new(message));
        handler.handle(&record).unwrap();
    }

    #[test]
    fn test_rotate_once_per_day() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("log.txt");
        let handler = handler(base.clone(), "2024-10-01T08:00:00[UTC]")
            .build()
            .unwrap();
        assert_eq!(handler.path(), base);

        log(&handler, Level::Debug, "first");
        let expected = temp_dir.path().join("log-01-10-2024.txt");
        assert_eq!(handler.path(), expected);

        handler.clock.set_now(at("2024-10-01T23:59:59[UTC]"));
        log(&handler, Level::Debug, "second");
        assert_eq!(handler.path(), expected);

        let content = fs::read_to_string(&expected).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(!base.exists());
    }

    #[test]
    fn test_next_day_derives_from_base_name() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("log.txt");
        let handler = handler(base.clone(), "2024-10-01T23:00:00[UTC]").build().unwrap();

        log(&handler, Level::Info, "before midnight");
        handler.clock.set_now(at("2024-10-02T00:00:01[UTC]"));
        log(&handler, Level::Info, "after midnight");

        assert_eq!(
            handler.path(),
            temp_dir.path().join("log-02-10-2024.txt")
        );
        assert!(temp_dir.path().join("log-01-10-2024.txt").exists());
        assert!(temp_dir.path().join("log-02-10-2024.txt").exists());
        assert_eq!(handler.base_path(), base);
    }

    #[test]
    fn test_base_name_without_extension() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("app");
        let handler = handler(base, "2024-10-01T12:00:00[UTC]").build().unwrap();

        log(&handler, Level::Debug, "no extension");
        assert_eq!(handler.path(), temp_dir.path().join("app-01-10-2024"));
    }

    #[test]
    fn test_bare_file_name_stays_relative() {
        let handler = handler(PathBuf::from("log.txt"), "2024-10-01T12:00:00[UTC]")
            .build()
            .unwrap();
        assert_eq!(handler.dated_filename("01-10-2024"), "log-01-10-2024.txt");
        assert_eq!(handler.log_dir(), Path::new("."));

        handler.refresh_path();
        assert_eq!(handler.path(), PathBuf::from("log-01-10-2024.txt"));
    }

    #[test]
    fn test_below_threshold_still_rotates_name_only() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("log.txt");
        let handler = handler(base, "2024-10-01T12:00:00[UTC]")
            .level(Level::Notice)
            .build()
            .unwrap();

        log(&handler, Level::Debug, "dropped");
        assert_eq!(handler.path(), temp_dir.path().join("log-01-10-2024.txt"));
        assert!(!handler.path().exists());
    }

    #[test]
    fn test_keep_at_most_max_files() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("log.txt");
        fs::write(temp_dir.path().join("unrelated.txt"), "keep me").unwrap();

        let handler = handler(base, "2024-10-01T12:00:00[UTC]")
            .max_log_files(NonZeroUsize::new(3).unwrap())
            .build()
            .unwrap();

        let mut now = at("2024-10-01T12:00:00[UTC]");
        for _ in 0..6 {
            handler.clock.set_now(now.clone());
            log(&handler, Level::Error, "daily");
            now = now.tomorrow().unwrap();
        }

        let mut names = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect::<Vec<_>>();
        names.sort();
        assert_eq!(
            names,
            vec![
                "log-04-10-2024.txt",
                "log-05-10-2024.txt",
                "log-06-10-2024.txt",
                "unrelated.txt",
            ]
        );
    }

    #[derive(Debug, Clone, Default)]
    struct CollectTrap(Arc<Mutex<Vec<String>>>);

    impl Trap for CollectTrap {
        fn trap(&self, err: &Error) {
            self.0.lock().unwrap().push(err.to_string());
        }
    }

    #[test]
    fn test_prune_failure_goes_to_trap() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("missing").join("log.txt");
        let trap = CollectTrap::default();

        let handler = handler(base, "2024-10-01T12:00:00[UTC]")
            .max_log_files(NonZeroUsize::new(2).unwrap())
            .trap(trap.clone())
            .build()
            .unwrap();

        handler.refresh_path();
        let trapped = trap.0.lock().unwrap();
        assert_eq!(trapped.len(), 1);
        assert!(trapped[0].contains("failed to delete oldest logs"));
    }
}
