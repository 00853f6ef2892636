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

use crate::Log;
use crate::record::Level;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

struct LogCrateProxy {
    log: Log,
    trap: DefaultTrap,
}

fn level_from_log_crate(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::Error,
        log::Level::Warn => Level::Warning,
        log::Level::Info => Level::Info,
        log::Level::Debug | log::Level::Trace => Level::Debug,
    }
}

impl log::Log for LogCrateProxy {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        let level = level_from_log_crate(metadata.level());
        self.log
            .handlers()
            .iter()
            .any(|handler| level >= handler.level())
    }

    fn log(&self, record: &log::Record) {
        if !log::Log::enabled(self, record.metadata()) {
            return;
        }

        let level = level_from_log_crate(record.level());
        if let Err(err) = self.log.log(level, record.args().to_string()) {
            self.trap.trap(&err);
        }
    }

    fn flush(&self) {
        if let Err(err) = self.log.flush() {
            self.trap.trap(&err);
        }
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_boxed_logger`] to install a proxy, and all logs from the log
/// crate will be forwarded to `log`. Errors raised by handlers are reported to the
/// [`DefaultTrap`], since the log crate has no way to return them.
///
/// Levels are mapped as `Error -> ERROR`, `Warn -> WARNING`, `Info -> INFO` and
/// `Debug`/`Trace -> DEBUG`.
///
/// This function will set the global maximum log level to `Trace`. To override this, call
/// [`log::set_max_level`] after this function.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// if let Err(err) = rawlog::bridge::try_setup_log_crate(rawlog::builder().build()) {
///     eprintln!("failed to setup log crate: {err}");
/// }
/// ```
pub fn try_setup_log_crate(log: Log) -> Result<(), log::SetLoggerError> {
    let proxy = LogCrateProxy {
        log,
        trap: DefaultTrap::default(),
    };
    log::set_boxed_logger(Box::new(proxy))?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger.
///
/// See [`try_setup_log_crate`].
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
pub fn setup_log_crate(log: Log) {
    try_setup_log_crate(log).expect(
        "rawlog::bridge::setup_log_crate must be called before the log crate global logger initialized",
    )
}
