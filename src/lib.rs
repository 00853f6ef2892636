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

//! Rawlog is a small leveled logging facility: a [`Log`] fans every message out to an ordered
//! list of [`Handler`]s, each of which formats and emits the records at or above its own
//! threshold.
//!
//! # Overview
//!
//! Three handlers are built in: [`FileHandler`](handler::FileHandler) appends to a file,
//! [`RotatingFileHandler`](handler::RotatingFileHandler) appends to a file named after the current
//! date, and [`MailHandler`](handler::MailHandler) sends an HTML mail through a user supplied
//! [`Mailer`](mailer::Mailer). Handlers and logs can be assembled in code or from a
//! [`LogConfig`](config::LogConfig).
//!
//! # Examples
//!
//! ```no_run
//! use rawlog::handler::FileHandler;
//! use rawlog::handler::RotatingFileHandler;
//! use rawlog::record::Level;
//!
//! let log = rawlog::builder()
//!     .handler(FileHandler::builder("logs/all.log").build()?)
//!     .handler(
//!         RotatingFileHandler::builder("logs/notice.log")
//!             .level(Level::Notice)
//!             .build()?,
//!     )
//!     .build();
//!
//! log.debug("written to logs/all.log only")?;
//! log.warning("written to both files")?;
//! # Ok::<(), rawlog::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod bridge;
pub mod config;
pub mod formatter;
pub mod handler;
pub mod hook;
pub mod mailer;
pub mod record;
pub mod trap;

mod error;
pub use self::error::Error;
pub use self::error::ErrorKind;

mod logger;
pub use self::logger::*;

pub use self::formatter::Formatter;
pub use self::handler::Handler;
pub use self::record::Level;
pub use self::record::Record;
