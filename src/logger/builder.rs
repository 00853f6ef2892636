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
use crate::handler::Handler;

/// Create a new empty [`LogBuilder`] instance for configuring handlers.
///
/// # Examples
///
/// ```no_run
/// use rawlog::handler::FileHandler;
///
/// let log = rawlog::builder()
///     .handler(FileHandler::builder("app.log").build().unwrap())
///     .build();
/// ```
pub fn builder() -> LogBuilder {
    LogBuilder { handlers: vec![] }
}

/// A builder for configuring the handlers of a [`Log`].
#[must_use = "call `build` to construct a log instance"]
#[derive(Debug)]
pub struct LogBuilder {
    // stashed handlers, in dispatch order
    handlers: Vec<Box<dyn Handler>>,
}

impl LogBuilder {
    /// Register a new handler. Handlers run in registration order.
    pub fn handler(mut self, handler: impl Into<Box<dyn Handler>>) -> Self {
        self.handlers.push(handler.into());
        self
    }

    /// Build the [`Log`].
    pub fn build(self) -> Log {
        Log::new(self.handlers)
    }
}
