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

//! Extension points invoked by handlers.

use std::fmt;

use crate::Error;
use crate::record::Record;

/// Callbacks a handler invokes at fixed points of its life cycle.
///
/// Every method defaults to a no-op. Hooks run synchronously, in the order they were added.
///
/// # Examples
///
/// ```
/// use rawlog::hook::Hook;
/// use rawlog::record::Record;
///
/// #[derive(Debug)]
/// struct Redact;
///
/// impl Hook for Redact {
///     fn on_create_record(&self, record: &mut Record) {
///         if let Record::Error(r) = record {
///             *r = r.clone().with_client("redacted");
///         }
///     }
/// }
/// ```
pub trait Hook: fmt::Debug + Send + Sync + 'static {
    /// Called after a handler creates a record, before the record is handled.
    fn on_create_record(&self, record: &mut Record) {
        let _ = record;
    }

    /// Called when handling starts, before the threshold check.
    ///
    /// Returning an error aborts the handling.
    fn before_handle(&self, record: &Record) -> Result<(), Error> {
        let _ = record;
        Ok(())
    }

    /// Called with the formatted output of a record at or above the handler threshold, before
    /// it is written or sent.
    ///
    /// The hook may rewrite `text` in place.
    fn on_format(&self, record: &Record, text: &mut String) {
        let _ = (record, text);
    }

    /// Called when handling finished without error.
    ///
    /// `handled` is `false` if the record was below the handler threshold.
    fn after_handle(&self, record: &Record, handled: bool) -> Result<(), Error> {
        let _ = (record, handled);
        Ok(())
    }
}

impl<T: Hook> From<T> for Box<dyn Hook> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// The hooks attached to one handler.
#[derive(Debug, Default)]
pub(crate) struct Hooks {
    hooks: Vec<Box<dyn Hook>>,
}

impl Hooks {
    pub(crate) fn push(&mut self, hook: Box<dyn Hook>) {
        self.hooks.push(hook);
    }

    pub(crate) fn on_create_record(&self, record: &mut Record) {
        for hook in &self.hooks {
            hook.on_create_record(record);
        }
    }

    pub(crate) fn before_handle(&self, record: &Record) -> Result<(), Error> {
        for hook in &self.hooks {
            hook.before_handle(record)?;
        }
        Ok(())
    }

    pub(crate) fn on_format(&self, record: &Record, text: &mut String) {
        for hook in &self.hooks {
            hook.on_format(record, text);
        }
    }

    pub(crate) fn after_handle(&self, record: &Record, handled: bool) -> Result<(), Error> {
        for hook in &self.hooks {
            hook.after_handle(record, handled)?;
        }
        Ok(())
    }
}
