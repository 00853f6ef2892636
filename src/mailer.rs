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

//! The mail transport seam used by [`MailHandler`](crate::handler::MailHandler).

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;

use crate::Error;

/// A mail transport.
///
/// Delivery is not implemented by this crate; plug in any SMTP or API client by implementing this
/// trait. The handler configures the message with the setters and then calls [`send`].
///
/// [`send`]: Mailer::send
pub trait Mailer: fmt::Debug + Send + 'static {
    /// Toggle HTML mode for the message body.
    fn set_html(&mut self, html: bool);

    /// Set the message subject.
    fn set_subject(&mut self, subject: &str);

    /// Set the message body.
    fn set_body(&mut self, body: &str);

    /// Set the recipient address.
    ///
    /// Default to a no-op for transports whose recipient is fixed at construction.
    fn set_recipient(&mut self, address: &str) {
        let _ = address;
    }

    /// Send the configured message.
    ///
    /// # Errors
    ///
    /// Return an error, typically of kind [`Transport`](crate::ErrorKind::Transport), if the
    /// message cannot be delivered.
    fn send(&mut self) -> Result<(), Error>;
}

/// A mailer that can be shared by several handlers.
pub type SharedMailer = Arc<Mutex<dyn Mailer>>;

/// Wrap a mailer so it can be shared by several handlers.
pub fn shared(mailer: impl Mailer) -> SharedMailer {
    Arc::new(Mutex::new(mailer))
}
