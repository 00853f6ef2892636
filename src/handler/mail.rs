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

use std::sync::MutexGuard;

use crate::Error;
use crate::formatter::Formatter;
use crate::formatter::MailLogFormatter;
use crate::handler::Handler;
use crate::hook::Hook;
use crate::hook::Hooks;
use crate::mailer::Mailer;
use crate::mailer::SharedMailer;
use crate::record::Args;
use crate::record::Level;
use crate::record::MailRecord;
use crate::record::Record;

/// A builder to configure and create a [`MailHandler`].
#[derive(Debug)]
pub struct MailHandlerBuilder {
    mailer: SharedMailer,
    level: Level,
    formatter: Box<dyn Formatter>,
    recipient: Option<String>,
    subject: Option<String>,
    hooks: Hooks,
}

impl MailHandlerBuilder {
    /// Create a new mail handler builder sending through `mailer`.
    ///
    /// Use [`mailer::shared`](crate::mailer::shared) to wrap a [`Mailer`].
    pub fn new(mailer: SharedMailer) -> Self {
        Self {
            mailer,
            level: Level::Debug,
            formatter: Box::new(MailLogFormatter::default()),
            recipient: None,
            subject: None,
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
    /// Default to [`MailLogFormatter`].
    pub fn formatter(mut self, formatter: impl Into<Box<dyn Formatter>>) -> Self {
        self.formatter = formatter.into();
        self
    }

    /// Set the recipient passed to [`Mailer::set_recipient`] before every send.
    pub fn recipient(mut self, address: impl Into<String>) -> Self {
        self.recipient = Some(address.into());
        self
    }

    /// Set the subject used when a record has an empty title.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Add a hook.
    pub fn hook(mut self, hook: impl Into<Box<dyn Hook>>) -> Self {
        self.hooks.push(hook.into());
        self
    }

    /// Build the [`MailHandler`].
    pub fn build(self) -> MailHandler {
        let MailHandlerBuilder {
            mailer,
            level,
            formatter,
            recipient,
            subject,
            hooks,
        } = self;

        MailHandler {
            mailer,
            level,
            formatter,
            recipient,
            subject,
            hooks,
        }
    }
}

/// A handler that mails each record as an HTML message.
///
/// No retry is attempted: a failing [`Mailer::send`] fails the log call.
#[derive(Debug)]
pub struct MailHandler {
    mailer: SharedMailer,
    level: Level,
    formatter: Box<dyn Formatter>,
    recipient: Option<String>,
    subject: Option<String>,
    hooks: Hooks,
}

impl MailHandler {
    /// Create a new [`MailHandlerBuilder`].
    pub fn builder(mailer: SharedMailer) -> MailHandlerBuilder {
        MailHandlerBuilder::new(mailer)
    }

    /// The configured recipient, if any.
    pub fn recipient(&self) -> Option<&str> {
        self.recipient.as_deref()
    }

    fn mailer(&self) -> MutexGuard<'_, dyn Mailer> {
        self.mailer.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn subject_of<'a>(&'a self, record: &'a Record) -> &'a str {
        let title = match record {
            Record::Mail(r) => r.title(),
            Record::Error(_) => "",
        };
        match (title, &self.subject) {
            ("", Some(subject)) => subject.as_str(),
            (title, _) => title,
        }
    }
}

impl Handler for MailHandler {
    fn level(&self) -> Level {
        self.level
    }

    fn create_record(&self, level: Level, args: &Args) -> Record {
        let mut record = Record::Mail(MailRecord::from_args(level, args));
        self.hooks.on_create_record(&mut record);
        record
    }

    fn handle(&self, record: &Record) -> Result<(), Error> {
        self.hooks.before_handle(record)?;

        let handled = record.level() >= self.level;
        if handled {
            let mut body = self.formatter.format(record)?;
            self.hooks.on_format(record, &mut body);

            let mut mailer = self.mailer();
            mailer.set_html(true);
            mailer.set_subject(self.subject_of(record));
            if let Some(recipient) = &self.recipient {
                mailer.set_recipient(recipient);
            }
            mailer.set_body(&body);
            mailer.send()?;
        }

        self.hooks.after_handle(record, handled)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;
    use crate::ErrorKind;
    use crate::formatter::ErrorLogFormatter;
    use crate::mailer;

    #[derive(Debug, Default, Clone)]
    struct Outbox {
        html: bool,
        subject: String,
        recipient: Option<String>,
        body: String,
        sent: Vec<(String, String)>,
    }

    #[derive(Debug, Default)]
    struct TestMailer {
        outbox: Arc<Mutex<Outbox>>,
        fail: bool,
    }

    impl Mailer for TestMailer {
        fn set_html(&mut self, html: bool) {
            self.outbox.lock().unwrap().html = html;
        }

        fn set_subject(&mut self, subject: &str) {
            self.outbox.lock().unwrap().subject = subject.to_string();
        }

        fn set_body(&mut self, body: &str) {
            self.outbox.lock().unwrap().body = body.to_string();
        }

        fn set_recipient(&mut self, address: &str) {
            self.outbox.lock().unwrap().recipient = Some(address.to_string());
        }

        fn send(&mut self) -> Result<(), Error> {
            if self.fail {
                return Err(Error::transport("connection refused"));
            }
            let mut outbox = self.outbox.lock().unwrap();
            let sent = (outbox.subject.clone(), outbox.body.clone());
            outbox.sent.push(sent);
            Ok(())
        }
    }

    fn test_mailer(fail: bool) -> (SharedMailer, Arc<Mutex<Outbox>>) {
        let outbox = Arc::new(Mutex::new(Outbox::default()));
        let mailer = mailer::shared(TestMailer {
            outbox: outbox.clone(),
            fail,
        });
        (mailer, outbox)
    }

    #[test]
    fn test_send_at_or_above_threshold() {
        let (mailer, outbox) = test_mailer(false);
        let handler = MailHandler::builder(mailer).level(Level::Error).build();

        let args = Args::new("disk full").title("Disk").heading("db-1");
        let record = handler.create_record(Level::Warning, &args);
        handler.handle(&record).unwrap();
        assert!(outbox.lock().unwrap().sent.is_empty());

        let record = handler.create_record(Level::Critical, &args);
        handler.handle(&record).unwrap();

        let outbox = outbox.lock().unwrap();
        assert!(outbox.html);
        assert_eq!(outbox.recipient, None);
        assert_eq!(outbox.sent.len(), 1);
        let (subject, body) = &outbox.sent[0];
        assert_eq!(subject, "Disk");
        assert!(body.contains("<h1>Disk</h1>"));
        assert!(body.contains("<h5>db-1</h5>"));
        assert!(body.contains("<p>disk full</p>"));
    }

    #[test]
    fn test_every_level_against_every_threshold() {
        for threshold in Level::ALL {
            let (mailer, outbox) = test_mailer(false);
            let handler = MailHandler::builder(mailer).level(threshold).build();

            for level in Level::ALL {
                let record = handler.create_record(level, &Args::new("x").title(level.as_str()));
                handler.handle(&record).unwrap();
            }

            let subjects = outbox
                .lock()
                .unwrap()
                .sent
                .iter()
                .map(|(subject, _)| subject.clone())
                .collect::<Vec<_>>();
            let expected = Level::ALL
                .iter()
                .filter(|level| **level >= threshold)
                .map(|level| level.as_str().to_string())
                .collect::<Vec<_>>();
            assert_eq!(subjects, expected, "threshold {threshold}");
        }
    }

    #[test]
    fn test_default_subject_and_recipient() {
        let (mailer, outbox) = test_mailer(false);
        let handler = MailHandler::builder(mailer)
            .recipient("ops@example.com")
            .subject("Log Message")
            .build();
        assert_eq!(handler.recipient(), Some("ops@example.com"));

        let record = handler.create_record(Level::Error, &Args::new("untitled"));
        handler.handle(&record).unwrap();

        let outbox = outbox.lock().unwrap();
        assert_eq!(outbox.recipient.as_deref(), Some("ops@example.com"));
        assert_eq!(outbox.sent[0].0, "Log Message");
    }

    #[test]
    fn test_transport_error_propagates() {
        let (mailer, _) = test_mailer(true);
        let handler = MailHandler::builder(mailer).build();

        let record = handler.create_record(Level::Emergency, &Args::new("down"));
        let err = handler.handle(&record).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.message(), "connection refused");
    }

    #[test]
    fn test_mismatched_formatter_sends_nothing() {
        let (mailer, outbox) = test_mailer(false);
        let handler = MailHandler::builder(mailer)
            .formatter(ErrorLogFormatter::default())
            .build();

        let record = handler.create_record(Level::Error, &Args::new("oops"));
        let err = handler.handle(&record).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FormatMismatch);
        assert!(outbox.lock().unwrap().sent.is_empty());
    }
}
