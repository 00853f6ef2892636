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

use std::borrow::Cow;

use crate::Error;
use crate::formatter::Formatter;
use crate::formatter::mismatch;
use crate::record::Record;

/// A formatter that renders mail records as a small HTML page.
///
/// Output format:
///
/// ```text
/// <html>
///                 <head>
///                     <title>{title}</title>
///                 </head>
///                 <body>
///                     <h1>{title}</h1>
///                     <h5>{heading}</h5>
///                     <p>{body}</p>
///                 </body>
///             </html>
/// ```
///
/// The indentation is part of the output and stays stable for consumers that compare mails
/// byte for byte.
///
/// Title, heading and body are HTML-escaped unless the formatter is built with
/// [`unescaped`](MailLogFormatter::unescaped).
#[derive(Debug, Clone)]
pub struct MailLogFormatter {
    escape: bool,
}

impl Default for MailLogFormatter {
    fn default() -> Self {
        Self { escape: true }
    }
}

impl MailLogFormatter {
    /// Embed title, heading and body verbatim.
    ///
    /// Only use this when every value is trusted markup.
    pub fn unescaped() -> Self {
        Self { escape: false }
    }

    fn text<'a>(&self, s: &'a str) -> Cow<'a, str> {
        if self.escape {
            escape_html(s)
        } else {
            Cow::Borrowed(s)
        }
    }
}

impl Formatter for MailLogFormatter {
    fn format(&self, record: &Record) -> Result<String, Error> {
        let Record::Mail(record) = record else {
            return Err(mismatch("MailLogFormatter", "MailRecord", record));
        };

        let title = self.text(record.title());
        let heading = self.text(record.heading());
        let body = self.text(record.body());

        Ok(format!(
            "<html>\n                \
             <head>\n                    \
             <title>{title}</title>\n                \
             </head>\n                \
             <body>\n                    \
             <h1>{title}</h1>\n                    \
             <h5>{heading}</h5>\n                    \
             <p>{body}</p>\n                \
             </body>\n            \
             </html>"
        ))
    }
}

fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}
