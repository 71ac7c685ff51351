// Copyright 2017-2024 Peter Williams and collaborators
// Licensed under the MIT License.

/*!
A notification backend that sends colorized output to the terminal.

Notes go to standard output; everything more serious goes to standard error.

*/

use anyhow::Error;
use std::backtrace::BacktraceStatus;
use std::fmt::Arguments;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::{ChatterLevel, NotificationBackend, NotificationKind};

fn bold(color: Color) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color)).set_bold(true);
    spec
}

/// Reports notifications on the terminal, with colorized prefixes.
pub struct TermcolorNotificationBackend {
    chatter: ChatterLevel,
    out: StandardStream,
    err: StandardStream,
}

impl TermcolorNotificationBackend {
    /// Create a backend that reports at the given chatter level.
    pub fn new(chatter: ChatterLevel) -> Self {
        TermcolorNotificationBackend {
            chatter,
            out: StandardStream::stdout(ColorChoice::Auto),
            err: StandardStream::stderr(ColorChoice::Auto),
        }
    }

    fn shows(&self, kind: NotificationKind) -> bool {
        kind != NotificationKind::Note || self.chatter > ChatterLevel::Minimal
    }

    /// Write one prefixed line. Failures to write to the terminal are
    /// ignored.
    fn line(&mut self, kind: NotificationKind, prefix: &str, args: Arguments) {
        if !self.shows(kind) {
            return;
        }

        let (color, stream) = match kind {
            NotificationKind::Note => (Color::Green, &mut self.out),
            NotificationKind::Warning => (Color::Yellow, &mut self.err),
            NotificationKind::Fatal => (Color::Red, &mut self.err),
        };

        let _ = stream.set_color(&bold(color));
        let _ = write!(stream, "{prefix}");
        let _ = stream.reset();
        let _ = writeln!(stream, " {args}");
    }

    fn causes(&mut self, kind: NotificationKind, first_prefix: &str, err: &Error) {
        for (i, cause) in err.chain().enumerate() {
            let prefix = if i == 0 { first_prefix } else { "caused by:" };
            self.line(kind, prefix, format_args!("{cause}"));
        }

        let backtrace = err.backtrace();

        if backtrace.status() == BacktraceStatus::Captured && self.shows(kind) {
            self.line(kind, "debugging:", format_args!("backtrace follows:"));
            let _ = writeln!(self.err, "{backtrace}");
        }
    }

    /// Report a failure: the error, each of its causes, and the backtrace
    /// if one was captured.
    pub fn bare_error<E: Into<Error>>(&mut self, err: E) {
        self.causes(NotificationKind::Fatal, "error:", &err.into());
    }
}

impl NotificationBackend for TermcolorNotificationBackend {
    fn notify(&mut self, kind: NotificationKind, args: Arguments, err: Option<Error>) {
        let prefix = match kind {
            NotificationKind::Note => "note:",
            NotificationKind::Warning => "warning:",
            NotificationKind::Fatal => "fatal:",
        };

        self.line(kind, prefix, args);

        if let Some(e) = err {
            self.causes(kind, "caused by:", &e);
        }
    }
}
