// Copyright 2017-2024 Peter Williams and collaborators
// Licensed under the MIT License.

/*!
A framework for notifying users about what tools are doing.

This module provides a way for mockcat programs to notify the user about
actions taken, problems, and so on. It is very narrowly targeted at the
command-line use case: library code reports progress through a
[`NotificationBackend`] handed to it, and never prints directly.

*/

pub mod termcolor;

use anyhow::Error;
use std::fmt::Arguments;

/// How chatty the notification system should be.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum ChatterLevel {
    /// Report warnings and errors only.
    Minimal,

    /// Also report progress notes.
    Normal,
}

/// The kind of notification that is being produced.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NotificationKind {
    /// Progress information.
    Note,

    /// Something looks off, but the run carries on.
    Warning,

    /// The run has failed.
    Fatal,
}

/// Something that can report notifications to the user.
pub trait NotificationBackend {
    /// Report one notification. If *err* is given, its chain of causes is
    /// reported after the message.
    fn notify(&mut self, kind: NotificationKind, args: Arguments, err: Option<Error>);
}

#[doc(hidden)]
#[macro_export]
macro_rules! __mc_notify {
    ($kind:ident, $dest:expr, $( $fmt_args:expr ),*) => {
        $dest.notify($crate::notify::NotificationKind::$kind, format_args!($( $fmt_args ),*), None)
    };
    ($kind:ident, $dest:expr, $( $fmt_args:expr ),* ; $err:expr) => {
        $dest.notify($crate::notify::NotificationKind::$kind, format_args!($( $fmt_args ),*), Some($err))
    };
}

/// Report progress.
///
/// ```rust,ignore
/// mc_note!(nbe, "scraped {} files", n_files);
/// ```
///
/// where `nbe` implements [`NotificationBackend`]. An error may follow the
/// format arguments after a semicolon, in which case its causes are reported
/// too.
#[macro_export]
macro_rules! mc_note {
    ($( $args:tt )*) => { $crate::__mc_notify!(Note, $( $args )*) };
}

/// Warn about a suspicious condition that does not stop the run.
///
/// Usage is the same as `mc_note!`.
#[macro_export]
macro_rules! mc_warning {
    ($( $args:tt )*) => { $crate::__mc_notify!(Warning, $( $args )*) };
}

/// A backend that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotificationBackend;

impl NoopNotificationBackend {
    /// Create a backend that discards everything.
    pub fn new() -> Self {
        NoopNotificationBackend
    }
}

impl NotificationBackend for NoopNotificationBackend {
    fn notify(&mut self, _kind: NotificationKind, _args: Arguments, _err: Option<Error>) {}
}

/// A backend that keeps notifications in memory to be inspected later.
#[derive(Debug, Default)]
pub struct BufferingNotificationBackend {
    held: Vec<(NotificationKind, String, Option<Error>)>,
}

impl BufferingNotificationBackend {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The kinds and texts of the held notifications, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = (NotificationKind, &str)> {
        self.held.iter().map(|(kind, text, _)| (*kind, text.as_str()))
    }
}

impl NotificationBackend for BufferingNotificationBackend {
    fn notify(&mut self, kind: NotificationKind, args: Arguments, err: Option<Error>) {
        self.held.push((kind, args.to_string(), err));
    }
}

/// Adds the `--chatter` option to a clap command.
pub trait ClapNotificationArgsExt {
    /// Add a global `--chatter` option selecting a [`ChatterLevel`].
    fn mockcat_notify_args(self) -> Self;
}

impl ClapNotificationArgsExt for clap::Command {
    fn mockcat_notify_args(self) -> Self {
        self.arg(
            clap::Arg::new("chatter_level")
                .long("chatter")
                .short('c')
                .value_name("LEVEL")
                .help("How much chatter to print when running")
                .value_parser(["default", "minimal"])
                .default_value("default")
                .global(true),
        )
    }
}

/// Run a program body, reporting to the terminal at the chatter level chosen
/// on the command line.
///
/// Returns the process exit code: whatever *inner* returns on success, or 1
/// after printing the error chain if it fails.
pub fn run_with_notifications<E, F>(matches: clap::ArgMatches, inner: F) -> i32
where
    E: Into<Error>,
    F: FnOnce(clap::ArgMatches, &mut dyn NotificationBackend) -> Result<i32, E>,
{
    let chatter = match matches.get_one::<String>("chatter_level").map(|s| s.as_str()) {
        Some("minimal") => ChatterLevel::Minimal,
        _ => ChatterLevel::Normal,
    };

    let mut terminal = self::termcolor::TermcolorNotificationBackend::new(chatter);

    inner(matches, &mut terminal).unwrap_or_else(|e| {
        terminal.bare_error(e);
        1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffering_keeps_order() {
        let mut b = BufferingNotificationBackend::new();
        mc_note!(b, "reading {} files", 3);
        mc_warning!(b, "file {} is empty", "mocksky.2.hdf5");

        let msgs: Vec<_> = b.messages().collect();
        assert_eq!(
            msgs,
            vec![
                (NotificationKind::Note, "reading 3 files"),
                (NotificationKind::Warning, "file mocksky.2.hdf5 is empty"),
            ]
        );
    }

    #[test]
    fn errors_are_kept() {
        let mut b = BufferingNotificationBackend::new();
        mc_note!(b, "done");
        mc_warning!(b, "odd input"; anyhow::anyhow!("file {} is empty", 2));
        assert!(b.held[0].2.is_none());
        assert_eq!(
            b.held[1].2.as_ref().map(|e| e.to_string()),
            Some("file 2 is empty".to_owned())
        );
    }

    #[test]
    fn chatter_ordering() {
        assert!(ChatterLevel::Minimal < ChatterLevel::Normal);
    }

    #[test]
    fn chatter_argument() {
        let cmd = clap::Command::new("t").mockcat_notify_args();
        let m = cmd.try_get_matches_from(["t", "--chatter", "minimal"]).unwrap();
        assert_eq!(
            m.get_one::<String>("chatter_level").map(|s| s.as_str()),
            Some("minimal")
        );
    }
}
