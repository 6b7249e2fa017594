//! Tracing setup for the `bollo` binary.
//!
//! Command output owns stdout, so log records go to stderr and, once
//! [`enable_file_logging`] has been called, to an append-only log file.

use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use anyhow::{Result, anyhow, bail};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::{FmtContext, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, reload};

static LEVEL: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();
static CONSOLE_ENABLED: AtomicBool = AtomicBool::new(true);
static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

/// `HH:MM:SS.mmm LEVEL target: fields`, with the level coloured on a terminal.
struct CliFormat;

impl<S, N> FormatEvent<S, N> for CliFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        write!(writer, "{} ", Local::now().format("%H:%M:%S%.3f"))?;

        match level_colour(*meta.level()) {
            Some(code) if writer.has_ansi_escapes() => {
                write!(writer, "\x1b[{code}m{:>5}\x1b[0m ", meta.level())?
            }
            _ => write!(writer, "{:>5} ", meta.level())?,
        }

        write!(writer, "{}: ", meta.target())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_colour(level: Level) -> Option<&'static str> {
    match level {
        Level::ERROR => Some("31"),
        Level::WARN => Some("33"),
        Level::INFO => Some("32"),
        Level::DEBUG | Level::TRACE => None,
    }
}

fn log_file() -> MutexGuard<'static, Option<File>> {
    LOG_FILE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Writes to the log file while one is open; otherwise a sink.
struct FileWriter;

struct FileGuard(MutexGuard<'static, Option<File>>);

impl Write for FileGuard {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match self.0.as_mut() {
            Some(file) => file.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.as_mut().map_or(Ok(()), File::flush)
    }
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = FileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        FileGuard(log_file())
    }
}

/// Replaces the active filter. Accepts a bare level or any EnvFilter
/// directive such as `"warn,bollo_core=debug"`.
pub fn set_log_level(directive: &str) -> Result<()> {
    let handle = LEVEL.get().ok_or_else(|| anyhow!("logging not yet initialized"))?;
    let filter = EnvFilter::try_new(directive)
        .map_err(|e| anyhow!("invalid log level '{directive}': {e}"))?;
    handle
        .reload(filter)
        .map_err(|e| anyhow!("filter reload failed: {e}"))
}

/// Shows or hides stderr output; the log file is unaffected.
pub fn set_console_enabled(enabled: bool) {
    CONSOLE_ENABLED.store(enabled, Ordering::Relaxed);
}

/// Starts appending records to `path`, replacing any file already open.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow!("cannot open log file '{}': {e}", path.display()))?;
    *log_file() = Some(file);
    Ok(())
}

/// Installs the global subscriber. `RUST_LOG` sets the initial filter,
/// `info` otherwise. Fails when a global subscriber is already installed.
pub fn init_logging() -> Result<()> {
    if LEVEL.get().is_some() {
        bail!("logging already initialized");
    }

    let initial = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (level, handle) = reload::Layer::new(initial);

    let console = tracing_subscriber::fmt::layer()
        .event_format(CliFormat)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .with_filter(filter_fn(|_| CONSOLE_ENABLED.load(Ordering::Relaxed)));

    let file = tracing_subscriber::fmt::layer()
        .event_format(CliFormat)
        .with_ansi(false)
        .with_writer(FileWriter);

    tracing_subscriber::registry()
        .with(level)
        .with(console)
        .with(file)
        .try_init()?;

    let _ = LEVEL.set(handle);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Arc;

    use tracing::warn;

    use super::*;

    /// Captures formatted output in memory.
    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(
            &mut self,
            buf: &[u8],
        ) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Buffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn format_shows_level_target_and_fields() {
        let buffer = Buffer::default();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .event_format(CliFormat)
                .with_ansi(false)
                .with_writer(buffer.clone()),
        );

        tracing::subscriber::with_default(subscriber, || {
            warn!(region = "lazio", "No direct debit rate");
        });

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains(" WARN bollo_cli::logging::tests: "), "got {output:?}");
        assert!(output.contains("No direct debit rate"), "got {output:?}");
        assert!(output.contains("region"), "got {output:?}");
        assert!(!output.contains('\x1b'), "plain output must not carry escapes");
    }

    #[test]
    fn only_error_warn_and_info_are_coloured() {
        assert_eq!(level_colour(Level::WARN), Some("33"));
        assert_eq!(level_colour(Level::DEBUG), None);
    }

    #[test]
    fn file_writer_appends_once_enabled() {
        let path = std::env::temp_dir().join(format!("bollo-log-{}.log", uuid::Uuid::new_v4()));

        FileWriter.make_writer().write_all(b"dropped\n").unwrap();
        enable_file_logging(&path).unwrap();
        FileWriter.make_writer().write_all(b"kept\n").unwrap();
        *log_file() = None;

        let contents = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(contents, "kept\n");
    }
}
