//! Tracing layers for a provisioning run: the console view and the run log.
//!
//! Both layers classify each event into a [`Kind`] from its level and target.
//! The run log additionally receives one structured line per recorded item
//! (target [`ITEM_TARGET`]), which the console never shows.
use std::fs::File;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;
use tracing::field::{Field, Visit};

use super::utils::{Stamp, log_file_path, plain_text, utc_stamp};

/// Target used for stage headers.
pub(super) const STAGE_TARGET: &str = "provision::stage";

/// Target used for dry-run actions.
pub(super) const DRY_RUN_TARGET: &str = "provision::dry_run";

/// Target used for per-item outcomes.
pub(super) const ITEM_TARGET: &str = "provision::item";

/// What the run log header records about a run.
#[derive(Debug, Clone, Copy)]
pub struct RunInfo<'a> {
    /// Command name; also names the log file.
    pub command: &'a str,
    /// Permissions file in use.
    pub config: &'a Path,
    /// Directory scanned for APKs (install mode).
    pub apk_dir: &'a Path,
    pub dry_run: bool,
}

impl RunInfo<'_> {
    fn header(&self) -> String {
        let version = option_env!("PROVISION_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
        let mode = if self.dry_run { "dry run" } else { "live" };
        format!(
            "# apk-provisioner {version}: {} started {}\n\
             # config: {}\n\
             # apk dir: {}\n\
             # mode: {mode}\n",
            self.command,
            utc_stamp(Stamp::Header),
            self.config.display(),
            self.apk_dir.display(),
        )
    }
}

/// How an event is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    DryRun,
    Item,
    Error,
    Warn,
    Info,
    Debug,
}

impl Kind {
    fn of(metadata: &tracing::Metadata<'_>) -> Self {
        match (metadata.target(), *metadata.level()) {
            (ITEM_TARGET, _) => Self::Item,
            (_, Level::ERROR) => Self::Error,
            (_, Level::WARN) => Self::Warn,
            (STAGE_TARGET, Level::INFO) => Self::Stage,
            (DRY_RUN_TARGET, Level::INFO) => Self::DryRun,
            (_, Level::INFO) => Self::Info,
            _ => Self::Debug,
        }
    }

    /// Tag following the timestamp in the run log.
    const fn log_tag(self) -> &'static str {
        match self {
            Self::Stage => "==> ",
            Self::DryRun => "[dry run] ",
            Self::Item => "[item] ",
            Self::Error => "[error] ",
            Self::Warn => "[warn] ",
            Self::Info => "",
            Self::Debug => "[debug] ",
        }
    }
}

/// The event fields both layers read.
#[derive(Default)]
struct Fields {
    message: String,
    item: Option<String>,
    status: Option<String>,
    detail: Option<String>,
}

impl Fields {
    fn of(event: &tracing::Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }

    fn store(&mut self, name: &str, value: String) {
        match name {
            "message" => self.message = value,
            "item" => self.item = Some(value),
            "status" => self.status = Some(value),
            "detail" => self.detail = Some(value),
            _ => {}
        }
    }

    /// `<status> <name>[: <detail>]` for item events, the message otherwise.
    fn log_text(&self, kind: Kind) -> String {
        if kind != Kind::Item {
            return plain_text(&self.message);
        }
        let mut text = format!(
            "{} {}",
            self.status.as_deref().unwrap_or("?"),
            self.item.as_deref().unwrap_or_default()
        );
        if let Some(detail) = &self.detail {
            text.push_str(": ");
            text.push_str(&plain_text(detail));
        }
        text
    }
}

impl Visit for Fields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.store(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.store(field.name(), format!("{value:?}"));
    }
}

/// Appends every event to the run log, one timestamped plain-text line each.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<File>,
}

impl FileLayer {
    /// Start the run log for `run`, replacing any previous log of the same
    /// command.  `None` if the log cannot be created.
    pub(super) fn create(run: &RunInfo<'_>) -> Option<Self> {
        let path = log_file_path(run.command)?;
        let mut file = File::create(path).ok()?;
        file.write_all(run.header().as_bytes()).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _: tracing_subscriber::layer::Context<'_, S>) {
        let kind = Kind::of(event.metadata());
        let line = format!(
            "[{}] {}{}",
            utc_stamp(Stamp::Line),
            kind.log_tag(),
            Fields::of(event).log_text(kind)
        );
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "{line}").ok();
        }
    }
}

/// Console rendering: bold stage arrows, indented steps, coloured problems.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let kind = Kind::of(event.metadata());
        let msg = Fields::of(event).message;
        match kind {
            Kind::Item => Ok(()),
            Kind::Error => writeln!(writer, "\x1b[31mERROR\x1b[0m {msg}"),
            Kind::Warn => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}"),
            Kind::Stage => writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Kind::DryRun => writeln!(writer, "  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
            Kind::Info => writeln!(writer, "  {msg}"),
            Kind::Debug => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Install the global subscriber for one run.
///
/// The console shows INFO and above (DEBUG with `verbose`); warnings and
/// errors go to stderr.  The run log receives everything from DEBUG up.
pub fn init_subscriber(verbose: bool, run: &RunInfo<'_>) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(
            std::io::stderr
                .with_max_level(Level::WARN)
                .and(std::io::stdout.with_min_level(Level::INFO)),
        )
        .with_filter(if verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        });

    let run_log = FileLayer::create(run).map(|layer| layer.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console)
        .with(run_log)
        .init();
}
