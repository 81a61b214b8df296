// syslogview - main.rs
//
// Command-line front end. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation
// 3. Reading input into a line store
// 4. Applying the requested filters and printing the visible lines

use clap::Parser;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use syslogview::app::state::ViewerState;
use syslogview::core::filter::{PatternMode, RangeMode, TimeRange};
use syslogview::core::model::LineStore;
use syslogview::platform::config::{self, AppConfig, PlatformPaths};
use syslogview::platform::fs;
use syslogview::util::{self, error::SyslogViewError};

/// syslogview - filter syslog lines by time range and regular expression.
///
/// Reads the given files in order (or stdin when none are given) and prints
/// the lines that survive every filter.
#[derive(Parser, Debug)]
#[command(name = "syslogview", version, about)]
struct Cli {
    /// Log files to read, concatenated in order. Reads stdin if omitted.
    files: Vec<PathBuf>,

    /// Range start (inclusive), e.g. "Mar 1 10:30:00", "2024-03-01 10:30:00" or "10:30:00".
    #[arg(long)]
    from: Option<String>,

    /// Range end (exclusive). Same formats as --from.
    #[arg(long)]
    to: Option<String>,

    /// Keep or remove lines inside the range [default: from config, else keep].
    #[arg(long, value_parser = ["keep", "remove"])]
    range_mode: Option<String>,

    /// Regex applied with --pattern-mode. Repeatable.
    #[arg(short = 'm', long = "match")]
    matches: Vec<String>,

    /// Keep or remove lines matching --match [default: from config, else keep].
    #[arg(long, value_parser = ["keep", "remove"])]
    pattern_mode: Option<String>,

    /// Keep only lines matching this regex. Repeatable.
    #[arg(short = 'k', long)]
    keep: Vec<String>,

    /// Remove lines matching this regex. Repeatable.
    #[arg(short = 'r', long)]
    remove: Vec<String>,

    /// Regex locating the timestamp (named group `timestamp`, or the whole match).
    #[arg(long)]
    timestamp_pattern: Option<String>,

    /// chrono format of the extracted timestamp text.
    #[arg(long)]
    timestamp_format: Option<String>,

    /// Year assumed for timestamps that carry none [default: current year].
    #[arg(short = 'y', long)]
    year: Option<i64>,

    /// Fail if any line lacks a parseable timestamp.
    #[arg(long)]
    strict: bool,

    /// Prefix each printed line with its 1-based line number.
    #[arg(short = 'n', long)]
    line_numbers: bool,

    /// Print only the number of visible lines.
    #[arg(short = 'c', long)]
    count: bool,

    /// Config file to use instead of the platform default.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_file());
    let (mut app_config, config_warnings) = config::load_config(&config_path);

    util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "syslogview starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    if let Err(e) = run(&cli, &mut app_config) {
        tracing::error!(error = %e, "Run failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli, app_config: &mut AppConfig) -> util::error::Result<()> {
    apply_overrides(cli, app_config)?;
    let parser = app_config.timestamp_parser()?;

    let lines = if cli.files.is_empty() {
        fs::read_stdin_lines()?
    } else {
        let mut all = Vec::new();
        for path in &cli.files {
            all.extend(fs::read_file_lines(path)?);
        }
        all
    };

    let mut state = ViewerState::new(LineStore::load_lines(lines), parser);
    tracing::debug!(
        pattern = state.parser().pattern(),
        format = state.parser().format(),
        year = state.parser().reference_year(),
        lines = state.store().len(),
        "Input loaded"
    );

    if cli.strict {
        state.check_timestamps()?;
    }

    if cli.from.is_some() || cli.to.is_some() {
        let start = cli.from.as_deref().map(|s| state.parse_bound(s)).transpose()?;
        let end = cli.to.as_deref().map(|s| state.parse_bound(s)).transpose()?;
        state.apply_range(TimeRange::bounded(start, end), app_config.range_mode);
    }

    for pattern in &cli.matches {
        state.apply_pattern(pattern, app_config.pattern_mode)?;
    }
    for pattern in &cli.keep {
        state.keep_matching(pattern)?;
    }
    for pattern in &cli.remove {
        state.remove_matching(pattern)?;
    }

    match write_output(cli, &state) {
        // Downstream closed early (e.g. piped into `head`).
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        Err(source) => Err(SyslogViewError::Io {
            path: "<stdout>".into(),
            operation: "write",
            source,
        }),
        Ok(()) => Ok(()),
    }
}

/// CLI flags take precedence over config values.
fn apply_overrides(cli: &Cli, app_config: &mut AppConfig) -> util::error::Result<()> {
    if let Some(ref pattern) = cli.timestamp_pattern {
        app_config.timestamp_pattern = pattern.clone();
    }
    if let Some(ref format) = cli.timestamp_format {
        app_config.timestamp_format = format.clone();
    }
    if let Some(year) = cli.year {
        app_config.reference_year = Some(config::validate_year(year)?);
    }
    // clap has already restricted both to "keep" | "remove".
    if let Some(mode) = cli.range_mode.as_deref().and_then(RangeMode::from_name) {
        app_config.range_mode = mode;
    }
    if let Some(mode) = cli.pattern_mode.as_deref().and_then(PatternMode::from_name) {
        app_config.pattern_mode = mode;
    }
    Ok(())
}

fn write_output(cli: &Cli, state: &ViewerState) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if cli.count {
        writeln!(out, "{}", state.store().visible_count())?;
    } else {
        for line in state.visible_lines() {
            if cli.line_numbers {
                writeln!(out, "{}:{}", line.number(), line.text)?;
            } else {
                writeln!(out, "{}", line.text)?;
            }
        }
    }

    out.flush()
}
