//! fontinfo CLI (made by FontLab https://www.fontlab.com/)

use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fontinfo_core::discovery::{DirDiscovery, FontDiscovery, FontSourceRef, GlobDiscovery};
use fontinfo_core::extract::{extract_all, summarize, ExtractOptions, FontSummary, NamePolicy};
use fontinfo_core::output::{write_no_fonts, write_report, write_table, ReportOptions};

/// Environment variable holding a tracing filter (e.g. `fontinfo_core=debug`).
pub const LOG_ENV: &str = "FONTINFO_LOG";

/// CLI entrypoint for fontinfo.
#[derive(Debug, Parser)]
#[command(
    name = "fontinfo",
    version,
    about = "Inspect font naming tables and stylistic sets (made by FontLab https://www.fontlab.com/)"
)]
pub struct Cli {
    /// Log more to stderr (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every naming-table entry and stylistic set for fonts in a directory
    Names(NamesArgs),
    /// Print a full-name/version table for fonts matching glob patterns
    Versions(VersionsArgs),
}

#[derive(Debug, Args)]
struct NamesArgs {
    /// Directory holding the fonts (.ttf, .otf, .ttc)
    #[arg(
        long = "dir",
        default_value = ".",
        env = "FONTINFO_DIR",
        value_hint = ValueHint::DirPath
    )]
    dir: PathBuf,

    /// Shell glob on the file name (e.g. "*Mono*")
    #[arg(short = 'n', long = "name", value_hint = ValueHint::Other)]
    name: Option<String>,

    /// Match --name without regard to case
    #[arg(short = 'i', long = "ignore-case", action = ArgAction::SetTrue)]
    ignore_case: bool,

    /// How records sharing a nameID are combined
    #[arg(long = "policy", default_value_t = PolicyChoice::Windows, value_enum)]
    policy: PolicyChoice,

    /// Skip the stylistic set (ssXX) section
    #[arg(long = "no-stylistic-sets", action = ArgAction::SetTrue)]
    no_stylistic_sets: bool,

    /// Control colorized output (auto|always|never)
    #[arg(long = "color", default_value_t = ColorChoice::Auto, value_enum)]
    color: ColorChoice,
}

#[derive(Debug, Args)]
struct VersionsArgs {
    /// Glob patterns, `**` allowed [default: *.ttf *.otf *.ttc *.woff*]
    #[arg(value_hint = ValueHint::FilePath)]
    patterns: Vec<String>,

    /// Control colorized output (auto|always|never)
    #[arg(long = "color", default_value_t = ColorChoice::Auto, value_enum)]
    color: ColorChoice,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum PolicyChoice {
    /// Windows records only, first record per nameID
    Windows,
    /// All platforms, distinct values joined with "; "
    All,
}

impl From<PolicyChoice> for NamePolicy {
    fn from(choice: PolicyChoice) -> Self {
        match choice {
            PolicyChoice::Windows => NamePolicy::WindowsFirst,
            PolicyChoice::All => NamePolicy::AllPlatforms,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => is_terminal,
        }
    }
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    let is_terminal = stdout.is_terminal();
    let mut handle = stdout.lock();

    match cli.command {
        Command::Names(args) => run_names(&args, &mut handle, is_terminal),
        Command::Versions(args) => run_versions(&args, &mut handle, is_terminal),
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed when embedded; keep the existing one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run_names(args: &NamesArgs, mut w: impl Write, is_terminal: bool) -> Result<()> {
    let sources = discover_in_dir(args)?;
    if sources.is_empty() {
        return write_no_fonts(&mut w);
    }

    let extract_opts = ExtractOptions {
        policy: args.policy.into(),
        stylistic_sets: !args.no_stylistic_sets,
    };
    let reports = extract_all(&sources, &extract_opts);
    let invalid = reports.iter().filter(|r| !r.is_valid()).count();
    info!(fonts = reports.len(), invalid, "extraction finished");

    let report_opts = ReportOptions {
        stylistic_sets: !args.no_stylistic_sets,
        color: args.color.enabled(is_terminal),
    };
    write_report(&reports, &mut w, &report_opts)
}

fn discover_in_dir(args: &NamesArgs) -> Result<Vec<FontSourceRef>> {
    let mut discovery = DirDiscovery::new(&args.dir).case_sensitive(!args.ignore_case);
    if let Some(pattern) = &args.name {
        discovery = discovery.with_name_pattern(pattern)?;
    }
    let sources = discovery.discover()?;
    info!(dir = %args.dir.display(), count = sources.len(), "resolved font files");
    Ok(sources)
}

fn run_versions(args: &VersionsArgs, mut w: impl Write, is_terminal: bool) -> Result<()> {
    let discovery = GlobDiscovery::new(args.patterns.iter().cloned());
    let sources = discovery.discover()?;
    info!(patterns = ?discovery.patterns(), count = sources.len(), "resolved font files");
    if sources.is_empty() {
        return write_no_fonts(&mut w);
    }

    let summaries: Vec<FontSummary> = sources.iter().map(|s| summarize(&s.path)).collect();
    write_table(&summaries, &mut w, args.color.enabled(is_terminal))
}
