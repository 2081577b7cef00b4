use clap::{ArgAction, Args, Parser, Subcommand};
use log::{Level, LevelFilter, Metadata, Record};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "lircconf",
    version = env!("CARGO_PKG_VERSION"),
    about = "Read lircd.conf remote descriptions",
    subcommand_required = true
)]
struct App {
    /// Increase message verbosity
    #[arg(long, short, action = ArgAction::Count, global = true, conflicts_with = "quiet")]
    verbose: u8,

    /// Silence all warnings
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the remotes found
    List(List),
    /// Print the remotes as toml
    Dump(Dump),
}

#[derive(Args)]
struct Input {
    /// Also accept remotes without timing information
    #[arg(long = "accept-lirccode", short = 'l')]
    accept_lirc_code: bool,

    /// lircd.conf file, or directory of lircd.conf files
    #[arg(name = "PATH")]
    path: PathBuf,
}

#[derive(Args)]
struct List {
    #[clap(flatten)]
    input: Input,
}

#[derive(Args)]
struct Dump {
    #[clap(flatten)]
    input: Input,

    /// Include the protocol parameters
    #[arg(long = "parameters", short = 'p')]
    parameters: bool,

    /// Include the durations of raw codes
    #[arg(long = "raw", short = 'r')]
    raw: bool,
}

fn main() {
    let args = App::parse();

    if let Err(e) = log::set_logger(&CLI_LOGGER) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    let level = if args.quiet {
        LevelFilter::Error
    } else {
        match args.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    log::set_max_level(level);

    match &args.command {
        Commands::List(list) => commands::list::list(list),
        Commands::Dump(dump) => commands::dump::dump(dump),
    }
}

static CLI_LOGGER: CliLogger = CliLogger;

struct CliLogger;

impl log::Log for CliLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "{}: {}",
                match record.level() {
                    Level::Trace => "trace",
                    Level::Debug => "debug",
                    Level::Info => "info",
                    Level::Warn => "warn",
                    Level::Error => "error",
                },
                record.args()
            );
        }
    }

    fn flush(&self) {}
}
