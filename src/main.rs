use std::env;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, LevelFilter};
use simplelog::{Config, TermLogger, TerminalMode};
use termcolor::ColorChoice;
use tsol::config::TsolConfig;
use tsol::diagnostic::{report_load_error, SourceDb};
use tsol::sink::{DirSink, JsonLinesSink, WriterSink};
use tsol::{compile_file, load_path, CodegenOptions, CompileSummary, ContractSink, LoadError};

#[derive(Parser, Debug)]
#[command(
    name = "tsolc",
    version,
    about = "Compile TypeScript contract classes to Solidity"
)]
struct Cli {
    /// Enable verbose debug logging (or set TSOLC_DEBUG=1)
    #[arg(short, long, global = true)]
    debug: bool,

    /// Configuration file (default: tsol.toml in the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// When to colour diagnostics
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto, global = true)]
    color: ColorWhen,

    #[command(subcommand)]
    command: Option<Command>,

    /// Source file to compile to stdout (when no subcommand is used)
    file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a file, printing the contracts or writing them to a directory
    Compile {
        /// Source file to compile
        file: PathBuf,
        /// Write each contract to <DIR>/<Name>.sol instead of stdout
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
        /// Output format on stdout
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Indentation unit (overrides the config file)
        #[arg(long)]
        indent: Option<String>,
    },
    /// Parse, bind and render a file without writing any output
    Check {
        /// Source file to check
        file: PathBuf,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ColorWhen {
    Auto,
    Always,
    Never,
}

impl ColorWhen {
    fn choice(self) -> ColorChoice {
        match self {
            ColorWhen::Auto if io::stderr().is_terminal() => ColorChoice::Auto,
            ColorWhen::Auto | ColorWhen::Never => ColorChoice::Never,
            ColorWhen::Always => ColorChoice::Always,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let color = cli.color.choice();
    init_logging(cli.debug || debug_from_env(), color)?;

    let config = TsolConfig::load(cli.config.as_deref())?;
    debug!("configuration: {config:?}");

    match cli.command {
        Some(Command::Compile {
            file,
            out_dir,
            format,
            indent,
        }) => run_compile(&file, out_dir, format, indent, &config, color),
        Some(Command::Check { file }) => run_check(&file, &config, color),
        None => {
            let Some(file) = cli.file else {
                bail!("no input file given; see `tsolc --help`");
            };
            let mut sink = WriterSink::new(io::stdout().lock());
            compile(&file, &config.codegen_options(), &mut sink, color)?;
            Ok(())
        }
    }
}

fn debug_from_env() -> bool {
    match env::var("TSOLC_DEBUG") {
        Ok(val) => val == "1" || val.eq_ignore_ascii_case("true"),
        Err(_) => false,
    }
}

fn init_logging(debug: bool, color: ColorChoice) -> Result<()> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    TermLogger::init(level, Config::default(), TerminalMode::Stderr, color)
        .context("failed to initialise logging")
}

fn run_compile(
    file: &Path,
    out_dir: Option<PathBuf>,
    format: OutputFormat,
    indent: Option<String>,
    config: &TsolConfig,
    color: ColorChoice,
) -> Result<()> {
    // CLI flags override config values
    let mut options = config.codegen_options();
    if let Some(indent) = indent {
        options = options.with_indent(indent);
    }

    if format == OutputFormat::Json {
        if out_dir.is_some() {
            bail!("--out-dir cannot be combined with --format json");
        }
        let mut sink = JsonLinesSink::new(io::stdout().lock());
        compile(file, &options, &mut sink, color)?;
        return Ok(());
    }

    let out_dir = out_dir.or_else(|| config.build.out_dir().map(PathBuf::from));
    match out_dir {
        Some(dir) => {
            let mut sink = DirSink::new(dir);
            compile(file, &options, &mut sink, color)?;
            for path in sink.written() {
                eprintln!("wrote {}", path.display());
            }
        }
        None => {
            let mut sink = WriterSink::new(io::stdout().lock());
            compile(file, &options, &mut sink, color)?;
        }
    }
    Ok(())
}

fn run_check(file: &Path, config: &TsolConfig, color: ColorChoice) -> Result<()> {
    let mut sink = WriterSink::new(io::sink());
    let summary = compile(file, &config.codegen_options(), &mut sink, color)?;
    println!(
        "{}: {} contract(s) ok",
        file.display(),
        summary.contracts.len()
    );
    Ok(())
}

/// Load, parse and compile `file`, rendering any diagnostics to stderr.
fn compile(
    file: &Path,
    options: &CodegenOptions,
    sink: &mut dyn ContractSink,
    color: ColorChoice,
) -> Result<CompileSummary> {
    let loaded = match load_path(file) {
        Ok(loaded) => loaded,
        Err(err @ LoadError::Parse { .. }) => {
            report_load_error(&err, color);
            bail!("could not compile `{}`", file.display());
        }
        Err(err) => return Err(err.into()),
    };

    match compile_file(&loaded.file, options, sink) {
        Ok(summary) => Ok(summary),
        Err(err) if err.span().is_some() => {
            let db = SourceDb::new(loaded.path, loaded.source);
            db.report(&db.compile_error(&err), color);
            bail!("could not compile `{}`", file.display());
        }
        Err(err) => Err(err.into()),
    }
}
