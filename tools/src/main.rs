use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glob::Pattern;
use mppread_tools::{dump_json, format_identity, format_pretty, list_streams, CfbContainer};
use reader::{identify, read_project, ProjectCollector, ReadOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "mppread-tools",
    version,
    about = "Project file inspection and dump tools"
)]
struct Cli {
    /// Log stage progress to stderr (RUST_LOG overrides).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the identity stream and detected generation.
    Identify {
        /// Path to the project file.
        file: PathBuf,
    },
    /// Read every entity and print the result.
    Dump {
        /// Path to the project file.
        file: PathBuf,
        /// Output format.
        #[arg(long, value_enum, default_value_t = DumpFormat::Json)]
        format: DumpFormat,
        /// Fail on the first stream problem instead of skipping the stage.
        #[arg(long)]
        strict: bool,
        /// Skip view and table metadata.
        #[arg(long)]
        no_views: bool,
    },
    /// List container streams with their sizes.
    Streams {
        /// Path to the project file.
        file: PathBuf,
        /// Only list streams whose path or name matches.
        #[arg(long)]
        glob: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DumpFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Command::Identify { file } => {
            let container = open(&file)?;
            let identity = identify(&container)
                .with_context(|| format!("identify {}", file.display()))?;
            println!("{}", format_identity(&identity));
        }
        Command::Dump {
            file,
            format,
            strict,
            no_views,
        } => {
            let container = open(&file)?;
            let options = if strict {
                ReadOptions::strict()
            } else {
                ReadOptions::default()
            }
            .with_views(!no_views);
            let mut sink = ProjectCollector::new();
            let report = read_project(&container, &mut sink, &options)
                .with_context(|| format!("read {}", file.display()))?;
            let project = sink.finish();
            match format {
                DumpFormat::Json => {
                    let json = dump_json(&project, &report).context("serialize json")?;
                    println!("{json}");
                }
                DumpFormat::Pretty => {
                    print!("{}", format_pretty(&project, &report));
                }
            }
        }
        Command::Streams { file, glob } => {
            let pattern = glob
                .as_deref()
                .map(Pattern::new)
                .transpose()
                .context("invalid glob pattern")?;
            let mut container = open(&file)?;
            for entry in list_streams(&mut container, pattern.as_ref()) {
                println!("{:>10}  {}", entry.size, entry.path.escape_debug());
            }
        }
    }
    Ok(())
}

fn open(path: &Path) -> Result<CfbContainer<std::fs::File>> {
    CfbContainer::open_path(path).with_context(|| format!("open compound file {}", path.display()))
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
