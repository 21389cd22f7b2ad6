use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::Level;

use polystruct::diagnostics::{render_error, GenError};
use polystruct::output::write_artifacts;
use polystruct::symbols::Snapshot;
use polystruct::watch::{read_snapshot, WatchTarget};

#[derive(Parser)]
#[command(name = "polystruct", version, about = "Sum-type and delegation generator for trait snapshots")]
struct Cli {
    /// Log every discovered interface, host and artifact
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate artifacts from a symbol snapshot
    Generate {
        /// Snapshot JSON path
        snapshot: PathBuf,
        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
        /// Config file (defaults to polystruct.toml next to the snapshot)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Fail instead of writing if the output directory is out of date
        #[arg(long)]
        check: bool,
    },
    /// Print the tag tables and delegation plans a snapshot would produce
    Inspect {
        /// Snapshot JSON path
        snapshot: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Regenerate whenever the snapshot or config changes
    Watch {
        /// Snapshot JSON path
        snapshot: PathBuf,
        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
        /// Don't clear the terminal between runs
        #[arg(long)]
        no_clear: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    match cli.command {
        Commands::Generate { snapshot, output, config, check } => {
            let target = WatchTarget { snapshot, out_dir: output, config };
            if let Err(err) = run_generate(&target, check) {
                fail(&target, &err);
            }
        }
        Commands::Inspect { snapshot, config } => {
            let target = WatchTarget { snapshot, out_dir: PathBuf::new(), config };
            match run_inspect(&target) {
                Ok(report) => print!("{report}"),
                Err(err) => fail(&target, &err),
            }
        }
        Commands::Watch { snapshot, output, config, no_clear } => {
            let target = WatchTarget { snapshot, out_dir: output, config };
            if let Err(err) = polystruct::watch::watch_generate(&target, no_clear) {
                fail(&target, &err);
            }
        }
    }
}

fn run_generate(target: &WatchTarget, check: bool) -> Result<(), GenError> {
    let config = target.load_config()?;
    let json = read_snapshot(&target.snapshot)?;
    let artifacts = polystruct::generate_from_json(&json, &config)?;
    let report = write_artifacts(&target.out_dir, &artifacts, check)?;

    if check {
        if !report.is_clean() {
            let stale: Vec<&str> = report
                .written
                .iter()
                .chain(&report.removed)
                .map(String::as_str)
                .collect();
            return Err(GenError::generation(format!(
                "output is out of date: {}",
                stale.join(", ")
            )));
        }
        println!("{} artifact(s) up to date", report.unchanged.len());
        return Ok(());
    }

    for name in &report.written {
        println!("wrote {}", target.out_dir.join(name).display());
    }
    for name in &report.removed {
        println!("removed {}", target.out_dir.join(name).display());
    }
    Ok(())
}

fn run_inspect(target: &WatchTarget) -> Result<String, GenError> {
    let config = target.load_config()?;
    let json = read_snapshot(&target.snapshot)?;
    let snapshot = Snapshot::from_json(&json)?;
    polystruct::inspect::inspect(&snapshot, &config)
}

fn fail(target: &WatchTarget, err: &GenError) -> ! {
    let source = match err {
        GenError::Config { path, .. } => read_or_empty(path),
        _ => read_or_empty(&target.snapshot),
    };
    render_error(&source, err);
    std::process::exit(1);
}

fn read_or_empty(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_default()
}
