//! board-cells CLI: run one camera frame through the board tracker.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use board_cells::core::level_from_verbosity;
use board_cells::detect::load_frame;
use board_cells::{BoardCellsConfig, BoardTracker, FrameReport};
use clap::Parser;
use log::{error, info};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "board-cells")]
#[command(about = "Locate a game board in an image and report its cells")]
#[command(version)]
struct Cli {
    /// Path to the JSON config.
    config: PathBuf,

    /// Override the report path from the config.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit JSON log lines with span timings.
    #[cfg(feature = "tracing")]
    #[arg(long)]
    json_log: bool,
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) {
    // Spans are filtered by RUST_LOG; -v caps the bridged `log` records.
    board_cells::core::init_tracing(cli.json_log);
    let _ = tracing_log::LogTracer::builder()
        .with_max_level(level_from_verbosity(cli.verbose))
        .init();
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) {
    if let Err(err) = board_cells::core::init_with_level(level_from_verbosity(cli.verbose)) {
        eprintln!("logger: {err}");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the frame produced a board.
fn run(cli: &Cli) -> CliResult<bool> {
    let cfg = BoardCellsConfig::load_json(&cli.config)?;
    let out = cli.out.clone().unwrap_or_else(|| cfg.output_path());
    let mut report = FrameReport::new(&cfg, &cli.config);

    let image_path = resolve(&cli.config, &cfg.image_path);
    let ok = match load_frame(&image_path, cfg.threshold) {
        Err(err) => {
            report.set_error(&err);
            false
        }
        Ok(frame) => {
            let mut tracker = BoardTracker::new(cfg.tracker_params());
            match tracker.process_frame(&frame.binary.view()) {
                Ok(snapshot) => {
                    info!("{} cells: {}", snapshot.cells.len(), tracker.board());
                    report.set_snapshot(snapshot, tracker.to_external());
                    true
                }
                Err(err) => {
                    report.set_error(&err);
                    false
                }
            }
        }
    };

    report.write_json(&out)?;
    println!("wrote {}", out.display());
    if let Some(err) = &report.error {
        eprintln!("frame failed: {err}");
    }
    Ok(ok)
}

/// Image paths in a config are relative to the config file.
fn resolve(config: &Path, image: &str) -> PathBuf {
    let image = Path::new(image);
    if image.is_absolute() {
        return image.to_path_buf();
    }
    config
        .parent()
        .map(|dir| dir.join(image))
        .unwrap_or_else(|| image.to_path_buf())
}
