//! `yall` – command-line front end for the Limelight pose client.
//!
//! Subcommands:
//!
//! - `replay <file>` feeds a JSON-lines recording of bus writes through a
//!   [`PoseEstimator`](yall_estimator::PoseEstimator) and prints every
//!   estimate.
//! - `decode <values…>` decodes one `botpose*` array given on the command
//!   line.
//! - `config [--save]` prints the effective configuration.
//!
//! Ctrl-C stops a replay between samples.

mod config;
mod replay;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::warn;

use yall_bus::{MemoryBus, Table, TelemetrySource, TimestampedArray};
use yall_camera::Limelight;
use yall_estimator::{AllianceSource, FmsAlliance, PoseEstimate, alliance::FMS_TABLE};
use yall_types::YallError;

use config::{Config, OutputFormat};
use replay::{ReplayFrame, Replayer};

#[derive(Parser)]
#[command(name = "yall", version)]
#[command(about = "Decode and replay Limelight pose estimates")]
struct Cli {
    /// Config file (defaults to ~/.yall/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a JSON-lines bus recording
    Replay {
        file: PathBuf,

        /// Camera table name
        #[arg(long)]
        camera: Option<String>,
    },
    /// Decode one pose array
    Decode {
        /// Array values in bus order
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,

        /// Bus timestamp of the sample, in microseconds
        #[arg(long, default_value = "0")]
        timestamp_micros: i64,

        /// Mark the estimate as MegaTag2
        #[arg(long)]
        megatag2: bool,
    },
    /// Print the effective configuration
    Config {
        /// Also write it to the config file
        #[arg(long)]
        save: bool,
    },
}

fn main() {
    // Logs go to stderr so `--json` output on stdout stays machine-readable.
    // YALL_LOG_FORMAT=json switches logs to newline-delimited JSON.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("YALL_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), YallError> {
    let mut cfg = config::load(cli.config.as_deref())?;
    if cli.json {
        cfg.output = OutputFormat::Json;
    }

    match cli.command {
        Command::Replay { file, camera } => {
            if let Some(camera) = camera {
                cfg.camera = camera;
            }
            run_replay(&cfg, &file)
        }
        Command::Decode {
            values,
            timestamp_micros,
            megatag2,
        } => {
            let sample = TimestampedArray {
                values,
                timestamp_micros,
            };
            let estimate = PoseEstimate::decode(&sample, megatag2);
            print_estimate(cfg.output, estimate.as_ref())
        }
        Command::Config { save } => {
            let raw = toml::to_string_pretty(&cfg)
                .map_err(|e| YallError::Config(format!("failed to serialize config: {e}")))?;
            print!("{raw}");
            if save {
                let path = cli.config.unwrap_or_else(config::config_path);
                config::save_to(&cfg, &path)?;
                println!("{} {}", "✓ saved to".green(), path.display().to_string().bold());
            }
            Ok(())
        }
    }
}

fn run_replay(cfg: &Config, file: &Path) -> Result<(), YallError> {
    let samples = replay::load_recording(file)?;

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!("{}", "Ctrl-C received – stopping replay".yellow().bold());
        shutdown_clone.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; replay cannot be interrupted");
    }

    let bus = MemoryBus::default();
    let source: Arc<dyn TelemetrySource> = Arc::new(bus.clone());
    let alliance: Arc<dyn AllianceSource> = match cfg.alliance {
        Some(fixed) => Arc::new(Some(fixed)),
        None => Arc::new(FmsAlliance::new(Table::new(Arc::clone(&source), FMS_TABLE))),
    };
    let camera = Limelight::new(source, &cfg.camera);
    let estimator = camera.pose_estimator(cfg.megatag2, Arc::clone(&alliance));

    if cfg.output == OutputFormat::Text {
        println!(
            "Replaying {} sample(s) from {} for camera {} ({})",
            samples.len(),
            file.display().to_string().bold(),
            camera.name().bold(),
            if cfg.megatag2 { "MegaTag2" } else { "MegaTag1" }
        );
    }

    let replayer = Replayer::new(&bus, &estimator, alliance.as_ref(), cfg.poll_period());
    let mut write_err = None;
    let replayed = replayer.run(&samples, &shutdown, |frame| {
        if write_err.is_none()
            && let Err(e) = print_frame(cfg.output, frame)
        {
            write_err = Some(e);
        }
    });
    if let Some(e) = write_err {
        return Err(e);
    }

    if cfg.output == OutputFormat::Text {
        println!("{}", format!("✓ {replayed}/{} sample(s) replayed", samples.len()).green());
    }
    Ok(())
}

fn print_frame(format: OutputFormat, frame: &ReplayFrame) -> Result<(), YallError> {
    match format {
        OutputFormat::Json => {
            println!("{}", encode_json(frame)?);
        }
        OutputFormat::Text => {
            println!(
                "{} {}/{} @ {:.6}s",
                format!("[{}]", frame.index).dimmed(),
                frame.table,
                frame.key,
                frame.timestamp_micros as f64 / 1_000_000.0
            );
            print_text(frame.estimate.as_ref());
        }
    }
    Ok(())
}

fn print_estimate(format: OutputFormat, estimate: Option<&PoseEstimate>) -> Result<(), YallError> {
    match format {
        OutputFormat::Json => {
            println!("{}", encode_json(&estimate)?);
        }
        OutputFormat::Text => print_text(estimate),
    }
    Ok(())
}

fn encode_json<T: serde::Serialize>(value: &T) -> Result<String, YallError> {
    serde_json::to_string(value).map_err(|e| YallError::Output(format!("failed to encode JSON: {e}")))
}

fn print_text(estimate: Option<&PoseEstimate>) {
    match estimate {
        None => println!("  {}", "no estimate (empty array)".yellow()),
        Some(e) if !e.has_data => print!("  {}", e.to_string().yellow()),
        Some(e) => {
            let t = e.pose.translation;
            let [roll, pitch, yaw] = e.pose.rotation.to_degrees();
            println!(
                "  {} x={:.3} y={:.3} z={:.3} roll={:.1}° pitch={:.1}° yaw={:.1}°",
                "pose".green().bold(),
                t.x,
                t.y,
                t.z,
                roll,
                pitch,
                yaw
            );
            println!(
                "  tags={} ambiguity min={:.2} avg={:.2} max={:.2} latency={:.1}ms",
                e.tag_count,
                e.min_tag_ambiguity(),
                e.avg_tag_ambiguity(),
                e.max_tag_ambiguity(),
                e.latency_ms
            );
        }
    }
}
