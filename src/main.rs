use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use variant_compare::config::{self, CompareConfig};
use variant_compare::display::DisplayRegistry;
use variant_compare::metadata::MetadataExtractor;
use variant_compare::output;
use variant_compare::session::Session;
use variant_compare::types::Slot;
use variant_compare::upload::Uploader;

#[derive(Parser)]
#[command(name = "variant-compare")]
#[command(about = "Compare two image variants and recommend one for the web")]
#[command(long_about = "\
Compare two image variants and recommend one for the web

Each file is sniffed, decoded for its dimensions, and scored on four factors:

  File size     (weight 2)  smaller wins
  Aspect ratio  (weight 1)  near the golden ratio beats common ratios beats other
  Resolution    (weight 1)  wins only with more than 1.2x the other's pixels
  Format        (weight 1)  webp > jpg/jpeg > png > anything else

The declared format comes from the file extension. Ties add nothing; the
variant with the higher total is recommended, with High confidence when it
leads by more than one point.

Run 'variant-compare gen-config' to generate a documented variant-compare.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: ./variant-compare.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare two images and print the recommendation
    Compare {
        /// Variant A
        a: PathBuf,
        /// Variant B
        b: PathBuf,
        /// Print the session snapshot as JSON
        #[arg(long)]
        json: bool,
        /// Include the detail analysis
        #[arg(long)]
        details: bool,
    },
    /// Print the metadata extracted from one image
    Inspect {
        file: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock variant-compare.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Compare {
            a,
            b,
            json,
            details,
        } => {
            let config = resolve_config(cli.config.as_deref())?;
            let extractor = MetadataExtractor::new(DisplayRegistry::new(), config.upload);
            let uploader = Uploader::new(Session::new(), extractor);

            let (bytes_a, name_a) = read_upload(&a)?;
            let (bytes_b, name_b) = read_upload(&b)?;
            let (done_a, done_b) = tokio::join!(
                uploader.upload(Slot::A, bytes_a, &name_a),
                uploader.upload(Slot::B, bytes_b, &name_b),
            );
            done_a?;
            done_b?;

            let mut session = uploader.session().lock().await;
            if details {
                session.request_summary();
            }
            {
                let view = session.snapshot()?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&view)?);
                } else if let (Some(meta_a), Some(meta_b), Some(result)) =
                    (view.slot_a, view.slot_b, &view.comparison)
                {
                    output::print_comparison(meta_a, meta_b, result);
                    if details {
                        if let Some(analysis) = &view.details {
                            println!();
                            output::print_details(analysis);
                        }
                    }
                }
            }
            session.close();
            tracing::debug!(
                live = uploader.extractor().registry().live_count(),
                "session closed"
            );
        }
        Command::Inspect { file, json } => {
            let config = resolve_config(cli.config.as_deref())?;
            let extractor = MetadataExtractor::new(DisplayRegistry::new(), config.upload);
            let (bytes, name) = read_upload(&file)?;
            let meta = extractor.extract(bytes, &name).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&meta)?);
            } else {
                output::print_metadata(&meta);
            }
            meta.release();
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so `--json` output on stdout stays parseable.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// An explicit `--config` must exist; the implicit one is optional.
fn resolve_config(explicit: Option<&Path>) -> Result<CompareConfig, Box<dyn std::error::Error>> {
    match explicit {
        Some(path) if !path.exists() => {
            Err(format!("config file not found: {}", path.display()).into())
        }
        Some(path) => Ok(config::load_config(path)?),
        None => Ok(config::load_config(Path::new(config::CONFIG_FILENAME))?),
    }
}

/// Read a file for upload, returning its bytes and the name used for the
/// declared format.
fn read_upload(path: &Path) -> Result<(Vec<u8>, String), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok((bytes, name))
}
